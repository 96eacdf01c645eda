//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating, configuring and destroying the Surface (swapchain)
//! - acquiring frames with a matching depth target

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::{DEPTH_FORMAT, Gpu};
pub use init::GpuInit;
