//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, exposes the window as a
//! [`MountPoint`](crate::lifecycle::MountPoint) and drives one `Stage` from
//! window events.

mod mount;
mod runtime;

pub use mount::WindowMount;
pub use runtime::{Runtime, RuntimeConfig};
