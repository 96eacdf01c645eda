//! GPU rendering subsystem.
//!
//! Renderers consume a `World` and issue GPU commands via wgpu. Each renderer
//! owns its GPU resources (pipelines, buffers) and creates them lazily.
//!
//! Convention:
//! - world space is right-handed, +Y up
//! - colors are uploaded linear; the surface format does the sRGB encode
//! - one render pass per frame: opaque, wireframe, points, then translucent

mod backend;
mod common;
mod ctx;
mod mesh;
mod points;
mod scene;

pub use backend::WgpuBackend;
pub use ctx::{RenderCtx, RenderTarget};
pub use scene::SceneRenderer;
