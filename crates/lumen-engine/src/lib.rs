//! Lumen engine crate.
//!
//! Scene lifecycle for interactive 3D views: a content builder populates a
//! world graph, a frame driver animates and draws it once per display frame,
//! and teardown releases everything in a fixed order.

pub mod coords;
pub mod device;
pub mod headless;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
