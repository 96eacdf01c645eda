//! Coordinate, size, and color types shared by the lifecycle core and renderers.
//!
//! Canonical host space:
//! - logical pixels (DPI-aware), scaled by `pixel_density` for the drawing surface
//! - colors authored as straight-alpha sRGB

mod color;
mod viewport;

pub use color::{Color, ParseColorError};
pub use viewport::{PhysicalExtent, ViewportState};
