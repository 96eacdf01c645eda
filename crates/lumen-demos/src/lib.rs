//! Lumen demos: the content builders mounted by the studio routes.
//!
//! Each demo is a [`Content`](lumen_engine::lifecycle::Content) implementation
//! with its own validated configuration:
//!
//! - [`cube`]: spinning, bobbing, draggable cube
//! - [`galaxy`]: seeded spiral point cloud animated through a shader clock
//! - [`text`]: block letters from the [`glyph`] table with a per-letter wave
//! - [`city`]: building grid with traffic, drones carrying lights and rain
//!
//! [`routes`] maps navigation paths to demos.

use lumen_engine::lifecycle::ConfigError;

pub mod city;
pub mod cube;
pub mod galaxy;
pub mod glyph;
pub mod routes;
pub mod text;

pub use city::{CityChange, CityConfig, CityDemo};
pub use cube::{CubeChange, CubeConfig, CubeDemo};
pub use galaxy::{GalaxyChange, GalaxyConfig, GalaxyDemo};
pub use routes::{DemoKind, ROUTES, Route, RouteError};
pub use text::{TextChange, TextConfig, TextDemo};

/// Stores `value`, reporting whether it differed.
pub(crate) fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

/// Integer counterpart of [`ConfigError::check_range`].
pub(crate) fn check_count(
    key: &'static str,
    value: usize,
    (min, max): (usize, usize),
) -> Result<usize, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: value as f32,
            min: min as f32,
            max: max as f32,
        })
    }
}
