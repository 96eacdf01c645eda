use std::fmt::Debug;

use crate::coords::ViewportState;
use crate::input::Key;
use crate::scene::{Camera, World};

use super::error::ConfigError;

/// User-facing configuration of one scene: an enumerated set of options.
pub trait SceneConfig: Clone + Debug {
    /// A single option change (field + new value).
    type Change: Clone + Debug;

    /// Validates and applies `change`. Returns `Ok(false)` if the value was already set.
    fn apply(&mut self, change: &Self::Change) -> Result<bool, ConfigError>;

    /// Parses `key=value` style option strings (CLI, control panels).
    fn parse_change(key: &str, value: &str) -> Result<Self::Change, ConfigError>;
}

/// Applies `key=value` option pairs to `config` in order, stopping at the first error.
pub fn apply_options<Cfg: SceneConfig>(
    config: &mut Cfg,
    options: &[(String, String)],
) -> Result<(), ConfigError> {
    for (key, value) in options {
        let change = Cfg::parse_change(key, value)?;
        config.apply(&change)?;
    }
    Ok(())
}

/// How a content builder absorbed a configuration change.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reconfigure {
    /// Built objects were mutated in place.
    Applied,
    /// The change needs a full rebuild of the world.
    Rebuild,
}

/// Builds the visible objects and lights of one demo.
///
/// `build` is a pure function of the configuration: the same config yields an
/// equivalent world, and nothing from a previous build is retained (builders
/// take `&self`; randomness is seeded from the config).
pub trait Content {
    type Config: SceneConfig;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Initial viewpoint. Aspect is filled in by the render context.
    fn camera(&self, config: &Self::Config) -> Camera;

    /// Populates `world` (objects, lights, background) in registration order.
    fn build(&self, config: &Self::Config, viewport: &ViewportState, world: &mut World);

    /// Applies an already-validated change to built objects.
    ///
    /// `config` holds the new value. The default rebuilds everything.
    fn reconfigure(
        &self,
        config: &Self::Config,
        change: &<Self::Config as SceneConfig>::Change,
        world: &mut World,
    ) -> Reconfigure {
        let _ = (config, change, world);
        Reconfigure::Rebuild
    }

    /// Keyboard shortcut for a configuration change, if any.
    ///
    /// Several presses can queue before the next tick, so toggles and steps
    /// should be relative changes resolved in [`SceneConfig::apply`] rather
    /// than absolute values computed from `config`.
    fn key_binding(
        &self,
        key: Key,
        config: &Self::Config,
    ) -> Option<<Self::Config as SceneConfig>::Change> {
        let _ = (key, config);
        None
    }
}
