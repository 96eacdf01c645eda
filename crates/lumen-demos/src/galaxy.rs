//! Spiral galaxy: a seeded point cloud laid out along curved branches.
//!
//! Per-point color and jitter phase are computed once at build time. Each tick
//! only writes the cloud's shader clock and the slow whole-galaxy spin, so the
//! per-frame cost does not depend on `count`.

use std::f32::consts::TAU;

use glam::Vec3;
use lumen_engine::coords::{Color, ViewportState};
use lumen_engine::input::Key;
use lumen_engine::lifecycle::{ConfigError, Content, Reconfigure, SceneConfig};
use lumen_engine::scene::{Animation, Camera, DragAxes, ObjectKind, PointCloud, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{check_count, replace};

pub const COUNT_RANGE: (usize, usize) = (100, 200_000);
pub const BRANCH_RANGE: (usize, usize) = (2, 12);
pub const RADIUS_RANGE: (f32, f32) = (1.0, 20.0);
pub const SPIN_RANGE: (f32, f32) = (-5.0, 5.0);
pub const RANDOMNESS_RANGE: (f32, f32) = (0.0, 2.0);
pub const POWER_RANGE: (f32, f32) = (1.0, 10.0);
pub const POINT_SIZE_RANGE: (f32, f32) = (0.5, 10.0);
/// Radians per tick.
pub const ROTATION_RANGE: (f32, f32) = (0.0, 0.05);

/// Shader-side jitter amplitude, world units.
const JITTER: f32 = 0.02;
const SPIN_STEP: f32 = 0.25;

pub const GALAXY: &str = "galaxy";

#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyConfig {
    pub count: usize,
    pub branches: usize,
    pub radius: f32,
    /// Branch curvature: extra angle per unit of radius.
    pub spin: f32,
    pub randomness: f32,
    /// Higher values pull scattered points closer to their branch.
    pub randomness_power: f32,
    pub inside_color: Color,
    pub outside_color: Color,
    pub point_size: f32,
    pub rotation_speed: f32,
    pub seed: u64,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            count: 50_000,
            branches: 3,
            radius: 5.0,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Color::from_srgb_u8(0xff, 0x60, 0x30, 0xff),
            outside_color: Color::from_srgb_u8(0x1b, 0x39, 0x84, 0xff),
            point_size: 2.0,
            rotation_speed: 0.001,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyChange {
    Count(usize),
    Branches(usize),
    Radius(f32),
    Spin(f32),
    Randomness(f32),
    RandomnessPower(f32),
    InsideColor(Color),
    OutsideColor(Color),
    PointSize(f32),
    RotationSpeed(f32),
    Seed(u64),
    /// One more arm, wrapping from the maximum back to the minimum.
    NextBranches,
    /// Advances the seed by one.
    Reseed,
    /// Adds to `spin`, clamped to [`SPIN_RANGE`].
    SpinStep(f32),
}

impl SceneConfig for GalaxyConfig {
    type Change = GalaxyChange;

    fn apply(&mut self, change: &GalaxyChange) -> Result<bool, ConfigError> {
        let range = ConfigError::check_range;
        let changed = match *change {
            GalaxyChange::Count(n) => replace(&mut self.count, check_count("count", n, COUNT_RANGE)?),
            GalaxyChange::Branches(b) => {
                replace(&mut self.branches, check_count("branches", b, BRANCH_RANGE)?)
            }
            GalaxyChange::Radius(r) => {
                replace(&mut self.radius, range("radius", r, RADIUS_RANGE.0, RADIUS_RANGE.1)?)
            }
            GalaxyChange::Spin(s) => replace(&mut self.spin, range("spin", s, SPIN_RANGE.0, SPIN_RANGE.1)?),
            GalaxyChange::Randomness(r) => replace(
                &mut self.randomness,
                range("randomness", r, RANDOMNESS_RANGE.0, RANDOMNESS_RANGE.1)?,
            ),
            GalaxyChange::RandomnessPower(p) => replace(
                &mut self.randomness_power,
                range("randomness_power", p, POWER_RANGE.0, POWER_RANGE.1)?,
            ),
            GalaxyChange::InsideColor(c) => replace(&mut self.inside_color, c),
            GalaxyChange::OutsideColor(c) => replace(&mut self.outside_color, c),
            GalaxyChange::PointSize(s) => replace(
                &mut self.point_size,
                range("point_size", s, POINT_SIZE_RANGE.0, POINT_SIZE_RANGE.1)?,
            ),
            GalaxyChange::RotationSpeed(v) => replace(
                &mut self.rotation_speed,
                range("rotation_speed", v, ROTATION_RANGE.0, ROTATION_RANGE.1)?,
            ),
            GalaxyChange::Seed(s) => replace(&mut self.seed, s),
            GalaxyChange::NextBranches => {
                let next = if self.branches >= BRANCH_RANGE.1 {
                    BRANCH_RANGE.0
                } else {
                    self.branches + 1
                };
                replace(&mut self.branches, next)
            }
            GalaxyChange::Reseed => {
                self.seed = self.seed.wrapping_add(1);
                true
            }
            GalaxyChange::SpinStep(step) => {
                let next = (self.spin + step).clamp(SPIN_RANGE.0, SPIN_RANGE.1);
                replace(&mut self.spin, next)
            }
        };
        Ok(changed)
    }

    fn parse_change(key: &str, value: &str) -> Result<GalaxyChange, ConfigError> {
        let change = match key {
            "count" => GalaxyChange::Count(ConfigError::parse(key, value)?),
            "branches" => GalaxyChange::Branches(ConfigError::parse(key, value)?),
            "radius" => GalaxyChange::Radius(ConfigError::parse(key, value)?),
            "spin" => GalaxyChange::Spin(ConfigError::parse(key, value)?),
            "randomness" => GalaxyChange::Randomness(ConfigError::parse(key, value)?),
            "randomness_power" | "randomnessPower" => {
                GalaxyChange::RandomnessPower(ConfigError::parse(key, value)?)
            }
            "inside_color" | "insideColor" => GalaxyChange::InsideColor(ConfigError::parse(key, value)?),
            "outside_color" | "outsideColor" => GalaxyChange::OutsideColor(ConfigError::parse(key, value)?),
            "point_size" | "size" => GalaxyChange::PointSize(ConfigError::parse(key, value)?),
            "rotation_speed" | "speed" => GalaxyChange::RotationSpeed(ConfigError::parse(key, value)?),
            "seed" => GalaxyChange::Seed(ConfigError::parse(key, value)?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(change)
    }
}

/// Lays out `count` points along `branches` arms.
///
/// Each point picks a radius, sits on arm `i % branches`, curves by
/// `radius * spin`, then scatters by `random^power * randomness * radius` per
/// axis. Color fades from inside to outside with the radius.
pub fn synthesize(config: &GalaxyConfig) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.count;
    let branches = config.branches.max(1);

    let mut positions = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);
    let mut phases = Vec::with_capacity(n);

    for i in 0..n {
        let radius = rng.random::<f32>() * config.radius;
        let branch = (i % branches) as f32 / branches as f32 * TAU;
        let angle = branch + radius * config.spin;

        let mut scatter = || {
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            rng.random::<f32>().powf(config.randomness_power) * sign * config.randomness * radius
        };
        let offset = Vec3::new(scatter(), scatter(), scatter());

        positions.push([
            angle.cos() * radius + offset.x,
            offset.y,
            angle.sin() * radius + offset.z,
        ]);

        let c = config.inside_color.lerp(config.outside_color, radius / config.radius);
        colors.push([c.r, c.g, c.b]);
        phases.push(rng.random_range(0.0..TAU));
    }

    PointCloud::new(positions, colors, phases)
        .with_jitter(JITTER)
        .with_point_size(config.point_size)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GalaxyDemo;

impl Content for GalaxyDemo {
    type Config = GalaxyConfig;

    fn name(&self) -> &'static str {
        "galaxy"
    }

    fn camera(&self, config: &GalaxyConfig) -> Camera {
        let r = config.radius;
        Camera::perspective(75.0, 0.1, 100.0)
            .looking_at(Vec3::new(0.0, r * 0.6, r * 1.6), Vec3::ZERO)
            .with_distance_limits(1.0, 60.0)
    }

    fn build(&self, config: &GalaxyConfig, _viewport: &ViewportState, world: &mut World) {
        world.background = Color::black();
        world
            .spawn(ObjectKind::Points(synthesize(config)))
            .named(GALAXY)
            .draggable(DragAxes::YAW)
            .animate(Animation::ShaderClock)
            .animate(Animation::spin(Vec3::new(0.0, config.rotation_speed, 0.0)));
    }

    fn reconfigure(&self, config: &GalaxyConfig, change: &GalaxyChange, world: &mut World) -> Reconfigure {
        let Some(galaxy) = world.named_mut(GALAXY) else {
            return Reconfigure::Rebuild;
        };
        match (change, &mut galaxy.kind) {
            (GalaxyChange::PointSize(_), ObjectKind::Points(cloud)) => {
                cloud.point_size = config.point_size;
                Reconfigure::Applied
            }
            (GalaxyChange::RotationSpeed(_), _) => {
                if galaxy.set_spin(Vec3::new(0.0, config.rotation_speed, 0.0), true) {
                    Reconfigure::Applied
                } else {
                    Reconfigure::Rebuild
                }
            }
            _ => Reconfigure::Rebuild,
        }
    }

    fn key_binding(&self, key: Key, _config: &GalaxyConfig) -> Option<GalaxyChange> {
        match key {
            Key::B => Some(GalaxyChange::NextBranches),
            Key::R => Some(GalaxyChange::Reseed),
            Key::Plus => Some(GalaxyChange::SpinStep(SPIN_STEP)),
            Key::Minus => Some(GalaxyChange::SpinStep(-SPIN_STEP)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::headless::HeadlessMount;
    use lumen_engine::input::{InputEvent, KeyState, Modifiers};
    use lumen_engine::lifecycle::Stage;
    use lumen_engine::time::FixedClock;

    use super::*;

    fn small() -> GalaxyConfig {
        GalaxyConfig { count: 2_000, ..GalaxyConfig::default() }
    }

    fn cloud(stage: &Stage<HeadlessMount, GalaxyDemo>) -> &PointCloud {
        match stage.world().and_then(|w| w.named(GALAXY)).map(|o| &o.kind) {
            Some(ObjectKind::Points(cloud)) => cloud,
            other => panic!("expected a point cloud, got {other:?}"),
        }
    }

    #[test]
    fn synthesis_is_deterministic_per_seed() {
        let a = synthesize(&small());
        let b = synthesize(&small());
        assert_eq!(a, b);
        assert_eq!(a.len(), 2_000);

        let c = synthesize(&GalaxyConfig { seed: 7, ..small() });
        assert_ne!(a.positions, c.positions);
    }

    #[test]
    fn points_stay_near_the_disc() {
        let config = small();
        let cloud = synthesize(&config);
        let limit = config.radius * (1.0 + config.randomness * 3.0_f32.sqrt());
        for p in &cloud.positions {
            assert!(Vec3::from_array(*p).length() <= limit + 1e-4);
        }
        for phase in &cloud.phases {
            assert!((0.0..TAU).contains(phase));
        }
    }

    #[test]
    fn color_fades_from_inside_to_outside() {
        let config = GalaxyConfig { randomness: 0.0, ..small() };
        let cloud = synthesize(&config);
        let by_radius: Vec<(f32, [f32; 3])> = cloud
            .positions
            .iter()
            .zip(&cloud.colors)
            .map(|(p, c)| (Vec3::from_array(*p).length(), *c))
            .collect();
        let (_, near) = by_radius.iter().min_by(|a, b| a.0.total_cmp(&b.0)).expect("points");
        let (_, far) = by_radius.iter().max_by(|a, b| a.0.total_cmp(&b.0)).expect("points");
        let inside = config.inside_color;
        let outside = config.outside_color;
        assert!((near[0] - inside.r).abs() < 0.05);
        assert!((far[2] - outside.b).abs() < 0.05);
    }

    #[test]
    fn ticks_only_touch_the_shader_clock_and_spin() {
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), GalaxyDemo);
        stage.mount(small());
        let before = cloud(&stage).clone();

        let mut clock = FixedClock::new(0.25);
        stage.step(clock.tick());
        stage.step(clock.tick());

        let after = cloud(&stage);
        assert_eq!(after.positions, before.positions);
        assert_eq!(after.revision, before.revision);
        assert!((after.time - 0.5).abs() < 1e-6);

        let rotation = stage.world().and_then(|w| w.named(GALAXY)).map(|o| o.transform.rotation);
        assert_eq!(rotation, Some(Vec3::new(0.0, 0.002, 0.0)));
    }

    #[test]
    fn point_size_applies_in_place_and_count_rebuilds() {
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), GalaxyDemo);
        stage.mount(small());
        let mut clock = FixedClock::new(1.0 / 60.0);
        let generation = stage.world().map(World::generation);

        stage.post_change(GalaxyChange::PointSize(4.0));
        stage.step(clock.tick());
        assert_eq!(stage.world().map(World::generation), generation);
        assert_eq!(cloud(&stage).point_size, 4.0);

        stage.post_change(GalaxyChange::Count(500));
        stage.step(clock.tick());
        assert_ne!(stage.world().map(World::generation), generation);
        assert_eq!(cloud(&stage).len(), 500);
        // Rebuilt from the current config, so the size survives.
        assert_eq!(cloud(&stage).point_size, 4.0);
    }

    #[test]
    fn validates_ranges() {
        let mut config = GalaxyConfig::default();
        assert!(config.apply(&GalaxyChange::Count(10)).is_err());
        assert!(config.apply(&GalaxyChange::Branches(1)).is_err());
        assert!(config.apply(&GalaxyChange::RandomnessPower(0.5)).is_err());
        assert_eq!(config.apply(&GalaxyChange::Branches(5)), Ok(true));
        assert_eq!(
            GalaxyConfig::parse_change("insideColor", "#ffffff"),
            Ok(GalaxyChange::InsideColor(Color::white()))
        );
    }

    #[test]
    fn branch_step_wraps() {
        let mut config = GalaxyConfig { branches: BRANCH_RANGE.1, ..GalaxyConfig::default() };
        assert_eq!(GalaxyDemo.key_binding(Key::B, &config), Some(GalaxyChange::NextBranches));
        assert_eq!(config.apply(&GalaxyChange::NextBranches), Ok(true));
        assert_eq!(config.branches, BRANCH_RANGE.0);

        let seed = config.seed;
        config.apply(&GalaxyChange::Reseed).unwrap();
        assert_eq!(config.seed, seed + 1);

        config.spin = SPIN_RANGE.1;
        assert_eq!(config.apply(&GalaxyChange::SpinStep(SPIN_STEP)), Ok(false));
    }

    #[test]
    fn each_key_press_before_a_tick_counts() {
        let press = |key| InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), GalaxyDemo);
        stage.mount(small());
        for key in [Key::B, Key::B, Key::R, Key::R, Key::Plus, Key::Plus] {
            assert!(stage.on_input(&press(key)));
        }
        stage.step(FixedClock::new(1.0 / 60.0).tick());

        let defaults = small();
        let config = stage.config().expect("mounted");
        assert_eq!(config.branches, defaults.branches + 2);
        assert_eq!(config.seed, defaults.seed + 2);
        assert!((config.spin - (defaults.spin + 2.0 * SPIN_STEP)).abs() < 1e-6);
        assert_eq!(cloud(&stage).positions, synthesize(config).positions);
    }
}
