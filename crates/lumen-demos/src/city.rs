//! Night city: seeded building grid with neon trims, traffic, drones and rain.

use glam::Vec3;
use lumen_engine::coords::{Color, ViewportState};
use lumen_engine::input::Key;
use lumen_engine::lifecycle::{ConfigError, Content, Reconfigure, SceneConfig};
use lumen_engine::scene::{
    Animation, Camera, Geometry, Light, Material, MaterialVariant, ObjectKind, PointCloud, RainField,
    Transform, World,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{check_count, replace};

pub const GRID_RANGE: (usize, usize) = (2, 16);
pub const SPACING_RANGE: (f32, f32) = (1.5, 5.0);
pub const HEIGHT_RANGE: (f32, f32) = (2.0, 30.0);
pub const CAR_RANGE: (usize, usize) = (0, 64);
/// Each drone carries a point light; the renderer shades at most four.
pub const DRONE_RANGE: (usize, usize) = (0, 4);
pub const RAIN_RANGE: (usize, usize) = (0, 50_000);

pub const RAIN_CEILING: f32 = 20.0;
pub const RAIN_BAND: f32 = 5.0;

/// Neon colors cycled by the `N` key.
pub const NEON_HEX: [&str; 4] = ["#ff00ff", "#00ffff", "#ffea00", "#39ff14"];

pub const BUILDING_PREFIX: &str = "building:";
pub const NEON_PREFIX: &str = "neon:";
pub const CAR_PREFIX: &str = "car:";
pub const DRONE_PREFIX: &str = "drone:";
pub const DRONE_LIGHT_PREFIX: &str = "drone-light:";
pub const RAIN: &str = "rain";

const CAR_HEIGHT: f32 = 0.15;

pub fn neon_palette() -> [Color; 4] {
    [
        Color::from_srgb_u8(0xff, 0x00, 0xff, 0xff),
        Color::from_srgb_u8(0x00, 0xff, 0xff, 0xff),
        Color::from_srgb_u8(0xff, 0xea, 0x00, 0xff),
        Color::from_srgb_u8(0x39, 0xff, 0x14, 0xff),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityConfig {
    /// Buildings per side.
    pub grid: usize,
    /// Distance between building centers.
    pub spacing: f32,
    pub max_height: f32,
    pub cars: usize,
    pub drones: usize,
    pub rain: bool,
    pub rain_count: usize,
    pub neon: Color,
    pub seed: u64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            grid: 8,
            spacing: 2.5,
            max_height: 10.0,
            cars: 12,
            drones: 3,
            rain: true,
            rain_count: 4_000,
            neon: neon_palette()[0],
            seed: 7,
        }
    }
}

impl CityConfig {
    /// Half the side of the square the city occupies.
    pub fn half_extent(&self) -> f32 {
        self.grid as f32 * self.spacing * 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CityChange {
    Grid(usize),
    Spacing(f32),
    MaxHeight(f32),
    Cars(usize),
    Drones(usize),
    Rain(bool),
    RainCount(usize),
    Neon(Color),
    Seed(u64),
    ToggleRain,
    /// The next color in [`neon_palette`]; an off-palette color restarts it.
    NextNeon,
}

impl SceneConfig for CityConfig {
    type Change = CityChange;

    fn apply(&mut self, change: &CityChange) -> Result<bool, ConfigError> {
        let changed = match *change {
            CityChange::Grid(n) => replace(&mut self.grid, check_count("grid", n, GRID_RANGE)?),
            CityChange::Spacing(s) => replace(
                &mut self.spacing,
                ConfigError::check_range("spacing", s, SPACING_RANGE.0, SPACING_RANGE.1)?,
            ),
            CityChange::MaxHeight(h) => replace(
                &mut self.max_height,
                ConfigError::check_range("max_height", h, HEIGHT_RANGE.0, HEIGHT_RANGE.1)?,
            ),
            CityChange::Cars(n) => replace(&mut self.cars, check_count("cars", n, CAR_RANGE)?),
            CityChange::Drones(n) => replace(&mut self.drones, check_count("drones", n, DRONE_RANGE)?),
            CityChange::Rain(on) => replace(&mut self.rain, on),
            CityChange::RainCount(n) => {
                replace(&mut self.rain_count, check_count("rain_count", n, RAIN_RANGE)?)
            }
            CityChange::Neon(c) => replace(&mut self.neon, c),
            CityChange::Seed(s) => replace(&mut self.seed, s),
            CityChange::ToggleRain => {
                self.rain = !self.rain;
                true
            }
            CityChange::NextNeon => {
                let palette = neon_palette();
                let next = palette
                    .iter()
                    .position(|c| *c == self.neon)
                    .map_or(0, |i| (i + 1) % palette.len());
                replace(&mut self.neon, palette[next])
            }
        };
        Ok(changed)
    }

    fn parse_change(key: &str, value: &str) -> Result<CityChange, ConfigError> {
        let change = match key {
            "grid" => CityChange::Grid(ConfigError::parse(key, value)?),
            "spacing" => CityChange::Spacing(ConfigError::parse(key, value)?),
            "max_height" | "maxHeight" => CityChange::MaxHeight(ConfigError::parse(key, value)?),
            "cars" => CityChange::Cars(ConfigError::parse(key, value)?),
            "drones" => CityChange::Drones(ConfigError::parse(key, value)?),
            "rain" => CityChange::Rain(ConfigError::parse(key, value)?),
            "rain_count" | "rainCount" => CityChange::RainCount(ConfigError::parse(key, value)?),
            "neon" => CityChange::Neon(ConfigError::parse(key, value)?),
            "seed" => CityChange::Seed(ConfigError::parse(key, value)?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(change)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CityDemo;

impl CityDemo {
    fn buildings(config: &CityConfig, rng: &mut StdRng, world: &mut World) {
        let block = world.add_geometry(Geometry::cube(1.0));
        let half = config.half_extent();
        let footprint = config.spacing * 0.6;
        let neon = Material::solid(config.neon).with_emissive(1.0);

        for gx in 0..config.grid {
            for gz in 0..config.grid {
                let i = gx * config.grid + gz;
                let x = -half + (gx as f32 + 0.5) * config.spacing;
                let z = -half + (gz as f32 + 0.5) * config.spacing;
                let height = rng.random_range(1.0..=config.max_height);
                let shade = rng.random_range(0.08..0.2);

                world
                    .spawn(ObjectKind::mesh(
                        block,
                        Material::solid(Color::rgb(shade, shade, shade * 1.4))
                            .with_variant(MaterialVariant::Metallic),
                    ))
                    .named(format!("{BUILDING_PREFIX}{i}"))
                    .with_transform(
                        Transform::at(Vec3::new(x, height * 0.5, z))
                            .with_scale(Vec3::new(footprint, height, footprint)),
                    );

                world
                    .spawn(ObjectKind::mesh(block, neon))
                    .named(format!("{NEON_PREFIX}{i}"))
                    .with_transform(
                        Transform::at(Vec3::new(x, height, z))
                            .with_scale(Vec3::new(footprint * 1.05, 0.1, footprint * 1.05)),
                    );
            }
        }
    }

    /// Cars drive along the streets between building rows, one axis pinned.
    fn cars(config: &CityConfig, rng: &mut StdRng, world: &mut World) {
        let body = world.add_geometry(Geometry::Box { width: 0.3, height: 0.2, depth: 0.6 });
        let half = config.half_extent();
        let streets = config.grid.saturating_sub(1).max(1);

        for i in 0..config.cars {
            let street = -half + rng.random_range(1..=streets) as f32 * config.spacing;
            let along = rng.random_range(-half..=half);
            let speed = rng.random_range(2.0..6.0) * if rng.random::<bool>() { 1.0 } else { -1.0 };
            let color = if i % 2 == 0 {
                Color::rgb(1.0, 0.95, 0.8)
            } else {
                Color::rgb(1.0, 0.15, 0.1)
            };

            let (start, velocity, min, max) = if rng.random::<bool>() {
                (
                    Vec3::new(along, CAR_HEIGHT, street),
                    Vec3::new(speed, 0.0, 0.0),
                    Vec3::new(-half, CAR_HEIGHT, street),
                    Vec3::new(half, CAR_HEIGHT, street),
                )
            } else {
                (
                    Vec3::new(street, CAR_HEIGHT, along),
                    Vec3::new(0.0, 0.0, speed),
                    Vec3::new(street, CAR_HEIGHT, -half),
                    Vec3::new(street, CAR_HEIGHT, half),
                )
            };

            world
                .spawn(ObjectKind::mesh(body, Material::solid(color).with_emissive(0.6)))
                .named(format!("{CAR_PREFIX}{i}"))
                .at(start)
                .animate(Animation::drift(velocity, min, max));
        }
    }

    /// Each drone is a small body plus a point light flying the same orbit.
    fn drones(config: &CityConfig, rng: &mut StdRng, world: &mut World) {
        let body = world.add_geometry(Geometry::sphere(0.2));
        let half = config.half_extent();

        for i in 0..config.drones {
            let radius = rng.random_range(half * 0.3..=half.max(1.0));
            let height = rng.random_range(config.max_height * 0.6..=config.max_height + 3.0);
            let speed = rng.random_range(0.3..0.8) * if i % 2 == 0 { 1.0 } else { -1.0 };
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let orbit = Animation::orbit(Vec3::ZERO, radius, height, speed, angle);
            let color = neon_palette()[i % 4];

            world
                .spawn(ObjectKind::mesh(body, Material::solid(color).with_emissive(1.0)))
                .named(format!("{DRONE_PREFIX}{i}"))
                .animate(orbit.clone());
            world
                .add_light(Light::point(color, 2.0, config.spacing * 4.0))
                .named(format!("{DRONE_LIGHT_PREFIX}{i}"))
                .animate(orbit);
        }
    }

    fn rain(config: &CityConfig, rng: &mut StdRng, world: &mut World) {
        if config.rain_count == 0 {
            return;
        }
        let spread = config.half_extent() + config.spacing;
        let n = config.rain_count;
        let positions = (0..n)
            .map(|_| {
                [
                    rng.random_range(-spread..=spread),
                    rng.random_range(0.0..=RAIN_CEILING),
                    rng.random_range(-spread..=spread),
                ]
            })
            .collect();
        let velocities = (0..n).map(|_| rng.random_range(0.1..0.3)).collect();
        let colors = vec![[0.6, 0.7, 0.9]; n];

        let cloud = PointCloud::new(positions, colors, Vec::new()).with_point_size(1.5);
        let object = world
            .spawn(ObjectKind::Points(cloud))
            .named(RAIN)
            .animate(Animation::Rain(RainField::new(
                velocities,
                RAIN_CEILING,
                spread,
                RAIN_BAND,
                rng.random(),
            )));
        object.visible = config.rain;
    }
}

impl Content for CityDemo {
    type Config = CityConfig;

    fn name(&self) -> &'static str {
        "city"
    }

    fn camera(&self, _config: &CityConfig) -> Camera {
        Camera::perspective(60.0, 0.1, 500.0)
            .looking_at(Vec3::new(0.0, 12.0, 22.0), Vec3::new(0.0, 2.0, 0.0))
            .with_distance_limits(5.0, 120.0)
    }

    fn build(&self, config: &CityConfig, _viewport: &ViewportState, world: &mut World) {
        let mut rng = StdRng::seed_from_u64(config.seed);

        world.background = Color::from_srgb_u8(0x05, 0x01, 0x0f, 0xff);
        world.add_light(Light::ambient(Color::rgb(0.5, 0.55, 0.8), 0.25));
        world.add_light(Light::directional(
            Color::rgb(0.6, 0.65, 1.0),
            0.4,
            Vec3::new(0.3, -1.0, -0.4),
        ));

        let side = config.half_extent() * 2.0 + config.spacing * 2.0;
        let ground = world.add_geometry(Geometry::Plane { width: side, depth: side });
        world
            .spawn(ObjectKind::mesh(ground, Material::solid(Color::rgb(0.04, 0.04, 0.06))))
            .named("ground");

        Self::buildings(config, &mut rng, world);
        Self::cars(config, &mut rng, world);
        Self::drones(config, &mut rng, world);
        Self::rain(config, &mut rng, world);
    }

    fn reconfigure(&self, config: &CityConfig, change: &CityChange, world: &mut World) -> Reconfigure {
        match change {
            CityChange::Neon(_) | CityChange::NextNeon => {
                for trim in world.prefixed_mut(NEON_PREFIX) {
                    trim.set_color(config.neon);
                }
                Reconfigure::Applied
            }
            CityChange::Rain(_) | CityChange::ToggleRain => match world.named_mut(RAIN) {
                Some(rain) => {
                    rain.visible = config.rain;
                    Reconfigure::Applied
                }
                None => Reconfigure::Rebuild,
            },
            _ => Reconfigure::Rebuild,
        }
    }

    fn key_binding(&self, key: Key, _config: &CityConfig) -> Option<CityChange> {
        match key {
            Key::R => Some(CityChange::ToggleRain),
            Key::N => Some(CityChange::NextNeon),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::headless::HeadlessMount;
    use lumen_engine::input::{InputEvent, KeyState, Modifiers};
    use lumen_engine::lifecycle::Stage;
    use lumen_engine::scene::SceneObject;
    use lumen_engine::time::FixedClock;

    use super::*;

    fn build(config: &CityConfig) -> World {
        let mut world = World::new();
        CityDemo.build(config, &ViewportState::new(800.0, 600.0, 1.0), &mut world);
        world
    }

    fn count(world: &World, prefix: &str) -> usize {
        world
            .objects()
            .iter()
            .filter(|o| o.name.as_deref().is_some_and(|n| n.starts_with(prefix)))
            .count()
    }

    fn mounted(config: CityConfig) -> Stage<HeadlessMount, CityDemo> {
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), CityDemo);
        stage.mount(config);
        stage
    }

    fn rain_of(stage: &Stage<HeadlessMount, CityDemo>) -> (Vec<[f32; 3]>, RainField) {
        let rain = stage.world().and_then(|w| w.named(RAIN)).expect("rain is built");
        let ObjectKind::Points(cloud) = &rain.kind else {
            panic!("rain is not a point cloud");
        };
        let field = rain
            .animations
            .iter()
            .find_map(|a| match a {
                Animation::Rain(field) => Some(field.clone()),
                _ => None,
            })
            .expect("rain field");
        (cloud.positions.clone(), field)
    }

    #[test]
    fn builds_the_requested_counts() {
        let config = CityConfig { grid: 5, cars: 7, drones: 2, ..CityConfig::default() };
        let world = build(&config);
        assert_eq!(count(&world, BUILDING_PREFIX), 25);
        assert_eq!(count(&world, NEON_PREFIX), 25);
        assert_eq!(count(&world, CAR_PREFIX), 7);
        assert_eq!(count(&world, DRONE_PREFIX), 2);
        assert_eq!(count(&world, DRONE_LIGHT_PREFIX), 2);
        assert_eq!(world.point_count(), config.rain_count);
        assert!(world.named("ground").is_some());
    }

    #[test]
    fn buildings_are_seeded_and_bounded() {
        let config = CityConfig::default();
        let heights = |w: &World| -> Vec<f32> {
            w.objects()
                .iter()
                .filter(|o| o.name.as_deref().is_some_and(|n| n.starts_with(BUILDING_PREFIX)))
                .map(|o| o.transform.scale.y)
                .collect()
        };
        let a = heights(&build(&config));
        assert_eq!(a, heights(&build(&config)));
        assert_ne!(a, heights(&build(&CityConfig { seed: 99, ..config.clone() })));
        assert!(a.iter().all(|h| (1.0..=config.max_height).contains(h)));
    }

    #[test]
    fn rain_falls_by_velocity_and_respawns_above_the_ceiling() {
        let mut stage = mounted(CityConfig { rain_count: 500, ..CityConfig::default() });
        let mut clock = FixedClock::new(1.0 / 60.0);
        let mut respawned = 0;

        for _ in 0..120 {
            let (before, field) = rain_of(&stage);
            stage.step(clock.tick());
            let (after, _) = rain_of(&stage);

            for ((b, a), v) in before.iter().zip(&after).zip(&field.velocities) {
                let fallen = b[1] - v;
                if fallen >= 0.0 {
                    assert_eq!(a[1], fallen);
                    assert_eq!((a[0], a[2]), (b[0], b[2]));
                } else {
                    respawned += 1;
                    assert!(a[1] >= field.ceiling && a[1] <= field.ceiling + field.band);
                    assert!(a[0].abs() <= field.spread && a[2].abs() <= field.spread);
                }
            }
        }
        assert!(respawned > 0);
    }

    #[test]
    fn cars_stay_on_their_street() {
        let config = CityConfig { cars: 20, ..CityConfig::default() };
        let mut stage = mounted(config.clone());
        let mut clock = FixedClock::new(0.1);
        let half = config.half_extent();
        let cars = |s: &Stage<HeadlessMount, CityDemo>| -> Vec<SceneObject> {
            s.world()
                .map(|w| {
                    w.objects()
                        .iter()
                        .filter(|o| o.name.as_deref().is_some_and(|n| n.starts_with(CAR_PREFIX)))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };
        let start = cars(&stage);

        for _ in 0..200 {
            stage.step(clock.tick());
        }
        for (s, e) in start.iter().zip(cars(&stage)) {
            let (p0, p1) = (s.transform.position, e.transform.position);
            assert!(p1.x.abs() <= half + 1e-4 && p1.z.abs() <= half + 1e-4);
            assert_eq!(p1.y, CAR_HEIGHT);
            // Exactly one horizontal axis is pinned.
            assert!(p0.x == p1.x || p0.z == p1.z);
        }
    }

    #[test]
    fn drone_lights_follow_their_drones() {
        let mut stage = mounted(CityConfig::default());
        let mut clock = FixedClock::new(0.05);
        for _ in 0..30 {
            stage.step(clock.tick());
        }
        let world = stage.world().expect("mounted");
        for i in 0..3 {
            let body = world.named(&format!("{DRONE_PREFIX}{i}")).map(|o| o.transform.position);
            let light = world.named(&format!("{DRONE_LIGHT_PREFIX}{i}")).map(|o| o.transform.position);
            assert!(body.is_some());
            assert_eq!(body, light);
        }
    }

    #[test]
    fn rain_toggle_and_neon_apply_in_place() {
        let mut stage = mounted(CityConfig::default());
        let mut clock = FixedClock::new(1.0 / 60.0);
        let generation = stage.world().map(World::generation);

        stage.post_change(CityChange::Rain(false));
        stage.post_change(CityChange::Neon(neon_palette()[2]));
        stage.step(clock.tick());

        let world = stage.world().expect("mounted");
        assert_eq!(Some(world.generation()), generation);
        assert_eq!(world.named(RAIN).map(|r| r.visible), Some(false));
        let trim = world.named(&format!("{NEON_PREFIX}0")).and_then(|o| o.kind.material());
        assert_eq!(trim.map(|m| m.color), Some(neon_palette()[2]));

        stage.post_change(CityChange::Grid(3));
        stage.step(clock.tick());
        let world = stage.world().expect("mounted");
        assert_ne!(Some(world.generation()), generation);
        assert_eq!(count(world, BUILDING_PREFIX), 9);
        assert_eq!(world.named(RAIN).map(|r| r.visible), Some(false));
    }

    #[test]
    fn drone_count_is_capped_by_the_light_budget() {
        let mut config = CityConfig::default();
        assert!(config.apply(&CityChange::Drones(5)).is_err());
        assert_eq!(config.apply(&CityChange::Drones(4)), Ok(true));
    }

    #[test]
    fn neon_key_cycles_the_palette() {
        let last = neon_palette().len() - 1;
        let mut config = CityConfig { neon: neon_palette()[last], ..CityConfig::default() };
        assert_eq!(CityDemo.key_binding(Key::N, &config), Some(CityChange::NextNeon));
        assert_eq!(config.apply(&CityChange::NextNeon), Ok(true));
        assert_eq!(config.neon, neon_palette()[0]);

        config.neon = Color::rgb(0.5, 0.5, 0.5);
        config.apply(&CityChange::NextNeon).unwrap();
        assert_eq!(config.neon, neon_palette()[0]);
        assert_eq!(CityDemo.key_binding(Key::R, &config), Some(CityChange::ToggleRain));
    }

    #[test]
    fn every_queued_key_press_is_applied() {
        let press = |key| InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let mut stage = mounted(CityConfig::default());
        let rain = CityConfig::default().rain;
        for key in [Key::R, Key::R, Key::R, Key::N, Key::N] {
            assert!(stage.on_input(&press(key)));
        }
        stage.step(FixedClock::new(1.0 / 60.0).tick());

        let config = stage.config().expect("mounted");
        assert_eq!(config.rain, !rain);
        let world = stage.world().expect("mounted");
        assert_eq!(world.named(RAIN).map(|r| r.visible), Some(!rain));
        assert_eq!(config.neon, neon_palette()[2]);
    }

    #[test]
    fn neon_hex_matches_palette() {
        for (hex, c) in NEON_HEX.iter().zip(neon_palette()) {
            assert_eq!(Color::from_hex(hex), Ok(c));
        }
    }
}
