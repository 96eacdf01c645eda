//! Spinning, bobbing cube with a small configuration surface.

use glam::Vec3;
use lumen_engine::coords::{Color, ViewportState};
use lumen_engine::input::Key;
use lumen_engine::lifecycle::{ConfigError, Content, Reconfigure, SceneConfig};
use lumen_engine::scene::{
    Animation, Camera, DragAxes, Geometry, Light, Material, MaterialVariant, ObjectKind, World,
};

use crate::replace;

/// Allowed cube colors, `#rrggbb`. Keys 1-6 select them in order.
pub const PALETTE_HEX: [&str; 6] = ["#00ff88", "#ff0066", "#00aaff", "#ffaa00", "#aa00ff", "#ffffff"];

pub const SIZE_RANGE: (f32, f32) = (0.5, 4.0);
pub const SPEED_RANGE: (f32, f32) = (0.1, 3.0);

/// Radians per tick at `rotation_speed == 1`.
pub const BASE_SPIN: f32 = 0.01;
pub const BOB_AMPLITUDE: f32 = 0.2;

const SPEED_STEP: f32 = 0.1;

pub fn palette() -> [Color; 6] {
    [
        Color::from_srgb_u8(0x00, 0xff, 0x88, 0xff),
        Color::from_srgb_u8(0xff, 0x00, 0x66, 0xff),
        Color::from_srgb_u8(0x00, 0xaa, 0xff, 0xff),
        Color::from_srgb_u8(0xff, 0xaa, 0x00, 0xff),
        Color::from_srgb_u8(0xaa, 0x00, 0xff, 0xff),
        Color::from_srgb_u8(0xff, 0xff, 0xff, 0xff),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubeConfig {
    /// One of [`palette`].
    pub color: Color,
    pub size: f32,
    pub auto_rotate: bool,
    pub rotation_speed: f32,
    pub material: MaterialVariant,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            color: palette()[0],
            size: 1.0,
            auto_rotate: true,
            rotation_speed: 1.0,
            material: MaterialVariant::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CubeChange {
    Color(Color),
    Size(f32),
    AutoRotate(bool),
    RotationSpeed(f32),
    Material(MaterialVariant),
    /// Flips `auto_rotate` relative to its value when applied.
    ToggleAutoRotate,
    /// Adds to `rotation_speed`, clamped to [`SPEED_RANGE`].
    SpeedStep(f32),
}

impl SceneConfig for CubeConfig {
    type Change = CubeChange;

    fn apply(&mut self, change: &CubeChange) -> Result<bool, ConfigError> {
        match *change {
            CubeChange::Color(c) => {
                if !palette().contains(&c) {
                    return Err(ConfigError::NotInPalette(c.to_hex()));
                }
                Ok(replace(&mut self.color, c))
            }
            CubeChange::Size(s) => {
                let s = ConfigError::check_range("size", s, SIZE_RANGE.0, SIZE_RANGE.1)?;
                Ok(replace(&mut self.size, s))
            }
            CubeChange::AutoRotate(on) => Ok(replace(&mut self.auto_rotate, on)),
            CubeChange::RotationSpeed(v) => {
                let v = ConfigError::check_range("rotation_speed", v, SPEED_RANGE.0, SPEED_RANGE.1)?;
                Ok(replace(&mut self.rotation_speed, v))
            }
            CubeChange::Material(m) => Ok(replace(&mut self.material, m)),
            CubeChange::ToggleAutoRotate => {
                self.auto_rotate = !self.auto_rotate;
                Ok(true)
            }
            CubeChange::SpeedStep(step) => {
                let v = (self.rotation_speed + step).clamp(SPEED_RANGE.0, SPEED_RANGE.1);
                Ok(replace(&mut self.rotation_speed, v))
            }
        }
    }

    fn parse_change(key: &str, value: &str) -> Result<CubeChange, ConfigError> {
        let change = match key {
            "color" => CubeChange::Color(ConfigError::parse(key, value)?),
            "size" => CubeChange::Size(ConfigError::parse(key, value)?),
            "auto_rotate" | "autoRotate" => CubeChange::AutoRotate(ConfigError::parse(key, value)?),
            "rotation_speed" | "rotationSpeed" | "speed" => {
                CubeChange::RotationSpeed(ConfigError::parse(key, value)?)
            }
            "material" => CubeChange::Material(ConfigError::parse(key, value)?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(change)
    }
}

/// Name of the cube object in the world.
pub const CUBE: &str = "cube";

#[derive(Debug, Default, Clone, Copy)]
pub struct CubeDemo;

impl CubeDemo {
    fn spin_rate(config: &CubeConfig) -> Vec3 {
        let r = BASE_SPIN * config.rotation_speed;
        Vec3::new(r, r, 0.0)
    }
}

impl Content for CubeDemo {
    type Config = CubeConfig;

    fn name(&self) -> &'static str {
        "cube"
    }

    fn camera(&self, _config: &CubeConfig) -> Camera {
        Camera::perspective(75.0, 0.1, 1000.0)
            .looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
            .with_distance_limits(2.0, 20.0)
    }

    fn build(&self, config: &CubeConfig, _viewport: &ViewportState, world: &mut World) {
        world.background = Color::from_srgb_u8(0x0a, 0x0a, 0x0f, 0xff);

        world.add_light(Light::ambient(Color::white(), 0.5));
        world
            .add_light(Light::point(Color::white(), 1.0, 50.0))
            .at(Vec3::new(5.0, 5.0, 5.0));

        // Unit cube scaled by `size`, so size changes never touch geometry.
        let geometry = world.add_geometry(Geometry::cube(1.0));
        world
            .spawn(ObjectKind::mesh(
                geometry,
                Material::solid(config.color).with_variant(config.material),
            ))
            .named(CUBE)
            .scaled(Vec3::splat(config.size))
            .draggable(DragAxes::BOTH)
            .animate(Animation::Spin {
                rate: Self::spin_rate(config),
                enabled: config.auto_rotate,
            })
            .animate(Animation::bob(BOB_AMPLITUDE, 1.0));
    }

    fn reconfigure(&self, config: &CubeConfig, change: &CubeChange, world: &mut World) -> Reconfigure {
        let Some(cube) = world.named_mut(CUBE) else {
            return Reconfigure::Rebuild;
        };
        match change {
            CubeChange::Color(_) => {
                cube.set_color(config.color);
            }
            CubeChange::Material(_) => {
                cube.set_variant(config.material);
            }
            CubeChange::Size(_) => cube.set_uniform_scale(config.size),
            CubeChange::AutoRotate(_)
            | CubeChange::RotationSpeed(_)
            | CubeChange::ToggleAutoRotate
            | CubeChange::SpeedStep(_) => {
                if !cube.set_spin(Self::spin_rate(config), config.auto_rotate) {
                    return Reconfigure::Rebuild;
                }
            }
        }
        Reconfigure::Applied
    }

    fn key_binding(&self, key: Key, _config: &CubeConfig) -> Option<CubeChange> {
        if let Some(d) = key.digit() {
            let i = usize::from(d).checked_sub(1)?;
            return palette().get(i).copied().map(CubeChange::Color);
        }
        match key {
            Key::S => Some(CubeChange::Material(MaterialVariant::Solid)),
            Key::W => Some(CubeChange::Material(MaterialVariant::Wireframe)),
            Key::M => Some(CubeChange::Material(MaterialVariant::Metallic)),
            Key::G => Some(CubeChange::Material(MaterialVariant::Glass)),
            Key::A => Some(CubeChange::ToggleAutoRotate),
            Key::Plus => Some(CubeChange::SpeedStep(SPEED_STEP)),
            Key::Minus => Some(CubeChange::SpeedStep(-SPEED_STEP)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::headless::HeadlessMount;
    use lumen_engine::input::{InputEvent, KeyState, Modifiers};
    use lumen_engine::lifecycle::{FrameOutcome, Stage};
    use lumen_engine::scene::SceneObject;
    use lumen_engine::time::FixedClock;

    use super::*;

    fn stage(config: CubeConfig) -> Stage<HeadlessMount, CubeDemo> {
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), CubeDemo);
        stage.mount(config);
        stage
    }

    fn cube(stage: &Stage<HeadlessMount, CubeDemo>) -> &SceneObject {
        stage.world().and_then(|w| w.named(CUBE)).expect("cube is built")
    }

    #[test]
    fn palette_matches_hex_list() {
        for (hex, color) in PALETTE_HEX.iter().zip(palette()) {
            assert_eq!(Color::from_hex(hex).unwrap(), color);
        }
    }

    #[test]
    fn one_tick_spins_and_bobs() {
        let config = CubeConfig { rotation_speed: 2.0, ..CubeConfig::default() };
        let mut stage = stage(config);
        let mut clock = FixedClock::new(0.5);
        let t = clock.tick();
        assert_eq!(stage.step(t), Some(FrameOutcome::Drawn));

        let tr = cube(&stage).transform;
        assert!((tr.rotation.x - 0.02).abs() < 1e-6);
        assert!((tr.rotation.y - 0.02).abs() < 1e-6);
        assert!((tr.position.y - t.elapsed.sin() * BOB_AMPLITUDE).abs() < 1e-6);
    }

    #[test]
    fn mounted_from_options_advances_one_tick() {
        let mut config = CubeConfig::default();
        let options: Vec<(String, String)> = [
            ("color", "#00ff88"),
            ("size", "1.5"),
            ("autoRotate", "true"),
            ("speed", "1.0"),
            ("material", "solid"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        lumen_engine::lifecycle::apply_options(&mut config, &options).unwrap();

        let mut stage = stage(config);
        let t = FixedClock::new(0.016).tick();
        stage.step(t);

        let tr = cube(&stage).transform;
        assert!((tr.rotation.x - 0.01).abs() < 1e-6);
        assert!((tr.rotation.y - 0.01).abs() < 1e-6);
        assert!((tr.position.y - t.elapsed.sin() * 0.2).abs() < 1e-6);
        assert_eq!(tr.scale, Vec3::splat(1.5));
    }

    #[test]
    fn auto_rotate_off_keeps_the_bob() {
        let config = CubeConfig { auto_rotate: false, ..CubeConfig::default() };
        let mut stage = stage(config);
        let mut clock = FixedClock::new(1.0);
        stage.step(clock.tick());
        let tr = cube(&stage).transform;
        assert_eq!(tr.rotation, Vec3::ZERO);
        assert!((tr.position.y - 1.0f32.sin() * BOB_AMPLITUDE).abs() < 1e-6);
    }

    #[test]
    fn option_round_trip_restores_rendered_attributes() {
        let mut stage = stage(CubeConfig::default());
        let mut clock = FixedClock::new(1.0 / 60.0);
        let snapshot = |s: &Stage<HeadlessMount, CubeDemo>| {
            let c = cube(s);
            (c.kind.clone(), c.transform.scale, c.animations.len())
        };
        let original = snapshot(&stage);

        for (forward, back) in [
            (CubeChange::Color(palette()[3]), CubeChange::Color(palette()[0])),
            (CubeChange::Size(3.0), CubeChange::Size(1.0)),
            (
                CubeChange::Material(MaterialVariant::Glass),
                CubeChange::Material(MaterialVariant::Solid),
            ),
        ] {
            stage.post_change(forward);
            stage.step(clock.tick());
            assert_ne!(snapshot(&stage), original);
            stage.post_change(back);
            stage.step(clock.tick());
            assert_eq!(snapshot(&stage), original);
        }
        assert_eq!(stage.config(), Some(&CubeConfig::default()));
    }

    #[test]
    fn changes_apply_without_rebuilding() {
        let mut stage = stage(CubeConfig::default());
        let mut clock = FixedClock::new(1.0 / 60.0);
        let generation = stage.world().map(World::generation);

        stage.post_change(CubeChange::Size(2.5));
        stage.post_change(CubeChange::RotationSpeed(3.0));
        stage.step(clock.tick());

        assert_eq!(stage.world().map(World::generation), generation);
        assert_eq!(cube(&stage).transform.scale, Vec3::splat(2.5));
    }

    #[test]
    fn out_of_range_and_off_palette_values_are_rejected() {
        let mut config = CubeConfig::default();
        assert!(matches!(
            config.apply(&CubeChange::Size(4.5)),
            Err(ConfigError::OutOfRange { key: "size", .. })
        ));
        assert!(matches!(
            config.apply(&CubeChange::RotationSpeed(0.0)),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            config.apply(&CubeChange::Color(Color::rgb(0.1, 0.2, 0.3))),
            Err(ConfigError::NotInPalette(_))
        ));
        assert_eq!(config, CubeConfig::default());
        assert_eq!(config.apply(&CubeChange::Size(4.0)), Ok(true));
        assert_eq!(config.apply(&CubeChange::Size(4.0)), Ok(false));
    }

    #[test]
    fn parses_option_strings() {
        assert_eq!(
            CubeConfig::parse_change("color", "#ff0066"),
            Ok(CubeChange::Color(palette()[1]))
        );
        assert_eq!(
            CubeConfig::parse_change("material", "Metallic"),
            Ok(CubeChange::Material(MaterialVariant::Metallic))
        );
        assert_eq!(CubeConfig::parse_change("autoRotate", "false"), Ok(CubeChange::AutoRotate(false)));
        assert!(CubeConfig::parse_change("size", "huge").is_err());
        assert!(matches!(
            CubeConfig::parse_change("shape", "torus"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn key_bindings() {
        let demo = CubeDemo;
        let config = CubeConfig::default();
        assert_eq!(demo.key_binding(Key::Digit2, &config), Some(CubeChange::Color(palette()[1])));
        assert_eq!(demo.key_binding(Key::Digit0, &config), None);
        assert_eq!(demo.key_binding(Key::Digit7, &config), None);
        assert_eq!(demo.key_binding(Key::A, &config), Some(CubeChange::ToggleAutoRotate));
        assert_eq!(demo.key_binding(Key::Minus, &config), Some(CubeChange::SpeedStep(-SPEED_STEP)));
    }

    #[test]
    fn speed_steps_clamp_to_the_range() {
        let mut config = CubeConfig { rotation_speed: 2.95, ..CubeConfig::default() };
        assert_eq!(config.apply(&CubeChange::SpeedStep(SPEED_STEP)), Ok(true));
        assert_eq!(config.rotation_speed, SPEED_RANGE.1);
        assert_eq!(config.apply(&CubeChange::SpeedStep(SPEED_STEP)), Ok(false));

        config.rotation_speed = 0.15;
        config.apply(&CubeChange::SpeedStep(-SPEED_STEP)).unwrap();
        assert_eq!(config.rotation_speed, SPEED_RANGE.0);
    }

    #[test]
    fn repeated_key_presses_before_a_tick_all_count() {
        let press = |key| InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let mut stage = stage(CubeConfig::default());
        for key in [Key::A, Key::A, Key::Plus, Key::Plus] {
            assert!(stage.on_input(&press(key)));
        }
        stage.step(FixedClock::new(1.0 / 60.0).tick());

        let config = stage.config().expect("mounted");
        assert!(config.auto_rotate);
        assert!((config.rotation_speed - 1.2).abs() < 1e-5);
        let Some(Animation::Spin { rate, enabled }) = cube(&stage).animations.first() else {
            panic!("cube spins");
        };
        assert!(*enabled);
        assert!((rate.x - BASE_SPIN * 1.2).abs() < 1e-6);
    }
}
