//! Procedural block text built from the glyph table, one box per stroke.

use glam::Vec3;
use lumen_engine::coords::{Color, ViewportState};
use lumen_engine::input::Key;
use lumen_engine::lifecycle::{ConfigError, Content, Reconfigure, SceneConfig};
use lumen_engine::scene::{
    Animation, Camera, Geometry, Light, Material, MaterialVariant, ObjectKind, Transform, World,
};

use crate::cube::palette;
use crate::glyph::{self, GRID_HEIGHT, GRID_WIDTH};
use crate::replace;

pub const MAX_CHARS: usize = 32;
pub const LETTER_SIZE_RANGE: (f32, f32) = (0.2, 3.0);
pub const SPACING_RANGE: (f32, f32) = (0.0, 2.0);

/// Stroke thickness in grid units.
const THICKNESS: f32 = 0.8;
/// Extrusion depth as a fraction of the letter height.
const DEPTH: f32 = 0.3;
const WAVE_AMPLITUDE: f32 = 0.15;
const WAVE_FREQUENCY: f32 = 2.0;
/// Phase offset between consecutive letters, radians.
const WAVE_PHASE_STEP: f32 = 0.5;

/// Prefix of every stroke object: `glyph:{letter}:{stroke}`.
pub const GLYPH_PREFIX: &str = "glyph:";

#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub text: String,
    pub color: Color,
    /// Letter height in world units.
    pub letter_size: f32,
    /// Gap between letters, in letter heights.
    pub spacing: f32,
    pub wave: bool,
    pub material: MaterialVariant,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            text: "LUMEN".to_string(),
            color: palette()[2],
            letter_size: 1.0,
            spacing: 0.25,
            wave: true,
            material: MaterialVariant::Metallic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextChange {
    Text(String),
    Color(Color),
    LetterSize(f32),
    Spacing(f32),
    Wave(bool),
    Material(MaterialVariant),
    ToggleWave,
    /// The material after the current one in [`MaterialVariant::ALL`].
    NextMaterial,
}

impl SceneConfig for TextConfig {
    type Change = TextChange;

    fn apply(&mut self, change: &TextChange) -> Result<bool, ConfigError> {
        let changed = match change {
            TextChange::Text(text) => {
                if text.chars().count() > MAX_CHARS {
                    return Err(ConfigError::invalid(
                        "text",
                        text,
                        format!("longer than {MAX_CHARS} characters"),
                    ));
                }
                replace(&mut self.text, text.clone())
            }
            TextChange::Color(c) => replace(&mut self.color, *c),
            TextChange::LetterSize(s) => replace(
                &mut self.letter_size,
                ConfigError::check_range("letter_size", *s, LETTER_SIZE_RANGE.0, LETTER_SIZE_RANGE.1)?,
            ),
            TextChange::Spacing(s) => replace(
                &mut self.spacing,
                ConfigError::check_range("spacing", *s, SPACING_RANGE.0, SPACING_RANGE.1)?,
            ),
            TextChange::Wave(on) => replace(&mut self.wave, *on),
            TextChange::Material(m) => replace(&mut self.material, *m),
            TextChange::ToggleWave => {
                self.wave = !self.wave;
                true
            }
            TextChange::NextMaterial => {
                let all = MaterialVariant::ALL;
                let i = all.iter().position(|v| *v == self.material).map_or(0, |i| (i + 1) % all.len());
                replace(&mut self.material, all[i])
            }
        };
        Ok(changed)
    }

    fn parse_change(key: &str, value: &str) -> Result<TextChange, ConfigError> {
        let change = match key {
            "text" => TextChange::Text(value.to_string()),
            "color" => TextChange::Color(ConfigError::parse(key, value)?),
            "letter_size" | "letterSize" | "size" => TextChange::LetterSize(ConfigError::parse(key, value)?),
            "spacing" => TextChange::Spacing(ConfigError::parse(key, value)?),
            "wave" => TextChange::Wave(ConfigError::parse(key, value)?),
            "material" => TextChange::Material(ConfigError::parse(key, value)?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(change)
    }
}

/// Horizontal layout of one line of text, in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Layout {
    /// World units per grid unit.
    pub cell: f32,
    /// Distance between consecutive letter origins.
    pub advance: f32,
    /// X of the first letter's origin; the line is centered on 0.
    pub origin_x: f32,
}

impl Layout {
    pub fn new(config: &TextConfig) -> Self {
        let cell = config.letter_size / GRID_HEIGHT;
        let gap = config.spacing * config.letter_size;
        let advance = GRID_WIDTH * cell + gap;
        let n = config.text.chars().count() as f32;
        let width = (n * advance - gap).max(0.0);
        Self { cell, advance, origin_x: -width * 0.5 }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextDemo;

impl Content for TextDemo {
    type Config = TextConfig;

    fn name(&self) -> &'static str {
        "text"
    }

    fn camera(&self, _config: &TextConfig) -> Camera {
        Camera::perspective(60.0, 0.1, 200.0)
            .looking_at(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO)
            .with_distance_limits(2.0, 40.0)
    }

    fn build(&self, config: &TextConfig, _viewport: &ViewportState, world: &mut World) {
        world.background = Color::from_srgb_u8(0x05, 0x05, 0x10, 0xff);
        world.add_light(Light::ambient(Color::white(), 0.4));
        world.add_light(Light::directional(Color::white(), 0.9, Vec3::new(-0.5, -1.0, -1.0)));

        let bar = world.add_geometry(Geometry::cube(1.0));
        let layout = Layout::new(config);
        let half_height = config.letter_size * 0.5;
        let depth = config.letter_size * DEPTH;
        let material = Material::solid(config.color).with_variant(config.material);

        for (i, c) in config.text.chars().enumerate() {
            let x0 = layout.origin_x + i as f32 * layout.advance;
            for (k, stroke) in glyph::strokes(c).iter().enumerate() {
                let part = stroke.part(THICKNESS);
                let y = part.center.y * layout.cell - half_height;
                let transform = Transform::at(Vec3::new(x0 + part.center.x * layout.cell, y, 0.0))
                    .with_rotation(Vec3::new(0.0, 0.0, part.angle))
                    .with_scale(Vec3::new(part.size.x * layout.cell, part.size.y * layout.cell, depth));

                let object = world
                    .spawn(ObjectKind::mesh(bar, material))
                    .named(format!("{GLYPH_PREFIX}{i}:{k}"))
                    .with_transform(transform);
                if config.wave {
                    object.animate(Animation::Bob {
                        base: y,
                        amplitude: WAVE_AMPLITUDE * config.letter_size,
                        frequency: WAVE_FREQUENCY,
                        phase: i as f32 * WAVE_PHASE_STEP,
                    });
                }
            }
        }
    }

    fn reconfigure(&self, config: &TextConfig, change: &TextChange, world: &mut World) -> Reconfigure {
        match change {
            TextChange::Color(_) => {
                for part in world.prefixed_mut(GLYPH_PREFIX) {
                    part.set_color(config.color);
                }
            }
            TextChange::Material(_) | TextChange::NextMaterial => {
                for part in world.prefixed_mut(GLYPH_PREFIX) {
                    part.set_variant(config.material);
                }
            }
            _ => return Reconfigure::Rebuild,
        }
        Reconfigure::Applied
    }

    fn key_binding(&self, key: Key, _config: &TextConfig) -> Option<TextChange> {
        if let Some(d) = key.digit() {
            let i = usize::from(d).checked_sub(1)?;
            return palette().get(i).copied().map(TextChange::Color);
        }
        match key {
            Key::Tab => Some(TextChange::NextMaterial),
            Key::W => Some(TextChange::ToggleWave),
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

    fn build(config: &TextConfig) -> World {
        let mut world = World::new();
        TextDemo.build(config, &ViewportState::new(800.0, 600.0, 1.0), &mut world);
        world
    }

    fn parts(world: &World) -> Vec<&SceneObject> {
        world
            .objects()
            .iter()
            .filter(|o| o.name.as_deref().is_some_and(|n| n.starts_with(GLYPH_PREFIX)))
            .collect()
    }

    #[test]
    fn one_box_per_stroke() {
        let config = TextConfig { text: "HI 7".into(), ..TextConfig::default() };
        let world = build(&config);
        let expected = glyph::strokes('H').len() + glyph::strokes('I').len() + glyph::strokes('7').len();
        assert_eq!(parts(&world).len(), expected);
        assert!(world.named("glyph:3:0").is_some());
        // Space adds no parts.
        assert!(world.named("glyph:2:0").is_none());
    }

    #[test]
    fn unknown_characters_use_the_fallback_block() {
        let config = TextConfig { text: "#".into(), ..TextConfig::default() };
        let world = build(&config);
        let parts = parts(&world);
        assert_eq!(parts.len(), 1);
        let scale = parts[0].transform.scale;
        let cell = config.letter_size / GRID_HEIGHT;
        assert!((scale.x - 3.0 * cell).abs() < 1e-6);
        assert!((scale.y - 5.0 * cell).abs() < 1e-6);
    }

    #[test]
    fn line_is_centered() {
        let config = TextConfig { text: "II".into(), spacing: 0.5, ..TextConfig::default() };
        let world = build(&config);
        let xs: Vec<f32> = parts(&world).iter().map(|p| p.transform.position.x).collect();
        let mean = xs.iter().sum::<f32>() / xs.len() as f32;
        assert!(mean.abs() < 1e-5);
    }

    #[test]
    fn wave_offsets_each_letter() {
        let config = TextConfig { text: "AB".into(), ..TextConfig::default() };
        let world = build(&config);
        let phase = |name: &str| match world.named(name).map(|o| o.animations.as_slice()) {
            Some([Animation::Bob { phase, .. }]) => *phase,
            other => panic!("{name}: {other:?}"),
        };
        assert_eq!(phase("glyph:0:0"), 0.0);
        assert_eq!(phase("glyph:1:0"), WAVE_PHASE_STEP);

        let still = build(&TextConfig { wave: false, ..config });
        assert!(parts(&still).iter().all(|p| p.animations.is_empty()));
    }

    #[test]
    fn wave_moves_letters_out_of_step() {
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), TextDemo);
        stage.mount(TextConfig { text: "II".into(), ..TextConfig::default() });
        let mut clock = FixedClock::new(0.1);
        let base = |s: &Stage<HeadlessMount, TextDemo>, name: &str| {
            s.world().and_then(|w| w.named(name)).map(|o| o.transform.position.y)
        };
        let first = base(&stage, "glyph:0:0");
        stage.step(clock.tick());
        let a = base(&stage, "glyph:0:0");
        let b = base(&stage, "glyph:1:0");
        assert_ne!(a, first);
        assert_ne!(a, b);
    }

    #[test]
    fn color_and_material_apply_in_place() {
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), TextDemo);
        stage.mount(TextConfig::default());
        let mut clock = FixedClock::new(1.0 / 60.0);
        let generation = stage.world().map(World::generation);

        stage.post_change(TextChange::Color(palette()[4]));
        stage.post_change(TextChange::Material(MaterialVariant::Glass));
        stage.step(clock.tick());

        let world = stage.world().expect("mounted");
        assert_eq!(Some(world.generation()), generation);
        for part in parts(world) {
            let material = part.kind.material().expect("mesh");
            assert_eq!(material.color, palette()[4]);
            assert_eq!(material.variant, MaterialVariant::Glass);
        }

        stage.post_change(TextChange::Text("OK".into()));
        stage.step(clock.tick());
        assert_ne!(stage.world().map(World::generation), generation);
    }

    #[test]
    fn rejects_overlong_text_and_bad_sizes() {
        let mut config = TextConfig::default();
        assert!(config.apply(&TextChange::Text("X".repeat(MAX_CHARS + 1))).is_err());
        assert!(config.apply(&TextChange::LetterSize(0.1)).is_err());
        assert!(config.apply(&TextChange::Spacing(-0.1)).is_err());
        assert_eq!(config, TextConfig::default());
        assert_eq!(TextConfig::parse_change("wave", "false"), Ok(TextChange::Wave(false)));
    }

    #[test]
    fn tab_cycles_materials() {
        let mut config = TextConfig { material: MaterialVariant::Glass, ..TextConfig::default() };
        assert_eq!(TextDemo.key_binding(Key::Tab, &config), Some(TextChange::NextMaterial));
        config.apply(&TextChange::NextMaterial).unwrap();
        assert_eq!(config.material, MaterialVariant::ALL[0]);
        config.apply(&TextChange::NextMaterial).unwrap();
        assert_eq!(config.material, MaterialVariant::ALL[1]);
    }

    #[test]
    fn queued_toggles_and_material_steps_accumulate() {
        let press = |key| InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let start = TextConfig { material: MaterialVariant::ALL[0], ..TextConfig::default() };
        let mut stage = Stage::new(HeadlessMount::new(800.0, 600.0), TextDemo);
        stage.mount(start.clone());
        for key in [Key::W, Key::W, Key::Tab, Key::Tab] {
            assert!(stage.on_input(&press(key)));
        }
        stage.step(FixedClock::new(1.0 / 60.0).tick());

        let config = stage.config().expect("mounted");
        assert_eq!(config.wave, start.wave);
        assert_eq!(config.material, MaterialVariant::ALL[2]);
    }
}
