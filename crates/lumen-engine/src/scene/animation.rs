use std::ops::AddAssign;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::object::{ObjectKind, PointCloud};
use super::transform::Transform;

/// Rotation produced by a pointer drag, in radians.
///
/// `yaw` turns around the vertical axis (horizontal pointer motion),
/// `pitch` around the horizontal axis (vertical pointer motion).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RotationDelta {
    pub yaw: f32,
    pub pitch: f32,
}

impl RotationDelta {
    #[inline]
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.yaw == 0.0 && self.pitch == 0.0
    }
}

impl AddAssign for RotationDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.yaw += rhs.yaw;
        self.pitch += rhs.pitch;
    }
}

/// Which rotation axes a pointer drag controls on an object.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DragAxes {
    pub yaw: bool,
    pub pitch: bool,
}

impl DragAxes {
    pub const NONE: DragAxes = DragAxes { yaw: false, pitch: false };
    pub const YAW: DragAxes = DragAxes { yaw: true, pitch: false };
    pub const BOTH: DragAxes = DragAxes { yaw: true, pitch: true };

    pub fn any(self) -> bool {
        self.yaw || self.pitch
    }
}

/// Everything an animation rule may read during one tick.
///
/// Built once per tick by the frame driver; rules never see other objects.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Seconds since the driver started.
    pub elapsed: f32,
    /// Automatic rotation (spin, orbit, sway) enabled.
    pub auto_animate: bool,
    /// A drag is in progress (or happened during this tick).
    pub dragging: bool,
    /// Drag rotation accumulated since the previous tick.
    pub drag: RotationDelta,
}

/// Cardinal axis selector.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Axis3 {
    X,
    Y,
    Z,
}

impl Axis3 {
    fn index(self) -> usize {
        match self {
            Axis3::X => 0,
            Axis3::Y => 1,
            Axis3::Z => 2,
        }
    }
}

/// Per-object animation rule, applied once per tick in registration order.
#[derive(Debug, Clone)]
pub enum Animation {
    /// Adds `rate` to the rotation every tick (frame-based, not time-based).
    Spin { rate: Vec3, enabled: bool },

    /// Sets `position.y = base + sin(elapsed * frequency + phase) * amplitude`.
    Bob { base: f32, amplitude: f32, frequency: f32, phase: f32 },

    /// Circles `center` in the XZ plane; `angle` advances by `angular_speed * dt`.
    Orbit { center: Vec3, radius: f32, height: f32, angular_speed: f32, angle: f32 },

    /// Sets one rotation component to `sin(elapsed * frequency + phase) * amplitude`.
    Sway { axis: Axis3, amplitude: f32, frequency: f32, phase: f32 },

    /// Integrates `velocity * dt` and reflects off the `[min, max]` box.
    /// Axes where `min == max` are pinned.
    Drift { velocity: Vec3, min: Vec3, max: Vec3 },

    /// Particle fall for a point cloud; see [`RainField`].
    Rain(RainField),

    /// Writes elapsed time into the point cloud's shader clock. O(1) per tick.
    ShaderClock,
}

impl Animation {
    pub fn spin(rate: Vec3) -> Self {
        Animation::Spin { rate, enabled: true }
    }

    pub fn bob(amplitude: f32, frequency: f32) -> Self {
        Animation::Bob { base: 0.0, amplitude, frequency, phase: 0.0 }
    }

    pub fn orbit(center: Vec3, radius: f32, height: f32, angular_speed: f32, angle: f32) -> Self {
        Animation::Orbit { center, radius, height, angular_speed, angle }
    }

    pub fn drift(velocity: Vec3, min: Vec3, max: Vec3) -> Self {
        Animation::Drift { velocity, min, max }
    }

    /// True for rules frozen when automatic animation is off.
    pub fn is_automatic_rotation(&self) -> bool {
        matches!(
            self,
            Animation::Spin { .. } | Animation::Orbit { .. } | Animation::Sway { .. }
        )
    }

    pub(crate) fn apply(
        &mut self,
        transform: &mut Transform,
        kind: &mut ObjectKind,
        drag_axes: DragAxes,
        tick: &TickInput,
    ) {
        if self.is_automatic_rotation() && !tick.auto_animate {
            return;
        }

        match self {
            Animation::Spin { rate, enabled } => {
                if !*enabled {
                    return;
                }
                let mut r = *rate;
                // Drag owns these axes while held.
                if tick.dragging && drag_axes.yaw {
                    r.y = 0.0;
                }
                if tick.dragging && drag_axes.pitch {
                    r.x = 0.0;
                }
                transform.rotation += r;
            }

            Animation::Bob { base, amplitude, frequency, phase } => {
                transform.position.y = *base + (tick.elapsed * *frequency + *phase).sin() * *amplitude;
            }

            Animation::Orbit { center, radius, height, angular_speed, angle } => {
                *angle += *angular_speed * tick.dt;
                let (s, c) = angle.sin_cos();
                transform.position = *center + Vec3::new(c * *radius, *height, s * *radius);
            }

            Animation::Sway { axis, amplitude, frequency, phase } => {
                transform.rotation[axis.index()] =
                    (tick.elapsed * *frequency + *phase).sin() * *amplitude;
            }

            Animation::Drift { velocity, min, max } => {
                let mut p = transform.position + *velocity * tick.dt;
                for i in 0..3 {
                    if min[i] >= max[i] {
                        p[i] = min[i];
                        continue;
                    }
                    if p[i] < min[i] {
                        p[i] = min[i] + (min[i] - p[i]);
                        velocity[i] = velocity[i].abs();
                    } else if p[i] > max[i] {
                        p[i] = max[i] - (p[i] - max[i]);
                        velocity[i] = -velocity[i].abs();
                    }
                    p[i] = p[i].clamp(min[i], max[i]);
                }
                transform.position = p;
                if velocity.x != 0.0 || velocity.z != 0.0 {
                    transform.rotation.y = velocity.x.atan2(velocity.z);
                }
            }

            Animation::Rain(field) => {
                if let ObjectKind::Points(cloud) = kind {
                    field.step(cloud);
                }
            }

            Animation::ShaderClock => {
                if let ObjectKind::Points(cloud) = kind {
                    cloud.time = tick.elapsed;
                }
            }
        }
    }
}

/// Falling-particle state: one downward velocity per point, applied per tick.
///
/// A point that drops below `y = 0` respawns at a random XZ inside `±spread`
/// and a random height in `[ceiling, ceiling + band]`. The field owns its RNG so
/// updates never depend on other objects.
#[derive(Debug, Clone)]
pub struct RainField {
    pub velocities: Vec<f32>,
    pub ceiling: f32,
    pub spread: f32,
    pub band: f32,
    rng: StdRng,
}

impl RainField {
    pub fn new(velocities: Vec<f32>, ceiling: f32, spread: f32, band: f32, seed: u64) -> Self {
        Self {
            velocities,
            ceiling,
            spread: spread.abs(),
            band: band.abs(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn step(&mut self, cloud: &mut PointCloud) {
        for (p, v) in cloud.positions.iter_mut().zip(&self.velocities) {
            p[1] -= *v;
            if p[1] < 0.0 {
                p[0] = self.rng.random_range(-self.spread..=self.spread);
                p[2] = self.rng.random_range(-self.spread..=self.spread);
                p[1] = self.ceiling + self.rng.random_range(0.0..=self.band);
            }
        }
        cloud.revision = cloud.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Color;

    fn tick(dt: f32, elapsed: f32) -> TickInput {
        TickInput { dt, elapsed, auto_animate: true, ..TickInput::default() }
    }

    fn light_kind() -> ObjectKind {
        ObjectKind::Light(crate::scene::Light::ambient(Color::white(), 1.0))
    }

    #[test]
    fn spin_advances_per_tick() {
        let mut t = Transform::IDENTITY;
        let mut k = light_kind();
        let mut a = Animation::spin(Vec3::new(0.01, 0.02, 0.0));
        a.apply(&mut t, &mut k, DragAxes::NONE, &tick(0.5, 1.0));
        a.apply(&mut t, &mut k, DragAxes::NONE, &tick(0.001, 1.001));
        assert!((t.rotation.x - 0.02).abs() < 1e-6);
        assert!((t.rotation.y - 0.04).abs() < 1e-6);
    }

    #[test]
    fn spin_yields_dragged_axes_only() {
        let mut t = Transform::IDENTITY;
        let mut k = light_kind();
        let mut a = Animation::spin(Vec3::new(0.01, 0.01, 0.01));
        let held = TickInput { dragging: true, ..tick(0.016, 0.016) };
        a.apply(&mut t, &mut k, DragAxes::YAW, &held);
        assert!((t.rotation.x - 0.01).abs() < 1e-6);
        assert_eq!(t.rotation.y, 0.0);
        assert!((t.rotation.z - 0.01).abs() < 1e-6);
    }

    #[test]
    fn auto_animate_off_freezes_rotation_rules() {
        let mut t = Transform::IDENTITY;
        let mut k = light_kind();
        let off = TickInput { auto_animate: false, ..tick(1.0, 1.0) };
        Animation::spin(Vec3::ONE).apply(&mut t, &mut k, DragAxes::NONE, &off);
        Animation::orbit(Vec3::ZERO, 2.0, 0.0, 1.0, 0.0).apply(&mut t, &mut k, DragAxes::NONE, &off);
        assert_eq!(t, Transform::IDENTITY);

        // Bob is positional, not rotation: it keeps running.
        Animation::bob(0.2, 1.0).apply(&mut t, &mut k, DragAxes::NONE, &off);
        assert!((t.position.y - 1.0f32.sin() * 0.2).abs() < 1e-6);
    }

    #[test]
    fn orbit_uses_elapsed_delta() {
        let mut t = Transform::IDENTITY;
        let mut k = light_kind();
        let mut a = Animation::orbit(Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5, std::f32::consts::PI, 0.0);
        a.apply(&mut t, &mut k, DragAxes::NONE, &tick(0.5, 0.5));
        assert!((t.position - Vec3::new(0.0, 1.5, 2.0)).length() < 1e-5);
    }

    #[test]
    fn drift_reflects_at_bounds() {
        let mut t = Transform::at(Vec3::new(0.9, 0.0, 0.0));
        let mut k = light_kind();
        let mut a = Animation::drift(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
        );
        a.apply(&mut t, &mut k, DragAxes::NONE, &tick(0.3, 0.3));
        assert!((t.position.x - 0.8).abs() < 1e-5);
        let Animation::Drift { velocity, .. } = a else { unreachable!() };
        assert_eq!(velocity.x, -1.0);
    }

    #[test]
    fn rain_falls_and_respawns_above_ceiling() {
        let mut cloud = PointCloud::new(
            vec![[0.0, 5.0, 0.0], [1.0, 0.5, 1.0]],
            vec![[1.0; 3]; 2],
            vec![0.0; 2],
        );
        let mut field = RainField::new(vec![0.25, 1.0], 20.0, 10.0, 5.0, 7);
        field.step(&mut cloud);

        assert_eq!(cloud.positions[0][1], 4.75);
        let respawned = cloud.positions[1];
        assert!(respawned[1] >= 20.0 && respawned[1] <= 25.0);
        assert!(respawned[0].abs() <= 10.0 && respawned[2].abs() <= 10.0);
        assert_eq!(cloud.revision, 1);
    }

    #[test]
    fn shader_clock_touches_only_the_uniform() {
        let cloud = PointCloud::new(vec![[1.0, 2.0, 3.0]], vec![[1.0; 3]], vec![0.5]);
        let before = cloud.positions.clone();
        let mut kind = ObjectKind::Points(cloud);
        let mut t = Transform::IDENTITY;
        Animation::ShaderClock.apply(&mut t, &mut kind, DragAxes::NONE, &tick(0.1, 3.5));
        let ObjectKind::Points(after) = kind else { unreachable!() };
        assert_eq!(after.time, 3.5);
        assert_eq!(after.positions, before);
        assert_eq!(after.revision, 0);
    }
}
