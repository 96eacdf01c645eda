use glam::{Mat4, Vec3};

/// Perspective viewpoint.
///
/// `aspect` is owned by the resize reactor; content builders only choose the
/// lens and placement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    aspect: f32,
    min_distance: f32,
    max_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(75.0, 0.1, 1000.0)
    }
}

impl Camera {
    pub fn perspective(fov_y_deg: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            aspect: 1.0,
            min_distance: 0.5,
            max_distance: 500.0,
        }
    }

    pub fn looking_at(mut self, position: Vec3, target: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    /// Limits for [`dolly`](Self::dolly).
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.01);
        self.max_distance = max.max(self.min_distance);
        self
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the aspect ratio. Non-positive or non-finite values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Moves toward (`amount > 0`) or away from the target, clamped to the limits.
    pub fn dolly(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let dist = offset.length();
        if dist <= f32::EPSILON {
            return;
        }
        let next = (dist - amount).clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset * (next / dist);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut c = Camera::default();
        c.set_aspect(2.0);
        c.set_aspect(0.0);
        c.set_aspect(f32::INFINITY);
        assert_eq!(c.aspect(), 2.0);
    }

    #[test]
    fn dolly_is_clamped() {
        let mut c = Camera::default().with_distance_limits(2.0, 10.0);
        c.dolly(100.0);
        assert!((c.distance() - 2.0).abs() < 1e-5);
        c.dolly(-100.0);
        assert!((c.distance() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut c = Camera::default().looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        c.set_aspect(16.0 / 9.0);
        let clip = c.view_projection() * c.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }
}
