/// Measured size of a mount point.
///
/// `width`/`height` are logical pixels; `pixel_density` maps logical to physical
/// pixels. Only the resize reactor writes this after mount.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    pub pixel_density: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

impl ViewportState {
    #[inline]
    pub const fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        Self { width, height, pixel_density }
    }

    /// True once the host layout produced a usable, non-zero size.
    ///
    /// A zero or non-finite read is a layout race, not an error.
    #[inline]
    pub fn is_measured(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.pixel_density > 0.0
            && self.pixel_density.is_finite()
    }

    /// Width over height. Only meaningful when [`is_measured`](Self::is_measured).
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width / self.height
    }

    /// Drawing-surface size in physical pixels (never below 1x1).
    #[inline]
    pub fn physical(self) -> PhysicalExtent {
        let scale = if self.pixel_density > 0.0 { self.pixel_density } else { 1.0 };
        PhysicalExtent::new(
            (self.width * scale).round().max(1.0) as u32,
            (self.height * scale).round().max(1.0) as u32,
        )
    }
}

/// Surface size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PhysicalExtent {
    pub width: u32,
    pub height: u32,
}

impl PhysicalExtent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_not_measured() {
        assert!(!ViewportState::new(0.0, 600.0, 1.0).is_measured());
        assert!(!ViewportState::new(800.0, 0.0, 1.0).is_measured());
        assert!(!ViewportState::new(f32::NAN, 600.0, 1.0).is_measured());
        assert!(ViewportState::new(800.0, 600.0, 1.0).is_measured());
    }

    #[test]
    fn physical_scales_by_density() {
        let v = ViewportState::new(400.0, 300.0, 2.0);
        assert_eq!(v.physical(), PhysicalExtent::new(800, 600));
    }

    #[test]
    fn physical_never_collapses_to_zero() {
        let v = ViewportState::new(0.0, 0.0, 1.0);
        assert_eq!(v.physical(), PhysicalExtent::new(1, 1));
    }
}
