use std::fmt;

use crate::coords::{PhysicalExtent, ViewportState};
use crate::input::ListenerKind;
use crate::scene::{Camera, World};

use super::error::{DrawError, LifecycleError};

/// Registration returned by [`MountPoint::add_listener`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One scheduled frame callback. Tokens are unique per mount point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// The host region a scene renders into.
///
/// Implemented by the window runtime and by the headless mount. The host is the
/// sole source of truth for the region's size; the scene never caches it beyond
/// one resize-reactor invocation.
pub trait MountPoint {
    /// Current size. A zero size means layout has not settled yet.
    fn measure(&self) -> ViewportState;

    /// Creates the drawing surface under this mount point.
    ///
    /// Fails with [`LifecycleError::UnsupportedEnvironment`] when there is no
    /// graphics capability.
    fn attach_surface(
        &mut self,
        viewport: &ViewportState,
    ) -> Result<Box<dyn RenderBackend>, LifecycleError>;

    /// Removes the drawing surface node from the mount point.
    fn detach_surface(&mut self);

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);

    /// Schedules one frame callback at the next display refresh.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a scheduled frame. Cancelling an already-delivered token is a no-op.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Replaces the scene with a static, user-visible fallback.
    fn show_fallback(&mut self, message: &str);
}

/// GPU side of a render context: the drawing surface plus every resource
/// uploaded for the world's content.
pub trait RenderBackend {
    /// Resizes the drawing surface to exactly `extent` physical pixels.
    fn resize(&mut self, extent: PhysicalExtent);

    /// Issues one frame: clear, draw every visible object, present.
    fn draw(&mut self, world: &World, camera: &Camera) -> Result<(), DrawError>;

    /// Destroys the drawing surface. Any later `draw` must fail without touching it.
    fn destroy_surface(&mut self);

    /// Frees every buffer/geometry/material upload; returns how many were freed.
    fn release_resources(&mut self) -> usize;
}
