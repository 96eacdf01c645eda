//! Headless mount point.
//!
//! Stands in for a window when there is no display: frames are delivered by
//! the caller, draws are recorded instead of rasterized, and every call the
//! lifecycle makes on the mount point is appended to a shared journal.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::coords::{PhysicalExtent, ViewportState};
use crate::input::ListenerKind;
use crate::lifecycle::{
    Content, DrawError, FrameOutcome, FrameToken, LifecycleError, ListenerId, MountPoint,
    RenderBackend, Stage,
};
use crate::scene::{Camera, ObjectKind, World};
use crate::time::FrameTime;

/// One observable call on a headless mount point or its backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MountOp {
    SurfaceAttached(PhysicalExtent),
    ListenerAdded(ListenerKind),
    ListenerRemoved(ListenerKind),
    FrameRequested(FrameToken),
    FrameCancelled(FrameToken),
    SurfaceResized(PhysicalExtent),
    Drawn { objects: usize },
    SurfaceDestroyed,
    SurfaceDetached,
    ResourcesReleased(usize),
    Fallback(String),
    /// A draw reached the backend after its surface was destroyed.
    DrawAfterDestroy,
}

/// Shared, append-only record of mount point calls.
pub type Journal = Rc<RefCell<Vec<MountOp>>>;

/// In-memory mount point.
#[derive(Debug)]
pub struct HeadlessMount {
    viewport: ViewportState,
    unsupported: Option<String>,
    journal: Journal,
    draw_errors: Rc<RefCell<VecDeque<DrawError>>>,
    listeners: HashMap<ListenerId, ListenerKind>,
    next_listener: u64,
    next_frame: u64,
    pending_frame: Option<FrameToken>,
    surface_attached: bool,
    fallback: Option<String>,
}

impl HeadlessMount {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: ViewportState::new(width, height, 1.0),
            unsupported: None,
            journal: Rc::default(),
            draw_errors: Rc::default(),
            listeners: HashMap::new(),
            next_listener: 1,
            next_frame: 1,
            pending_frame: None,
            surface_attached: false,
            fallback: None,
        }
    }

    /// A mount point whose environment has no graphics capability.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        let mut m = Self::new(800.0, 600.0);
        m.unsupported = Some(reason.into());
        m
    }

    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.viewport.pixel_density = density;
        self
    }

    /// Changes the host layout. Takes effect on the next measurement.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn journal(&self) -> Vec<MountOp> {
        self.journal.borrow().clone()
    }

    /// The journal itself; outlives the mount point.
    pub fn journal_handle(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    /// Journal entries recorded since index `from`.
    pub fn ops_since(&self, from: usize) -> Vec<MountOp> {
        self.journal.borrow().iter().skip(from).cloned().collect()
    }

    pub fn op_count(&self) -> usize {
        self.journal.borrow().len()
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    /// Delivers the scheduled frame callback, if any.
    pub fn take_frame(&mut self) -> Option<FrameToken> {
        self.pending_frame.take()
    }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_surface_attached(&self) -> bool {
        self.surface_attached
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn draws(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|op| matches!(op, MountOp::Drawn { .. }))
            .count()
    }

    /// Makes the next draw fail with `err`.
    pub fn inject_draw_error(&self, err: DrawError) {
        self.draw_errors.borrow_mut().push_back(err);
    }

    fn record(&self, op: MountOp) {
        self.journal.borrow_mut().push(op);
    }
}

impl MountPoint for HeadlessMount {
    fn measure(&self) -> ViewportState {
        self.viewport
    }

    fn attach_surface(
        &mut self,
        viewport: &ViewportState,
    ) -> Result<Box<dyn RenderBackend>, LifecycleError> {
        if let Some(reason) = &self.unsupported {
            return Err(LifecycleError::UnsupportedEnvironment(reason.clone()));
        }
        let extent = viewport.physical();
        self.surface_attached = true;
        self.record(MountOp::SurfaceAttached(extent));
        Ok(Box::new(RecordingBackend {
            journal: Rc::clone(&self.journal),
            draw_errors: Rc::clone(&self.draw_errors),
            extent,
            resident: 0,
            destroyed: false,
        }))
    }

    fn detach_surface(&mut self) {
        if self.surface_attached {
            self.surface_attached = false;
            self.record(MountOp::SurfaceDetached);
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, kind);
        self.record(MountOp::ListenerAdded(kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if let Some(kind) = self.listeners.remove(&id) {
            self.record(MountOp::ListenerRemoved(kind));
        }
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::new(self.next_frame);
        self.next_frame += 1;
        self.pending_frame = Some(token);
        self.record(MountOp::FrameRequested(token));
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending_frame == Some(token) {
            self.pending_frame = None;
            self.record(MountOp::FrameCancelled(token));
        }
    }

    fn show_fallback(&mut self, message: &str) {
        self.fallback = Some(message.to_string());
        self.record(MountOp::Fallback(message.to_string()));
    }
}

/// Backend that records draws and counts uploads instead of touching a GPU.
struct RecordingBackend {
    journal: Journal,
    draw_errors: Rc<RefCell<VecDeque<DrawError>>>,
    extent: PhysicalExtent,
    /// Geometries + point clouds uploaded by the last draw.
    resident: usize,
    destroyed: bool,
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, extent: PhysicalExtent) {
        if self.destroyed || extent == self.extent {
            return;
        }
        self.extent = extent;
        self.journal.borrow_mut().push(MountOp::SurfaceResized(extent));
    }

    fn draw(&mut self, world: &World, _camera: &Camera) -> Result<(), DrawError> {
        if self.destroyed {
            self.journal.borrow_mut().push(MountOp::DrawAfterDestroy);
            return Err(DrawError::Fatal("surface destroyed".into()));
        }
        if let Some(err) = self.draw_errors.borrow_mut().pop_front() {
            return Err(err);
        }
        let clouds = world
            .objects()
            .iter()
            .filter(|o| matches!(o.kind, ObjectKind::Points(_)))
            .count();
        self.resident = world.geometries().count() + clouds;
        let objects = world.objects().iter().filter(|o| o.visible).count();
        self.journal.borrow_mut().push(MountOp::Drawn { objects });
        Ok(())
    }

    fn destroy_surface(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.journal.borrow_mut().push(MountOp::SurfaceDestroyed);
        }
    }

    fn release_resources(&mut self) -> usize {
        let freed = std::mem::take(&mut self.resident);
        self.journal.borrow_mut().push(MountOp::ResourcesReleased(freed));
        freed
    }
}

impl<C: Content> Stage<HeadlessMount, C> {
    /// Delivers the scheduled frame, if any. `None` when no frame is pending.
    pub fn step(&mut self, time: FrameTime) -> Option<FrameOutcome> {
        let token = self.mount_point_mut().take_frame()?;
        Some(self.on_frame(token, time))
    }
}
