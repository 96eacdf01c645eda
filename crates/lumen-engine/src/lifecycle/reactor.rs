use crate::coords::{PhysicalExtent, ViewportState};
use crate::input::ListenerKind;

use super::context::RenderContext;
use super::mount::{ListenerId, MountPoint};

/// Result of one resize-reactor invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResizeOutcome {
    /// Aspect and surface were updated to the new size.
    Applied(PhysicalExtent),
    /// Same size as last time; nothing touched.
    Unchanged,
    /// The mount point measured zero; retried on the next frame.
    Deferred,
    /// The render context has no surface anymore.
    Detached,
}

/// Keeps camera aspect and surface size in sync with the mount point.
#[derive(Debug, Default)]
pub struct ResizeReactor {
    listener: Option<ListenerId>,
    pending: bool,
}

impl ResizeReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the resize listener.
    ///
    /// The reactor starts pending: the size read at mount may predate the
    /// settled layout, so the first frame always re-measures.
    pub fn attach<M: MountPoint + ?Sized>(&mut self, mount: &mut M, initial: &ViewportState) {
        if self.listener.is_none() {
            self.listener = Some(mount.add_listener(ListenerKind::Resize));
        }
        if !initial.is_measured() {
            log::debug!("mount point measured {}x{}; waiting for layout", initial.width, initial.height);
        }
        self.pending = true;
    }

    /// Removes the resize listener. Returns false if none was registered.
    pub fn detach<M: MountPoint + ?Sized>(&mut self, mount: &mut M) -> bool {
        match self.listener.take() {
            Some(id) => {
                mount.remove_listener(id);
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// The next frame re-measures the mount point.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Applies `measured` to `ctx`. Idempotent for an unchanged size.
    pub fn react(&mut self, measured: ViewportState, ctx: &mut RenderContext) -> ResizeOutcome {
        if !ctx.is_surface_attached() {
            return ResizeOutcome::Detached;
        }
        if !measured.is_measured() {
            self.pending = true;
            log::debug!("resize deferred: mount point measured {}x{}", measured.width, measured.height);
            return ResizeOutcome::Deferred;
        }
        self.pending = false;
        if ctx.apply_viewport(measured) {
            let extent = measured.physical();
            log::debug!(
                "resized to {}x{} (aspect {:.4})",
                measured.width,
                measured.height,
                measured.aspect()
            );
            ResizeOutcome::Applied(extent)
        } else {
            ResizeOutcome::Unchanged
        }
    }
}
