use std::collections::HashMap;
use std::sync::Arc;

use winit::window::Window;

use crate::coords::ViewportState;
use crate::device::{Gpu, GpuInit};
use crate::input::ListenerKind;
use crate::lifecycle::{FrameToken, LifecycleError, ListenerId, MountPoint, RenderBackend};
use crate::render::WgpuBackend;

/// A winit window acting as a scene's mount point.
///
/// Frame callbacks map onto `request_redraw`; the runtime delivers the pending
/// token on the next `RedrawRequested`. Listener registration gates which
/// window events the runtime forwards to the scene.
pub struct WindowMount {
    window: Arc<Window>,
    title: String,
    gpu_init: GpuInit,
    listeners: HashMap<ListenerId, ListenerKind>,
    next_listener: u64,
    next_frame: u64,
    pending_frame: Option<FrameToken>,
    surface_attached: bool,
    fallback: Option<String>,
}

impl WindowMount {
    pub fn new(window: Arc<Window>, title: impl Into<String>, gpu_init: GpuInit) -> Self {
        Self {
            window,
            title: title.into(),
            gpu_init,
            listeners: HashMap::new(),
            next_listener: 1,
            next_frame: 1,
            pending_frame: None,
            surface_attached: false,
            fallback: None,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// True if a listener of `kind` is registered.
    pub fn accepts(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Hands out the pending frame token on redraw.
    pub fn take_due_frame(&mut self) -> Option<FrameToken> {
        self.pending_frame.take()
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

impl MountPoint for WindowMount {
    fn measure(&self) -> ViewportState {
        let size = self.window.inner_size();
        let scale = self.window.scale_factor() as f32;
        ViewportState::new(size.width as f32 / scale, size.height as f32 / scale, scale)
    }

    fn attach_surface(
        &mut self,
        viewport: &ViewportState,
    ) -> Result<Box<dyn RenderBackend>, LifecycleError> {
        let gpu = pollster::block_on(Gpu::new(
            Arc::clone(&self.window),
            viewport.physical(),
            self.gpu_init.clone(),
        ))
        .map_err(|e| LifecycleError::UnsupportedEnvironment(format!("{e:#}")))?;

        self.surface_attached = true;
        Ok(Box::new(WgpuBackend::new(gpu)))
    }

    fn detach_surface(&mut self) {
        self.surface_attached = false;
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::new(self.next_frame);
        self.next_frame += 1;
        self.pending_frame = Some(token);
        self.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending_frame == Some(token) {
            self.pending_frame = None;
        }
    }

    fn show_fallback(&mut self, message: &str) {
        log::error!("{}: {message}", self.title);
        self.window
            .set_title(&format!("{} (3D unavailable: {message})", self.title));
        self.fallback = Some(message.to_string());
    }
}
