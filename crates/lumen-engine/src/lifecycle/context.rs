use crate::coords::ViewportState;
use crate::scene::{Camera, World};

use super::error::{DrawError, LifecycleError};
use super::mount::{MountPoint, RenderBackend};

/// World graph + viewpoint + drawing surface of one scene instance.
pub struct RenderContext {
    world: World,
    camera: Camera,
    viewport: ViewportState,
    backend: Box<dyn RenderBackend>,
    surface_attached: bool,
}

impl RenderContext {
    /// Attaches a drawing surface under `mount` sized to `viewport`.
    ///
    /// The only failure is an environment without graphics capability.
    pub fn create<M: MountPoint + ?Sized>(
        mount: &mut M,
        viewport: ViewportState,
        mut camera: Camera,
    ) -> Result<Self, LifecycleError> {
        let backend = mount.attach_surface(&viewport)?;
        if viewport.is_measured() {
            camera.set_aspect(viewport.aspect());
        }
        log::debug!(
            "render context created ({}x{} @{}x)",
            viewport.width,
            viewport.height,
            viewport.pixel_density
        );
        Ok(Self {
            world: World::new(),
            camera,
            viewport,
            backend,
            surface_attached: true,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub(crate) fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn is_surface_attached(&self) -> bool {
        self.surface_attached
    }

    /// Clears the world and lets `build` repopulate it.
    pub(crate) fn rebuild(&mut self, build: impl FnOnce(&mut World, &ViewportState)) {
        self.world.clear();
        build(&mut self.world, &self.viewport);
    }

    /// Applies a measured size. Returns false when nothing observable changed.
    pub(crate) fn apply_viewport(&mut self, viewport: ViewportState) -> bool {
        let aspect = viewport.aspect();
        if viewport == self.viewport && self.camera.aspect() == aspect {
            return false;
        }
        self.viewport = viewport;
        self.camera.set_aspect(aspect);
        if self.surface_attached {
            self.backend.resize(viewport.physical());
        }
        true
    }

    /// One draw call for the current world state.
    pub(crate) fn draw(&mut self) -> Result<(), DrawError> {
        if !self.surface_attached {
            return Err(DrawError::Fatal("drawing surface already detached".into()));
        }
        self.backend.draw(&self.world, &self.camera)
    }

    pub(crate) fn destroy_surface<M: MountPoint + ?Sized>(&mut self, mount: &mut M) {
        if !self.surface_attached {
            return;
        }
        self.backend.destroy_surface();
        mount.detach_surface();
        self.surface_attached = false;
    }

    pub(crate) fn release_resources(&mut self) -> usize {
        self.backend.release_resources()
    }
}
