use crate::coords::PhysicalExtent;
use crate::device::Gpu;
use crate::lifecycle::{DrawError, RenderBackend};
use crate::scene::{Camera, World};

use super::{RenderCtx, RenderTarget, SceneRenderer};

/// wgpu-backed drawing surface for one scene.
pub struct WgpuBackend {
    gpu: Gpu,
    renderer: SceneRenderer,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            renderer: SceneRenderer::new(),
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }
}

impl RenderBackend for WgpuBackend {
    fn resize(&mut self, extent: PhysicalExtent) {
        self.gpu.resize(extent);
    }

    fn draw(&mut self, world: &World, camera: &Camera) -> Result<(), DrawError> {
        let mut frame = match self.gpu.begin_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Err(DrawError::Fatal("drawing surface destroyed".into())),
            Err(err) => {
                let action = self.gpu.handle_surface_error(&err);
                return Err(action.into_draw_error(&err));
            }
        };

        let ctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.size(),
        );
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, &frame.depth_view);
            self.renderer.render(&ctx, &mut target, world, camera);
        }
        self.gpu.submit(frame);
        Ok(())
    }

    fn destroy_surface(&mut self) {
        self.gpu.destroy_surface();
    }

    fn release_resources(&mut self) -> usize {
        let freed = self.renderer.release();
        log::debug!("released {freed} GPU uploads ({})", self.gpu.adapter_info().name);
        freed
    }
}
