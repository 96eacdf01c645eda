use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use crate::coords::PhysicalExtent;

use super::surface::{choose_alpha_mode, choose_surface_format, map_surface_error};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Owns wgpu core objects, the surface configuration and the depth target.
///
/// The surface holds an `Arc<Window>`, so the window outlives it by
/// construction. The surface can be destroyed ahead of the device; frames
/// cannot be acquired after that.
pub struct Gpu {
    /// Kept alive for the surface's sake.
    _instance: wgpu::Instance,
    surface: Option<wgpu::Surface<'static>>,
    adapter_info: wgpu::AdapterInfo,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: wgpu::TextureView,
}

impl Gpu {
    /// Creates a GPU context bound to `window`, sized to `extent` physical pixels.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, extent: PhysicalExtent, init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: extent.width.max(1),
            height: extent.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let depth = create_depth_view(&device, config.width, config.height);
        let adapter_info = adapter.get_info();
        log::info!(
            "gpu: {} ({:?}), surface {:?} {}x{}",
            adapter_info.name,
            adapter_info.backend,
            format,
            config.width,
            config.height
        );

        Ok(Gpu {
            _instance: instance,
            surface: Some(surface),
            adapter_info,
            device,
            queue,
            config,
            depth,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalExtent {
        PhysicalExtent::new(self.config.width, self.config.height)
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Reconfigures the surface and depth target for a new size.
    ///
    /// wgpu cannot configure a 0x0 surface; such sizes are ignored.
    pub fn resize(&mut self, extent: PhysicalExtent) {
        if extent.width == 0 || extent.height == 0 || extent == self.size() {
            return;
        }
        self.config.width = extent.width;
        self.config.height = extent.height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
        self.depth = create_depth_view(&self.device, extent.width, extent.height);
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// Returns `Ok(None)` once the surface has been destroyed.
    pub fn begin_frame(&self) -> Result<Option<GpuFrame>, SurfaceError> {
        let Some(surface) = &self.surface else {
            return Ok(None);
        };
        let surface_texture = surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen frame encoder"),
            });

        Ok(Some(GpuFrame {
            surface_texture,
            view,
            depth_view: self.depth.clone(),
            encoder,
        }))
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&self, err: &SurfaceError) -> SurfaceErrorAction {
        match &self.surface {
            Some(surface) => map_surface_error(surface, &self.device, &self.config, err),
            None => SurfaceErrorAction::Fatal,
        }
    }

    /// Drops the surface. The device and queue stay usable for cleanup.
    pub fn destroy_surface(&mut self) {
        if self.surface.take().is_some() {
            log::debug!("gpu: surface destroyed");
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("lumen depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
