use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::GpuInit;
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputEvent, InputState, Key, KeyState, ListenerKind};
use crate::lifecycle::{Content, FrameOutcome, MountOutcome, Stage, StageSettings};
use crate::time::FrameClock;

use super::WindowMount;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Escape closes the window.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            exit_on_escape: true,
        }
    }
}

/// Entry point for the windowed runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, mounts `content` with `config` into it and runs until
    /// the window closes. The scene is torn down before this returns.
    pub fn run<C>(
        runtime: RuntimeConfig,
        gpu_init: GpuInit,
        settings: StageSettings,
        content: C,
        config: C::Config,
    ) -> Result<()>
    where
        C: Content + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            runtime,
            gpu_init,
            settings,
            pending: Some((content, config)),
            stage: None,
            input: InputState::default(),
            clock: FrameClock::new(),
            exit_requested: false,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState<C: Content> {
    runtime: RuntimeConfig,
    gpu_init: GpuInit,
    settings: StageSettings,
    /// Content waiting for the first `resumed`.
    pending: Option<(C, C::Config)>,
    stage: Option<Stage<WindowMount, C>>,
    input: InputState,
    clock: FrameClock,
    exit_requested: bool,
}

impl<C: Content> AppState<C> {
    fn create_stage(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some((content, config)) = self.pending.take() else {
            return Ok(());
        };

        let attrs = Window::default_attributes()
            .with_title(self.runtime.title.clone())
            .with_inner_size(self.runtime.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let mount = WindowMount::new(window, self.runtime.title.clone(), self.gpu_init.clone());
        let mut stage = Stage::with_settings(mount, content, self.settings);
        if let MountOutcome::Fallback(err) = stage.mount(config) {
            // The window stays open showing the fallback title.
            log::warn!("running without a scene: {err}");
        }
        self.clock.reset();
        self.stage = Some(stage);
        Ok(())
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut stage) = self.stage.take() {
            stage.unmount();
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn route_input(&mut self, event_loop: &ActiveEventLoop, ev: InputEvent) {
        self.input.apply_event(&ev);

        if self.runtime.exit_on_escape
            && matches!(ev, InputEvent::Key { key: Key::Escape, state: KeyState::Pressed, .. })
        {
            self.close(event_loop);
            return;
        }

        let Some(stage) = self.stage.as_mut() else { return };
        let Some(kind) = ev.listener_kind() else { return };
        if stage.mount_point().accepts(kind) {
            stage.on_input(&ev);
        }
    }
}

impl<C: Content> ApplicationHandler for AppState<C> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.stage.is_some() {
            return;
        }
        if let Err(e) = self.create_stage(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.exit_requested = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        // Frames are paced by `request_redraw` from the frame driver.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let translated = self
            .stage
            .as_ref()
            .and_then(|s| translate_window_event(s.mount_point().window(), &self.input, &event));
        if let Some(ev) = translated {
            self.route_input(event_loop, ev);
            return;
        }

        match &event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.close(event_loop),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let Some(stage) = self.stage.as_mut() else { return };
                if stage.mount_point().accepts(ListenerKind::Resize) {
                    stage.on_resize();
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(stage) = self.stage.as_mut() else { return };
                let Some(token) = stage.mount_point_mut().take_due_frame() else { return };
                let time = self.clock.tick();
                if stage.on_frame(token, time) == FrameOutcome::Stopped {
                    log::warn!("frame driver stopped; window stays open with the fallback");
                }
            }

            _ => {}
        }
    }
}
