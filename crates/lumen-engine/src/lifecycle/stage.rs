use crate::coords::ViewportState;
use crate::input::{InputEvent, KeyState};
use crate::scene::{Camera, RotationDelta, World};
use crate::time::FrameTime;

use super::bridge::{DEFAULT_DRAG_SENSITIVITY, InputBridge, InteractionState};
use super::content::{Content, Reconfigure, SceneConfig};
use super::context::RenderContext;
use super::driver::{DriverState, FrameDriver};
use super::error::{ConfigError, DrawError, LifecycleError};
use super::events::{EventQueue, SceneEvent};
use super::handle::SceneHandle;
use super::mount::{FrameToken, MountPoint};
use super::reactor::{ResizeOutcome, ResizeReactor};
use super::teardown::{TeardownReport, TeardownStep};

/// Host-side tuning shared by every scene a stage mounts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StageSettings {
    /// Radians per logical pixel of drag.
    pub drag_sensitivity: f32,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self { drag_sensitivity: DEFAULT_DRAG_SENSITIVITY }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    Mounted(SceneHandle),
    /// The mount point already hosts a scene; nothing was created.
    AlreadyBound(SceneHandle),
    /// No drawing surface; the mount point shows a fallback instead.
    Fallback(LifecycleError),
}

impl MountOutcome {
    pub fn handle(&self) -> Option<SceneHandle> {
        match self {
            MountOutcome::Mounted(h) | MountOutcome::AlreadyBound(h) => Some(*h),
            MountOutcome::Fallback(_) => None,
        }
    }
}

/// What one delivered frame callback did.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// One update + one draw; the next frame is scheduled.
    Drawn,
    /// Updated, but the draw was dropped (transient surface error).
    Skipped,
    /// Stale or post-teardown callback. No update, no draw.
    Ignored,
    /// Fatal draw error. The driver is stopped and the fallback shown.
    Stopped,
}

/// Everything one mounted scene owns. Dropped as a unit by teardown.
struct SceneLifecycle<C: Content> {
    handle: SceneHandle,
    config: C::Config,
    ctx: RenderContext,
    driver: FrameDriver,
    bridge: InputBridge,
    reactor: ResizeReactor,
    queue: EventQueue<<C::Config as SceneConfig>::Change>,
}

impl<C: Content> SceneLifecycle<C> {
    fn apply_change(&mut self, content: &C, change: &<C::Config as SceneConfig>::Change) {
        match self.config.apply(change) {
            Ok(false) => log::trace!("{}: {:?} already set", self.handle, change),
            Ok(true) => {
                let config = &self.config;
                match content.reconfigure(config, change, self.ctx.world_mut()) {
                    Reconfigure::Applied => log::debug!("{}: applied {:?}", self.handle, change),
                    Reconfigure::Rebuild => {
                        log::debug!("{}: rebuilding for {:?}", self.handle, change);
                        self.ctx.rebuild(|world, viewport| content.build(config, viewport, world));
                    }
                }
            }
            Err(err) => log::warn!("{}: rejected {:?}: {err}", self.handle, change),
        }
    }

    /// Runs the five teardown steps. Consumes the scene, so it happens once.
    fn teardown<M: MountPoint + ?Sized>(mut self, mount: &mut M) -> TeardownReport {
        let mut report = TeardownReport::new(self.handle);

        report.cancelled_frame = self.driver.stop(mount);
        report.record(TeardownStep::StopDriver);

        report.listeners_removed += self.bridge.detach(mount);
        report.record(TeardownStep::RemoveInputListeners);

        if self.reactor.detach(mount) {
            report.listeners_removed += 1;
        }
        report.record(TeardownStep::RemoveResizeListener);

        self.ctx.destroy_surface(mount);
        report.record(TeardownStep::DetachSurface);

        report.resources_released = self.ctx.release_resources();
        report.record(TeardownStep::ReleaseResources);

        let dropped = self.queue.len();
        if dropped > 0 {
            log::debug!("{}: dropped {dropped} unprocessed events", self.handle);
        }
        log::info!(
            "{}: torn down after {} ticks, {} drawn ({} listeners, {} resources released)",
            self.handle,
            self.driver.ticks(),
            self.driver.draws(),
            report.listeners_removed,
            report.resources_released
        );
        report
    }
}

/// Binds one content builder to one mount point and owns the scene's whole
/// lifecycle: mount, per-frame ticks, input, resize and teardown.
///
/// At most one scene is live per stage. Dropping the stage tears the scene down.
pub struct Stage<M: MountPoint, C: Content> {
    mount: M,
    content: C,
    settings: StageSettings,
    scene: Option<SceneLifecycle<C>>,
}

impl<M: MountPoint, C: Content> Stage<M, C> {
    pub fn new(mount: M, content: C) -> Self {
        Self::with_settings(mount, content, StageSettings::default())
    }

    pub fn with_settings(mount: M, content: C, settings: StageSettings) -> Self {
        Self {
            mount,
            content,
            settings,
            scene: None,
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Mounts the content with `config`.
    ///
    /// A second call while a scene is live is a no-op. On an unsupported
    /// environment the mount point shows a fallback and nothing else happens.
    pub fn mount(&mut self, config: C::Config) -> MountOutcome {
        if let Some(scene) = &self.scene {
            log::debug!("{}: mount point already bound", scene.handle);
            return MountOutcome::AlreadyBound(scene.handle);
        }

        let viewport = self.mount.measure();
        let camera = self.content.camera(&config);
        let mut ctx = match RenderContext::create(&mut self.mount, viewport, camera) {
            Ok(ctx) => ctx,
            Err(err) => {
                log::error!("{} cannot start: {err}", self.content.name());
                self.mount.show_fallback(&err.to_string());
                return MountOutcome::Fallback(err);
            }
        };

        let content = &self.content;
        ctx.rebuild(|world, viewport| content.build(&config, viewport, world));

        let mut bridge = InputBridge::new(self.settings.drag_sensitivity);
        bridge.attach(&mut self.mount);

        let mut reactor = ResizeReactor::new();
        reactor.attach(&mut self.mount, &viewport);

        let mut driver = FrameDriver::new();
        driver.start(&mut self.mount);

        let handle = SceneHandle::next();
        log::info!(
            "{handle}: mounted {} ({} objects, {}x{})",
            self.content.name(),
            ctx.world().len(),
            viewport.width,
            viewport.height
        );

        self.scene = Some(SceneLifecycle {
            handle,
            config,
            ctx,
            driver,
            bridge,
            reactor,
            queue: EventQueue::new(),
        });
        MountOutcome::Mounted(handle)
    }

    /// Tears the scene down. `None` if nothing was mounted.
    pub fn unmount(&mut self) -> Option<TeardownReport> {
        let scene = self.scene.take()?;
        Some(scene.teardown(&mut self.mount))
    }

    /// Frame callback: drains queued events, advances one tick, draws once.
    pub fn on_frame(&mut self, token: FrameToken, time: FrameTime) -> FrameOutcome {
        let Some(scene) = self.scene.as_mut() else {
            log::trace!("{token} delivered with no scene mounted");
            return FrameOutcome::Ignored;
        };
        if !scene.driver.claim(token) {
            log::trace!("{}: ignoring stale {token}", scene.handle);
            return FrameOutcome::Ignored;
        }

        if scene.reactor.is_pending() {
            scene.reactor.react(self.mount.measure(), &mut scene.ctx);
        }

        let mut drag = RotationDelta::default();
        let mut saw_drag = false;
        let events: Vec<_> = scene.queue.drain().collect();
        for event in events {
            match event {
                SceneEvent::DragStart | SceneEvent::DragEnd => saw_drag = true,
                SceneEvent::DragMove(delta) => {
                    drag += delta;
                    saw_drag = true;
                }
                SceneEvent::Zoom(amount) => scene.ctx.camera_mut().dolly(amount),
                SceneEvent::ConfigChanged(change) => scene.apply_change(&self.content, &change),
            }
        }

        let interaction = scene.bridge.state().clone();
        match scene.driver.run_tick(time, &interaction, drag, saw_drag, &mut scene.ctx) {
            Ok(()) => {
                scene.driver.schedule(&mut self.mount);
                FrameOutcome::Drawn
            }
            Err(DrawError::Skipped(reason)) => {
                log::warn!("{}: frame {} skipped: {reason}", scene.handle, time.frame_index);
                scene.driver.schedule(&mut self.mount);
                FrameOutcome::Skipped
            }
            Err(DrawError::Fatal(reason)) => {
                log::error!("{}: {reason}; stopping", scene.handle);
                scene.driver.stop(&mut self.mount);
                self.mount.show_fallback(&reason);
                FrameOutcome::Stopped
            }
        }
    }

    /// Routes one input event. Returns true if it was consumed.
    pub fn on_input(&mut self, event: &InputEvent) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        if scene.bridge.handle(event, &mut scene.queue) {
            return true;
        }
        if let InputEvent::Key { key, state: KeyState::Pressed, repeat: false, .. } = event {
            if let Some(change) = self.content.key_binding(*key, &scene.config) {
                scene.queue.push(SceneEvent::ConfigChanged(change));
                return true;
            }
        }
        false
    }

    /// Resize notification from the host. `None` if nothing is mounted.
    pub fn on_resize(&mut self) -> Option<ResizeOutcome> {
        let scene = self.scene.as_mut()?;
        Some(scene.reactor.react(self.mount.measure(), &mut scene.ctx))
    }

    /// Queues a configuration change for the next tick.
    pub fn post_change(&mut self, change: <C::Config as SceneConfig>::Change) -> bool {
        match self.scene.as_mut() {
            Some(scene) => {
                scene.queue.push(SceneEvent::ConfigChanged(change));
                true
            }
            None => false,
        }
    }

    /// Parses `key=value` and queues it. Fails on unknown keys or bad values.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        let change = C::Config::parse_change(key, value)?;
        Ok(self.post_change(change))
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn handle(&self) -> Option<SceneHandle> {
        self.scene.as_ref().map(|s| s.handle)
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn config(&self) -> Option<&C::Config> {
        self.scene.as_ref().map(|s| &s.config)
    }

    pub fn world(&self) -> Option<&World> {
        self.scene.as_ref().map(|s| s.ctx.world())
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.scene.as_ref().map(|s| s.ctx.camera())
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.scene.as_ref().map(|s| s.ctx.viewport())
    }

    pub fn interaction(&self) -> Option<&InteractionState> {
        self.scene.as_ref().map(|s| s.bridge.state())
    }

    pub fn driver_state(&self) -> DriverState {
        self.scene
            .as_ref()
            .map_or(DriverState::Stopped, |s| s.driver.state())
    }

    /// Frames presented by the driver since mount.
    pub fn frames_drawn(&self) -> u64 {
        self.scene.as_ref().map_or(0, |s| s.driver.draws())
    }

    pub fn queued_events(&self) -> usize {
        self.scene.as_ref().map_or(0, |s| s.queue.len())
    }

    pub fn mount_point(&self) -> &M {
        &self.mount
    }

    pub fn mount_point_mut(&mut self) -> &mut M {
        &mut self.mount
    }
}

impl<M: MountPoint, C: Content> Drop for Stage<M, C> {
    fn drop(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.teardown(&mut self.mount);
        }
    }
}
