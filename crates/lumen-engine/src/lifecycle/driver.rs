use crate::scene::{RotationDelta, TickInput};
use crate::time::FrameTime;

use super::bridge::InteractionState;
use super::context::RenderContext;
use super::error::DrawError;
use super::mount::{FrameToken, MountPoint};

/// Frame driver state. `Running` iff a frame callback is (or is about to be) scheduled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// Per-frame tick scheduler: one update + one draw per delivered frame.
#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
    pending: Option<FrameToken>,
    ticks: u64,
    draws: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Stopped,
            pending: None,
            ticks: 0,
            draws: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames that reached the surface. Skipped and failed draws are not counted.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Stopped -> Running; schedules the first frame.
    pub fn start<M: MountPoint + ?Sized>(&mut self, mount: &mut M) {
        if self.state == DriverState::Running {
            return;
        }
        self.state = DriverState::Running;
        self.schedule(mount);
    }

    /// Requests the next frame unless one is already outstanding.
    pub fn schedule<M: MountPoint + ?Sized>(&mut self, mount: &mut M) {
        if self.state != DriverState::Running || self.pending.is_some() {
            return;
        }
        self.pending = Some(mount.request_frame());
    }

    /// Running -> Stopped; cancels the outstanding frame. Returns true if one was cancelled.
    pub fn stop<M: MountPoint + ?Sized>(&mut self, mount: &mut M) -> bool {
        self.state = DriverState::Stopped;
        match self.pending.take() {
            Some(token) => {
                mount.cancel_frame(token);
                true
            }
            None => false,
        }
    }

    /// Accepts a delivered frame callback.
    ///
    /// Stale tokens and callbacks that arrive after `stop` are rejected.
    pub fn claim(&mut self, token: FrameToken) -> bool {
        if self.state != DriverState::Running || self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Advances every object by one tick and issues exactly one draw.
    pub(crate) fn run_tick(
        &mut self,
        time: FrameTime,
        interaction: &InteractionState,
        drag: RotationDelta,
        saw_drag: bool,
        ctx: &mut RenderContext,
    ) -> Result<(), DrawError> {
        let tick = TickInput {
            dt: time.dt,
            elapsed: time.elapsed,
            auto_animate: interaction.auto_animate,
            dragging: interaction.dragging || saw_drag,
            drag,
        };
        ctx.world_mut().advance(&tick);
        self.ticks += 1;

        ctx.draw()?;
        self.draws += 1;
        Ok(())
    }
}
