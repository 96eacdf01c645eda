use std::fmt;

use super::handle::SceneHandle;

/// Teardown steps, in the only order they ever run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TeardownStep {
    /// Stop the frame driver and cancel any scheduled frame.
    StopDriver,
    RemoveInputListeners,
    RemoveResizeListener,
    /// Destroy the drawing surface and remove it from the mount point.
    DetachSurface,
    /// Free every geometry, material and buffer upload.
    ReleaseResources,
}

impl TeardownStep {
    pub const ORDER: [TeardownStep; 5] = [
        TeardownStep::StopDriver,
        TeardownStep::RemoveInputListeners,
        TeardownStep::RemoveResizeListener,
        TeardownStep::DetachSurface,
        TeardownStep::ReleaseResources,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TeardownStep::StopDriver => "stop-driver",
            TeardownStep::RemoveInputListeners => "remove-input-listeners",
            TeardownStep::RemoveResizeListener => "remove-resize-listener",
            TeardownStep::DetachSurface => "detach-surface",
            TeardownStep::ReleaseResources => "release-resources",
        }
    }
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed teardown did.
#[derive(Debug, Clone, PartialEq)]
pub struct TeardownReport {
    pub handle: SceneHandle,
    pub steps: Vec<TeardownStep>,
    /// A scheduled frame was cancelled by `StopDriver`.
    pub cancelled_frame: bool,
    pub listeners_removed: usize,
    pub resources_released: usize,
}

impl TeardownReport {
    pub(crate) fn new(handle: SceneHandle) -> Self {
        Self {
            handle,
            steps: Vec::with_capacity(TeardownStep::ORDER.len()),
            cancelled_frame: false,
            listeners_removed: 0,
            resources_released: 0,
        }
    }

    pub(crate) fn record(&mut self, step: TeardownStep) {
        log::trace!("{}: teardown {}", self.handle, step);
        self.steps.push(step);
    }

    /// All five steps ran in order.
    pub fn is_complete(&self) -> bool {
        self.steps == TeardownStep::ORDER
    }
}
