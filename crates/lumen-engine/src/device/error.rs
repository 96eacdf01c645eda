use crate::lifecycle::DrawError;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); the scene cannot continue.
    Fatal,
}

impl SurfaceErrorAction {
    /// Maps the action onto the frame driver's error model.
    pub fn into_draw_error(self, err: &wgpu::SurfaceError) -> DrawError {
        match self {
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                DrawError::Skipped(err.to_string())
            }
            SurfaceErrorAction::Fatal => DrawError::Fatal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fatal_stops_the_driver() {
        let err = wgpu::SurfaceError::Timeout;
        assert!(matches!(
            SurfaceErrorAction::SkipFrame.into_draw_error(&err),
            DrawError::Skipped(_)
        ));
        assert!(matches!(
            SurfaceErrorAction::Reconfigured.into_draw_error(&err),
            DrawError::Skipped(_)
        ));
        assert!(matches!(
            SurfaceErrorAction::Fatal.into_draw_error(&wgpu::SurfaceError::OutOfMemory),
            DrawError::Fatal(_)
        ));
    }
}
