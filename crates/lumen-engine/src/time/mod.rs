//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime:
//! - `FrameClock` for windowed scenes, one per scene
//! - `FixedClock` for headless runs and deterministic replays

mod frame_clock;

pub use frame_clock::{FixedClock, FrameClock, FrameTime};
