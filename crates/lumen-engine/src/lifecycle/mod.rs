//! Scene lifecycle.
//!
//! A [`Stage`] binds one [`Content`] builder to one [`MountPoint`] and owns
//! everything the scene creates:
//! - `RenderContext`: world graph, camera, drawing surface
//! - `FrameDriver`: one update + one draw per delivered frame
//! - `InputBridge`: pointer drag / wheel / keys -> [`SceneEvent`]s
//! - `ResizeReactor`: camera aspect and surface size track the mount point
//!
//! Teardown runs the steps in [`TeardownStep::ORDER`] exactly once, on
//! [`Stage::unmount`] or when the stage is dropped.

mod bridge;
mod content;
mod context;
mod driver;
mod error;
mod events;
mod handle;
mod mount;
mod reactor;
mod stage;
mod teardown;

pub use bridge::{DEFAULT_DRAG_SENSITIVITY, InputBridge, InteractionState, WHEEL_ZOOM_STEP};
pub use content::{Content, Reconfigure, SceneConfig, apply_options};
pub use context::RenderContext;
pub use driver::{DriverState, FrameDriver};
pub use error::{ConfigError, DrawError, LifecycleError};
pub use events::{EventQueue, SceneEvent};
pub use handle::SceneHandle;
pub use mount::{FrameToken, ListenerId, MountPoint, RenderBackend};
pub use reactor::{ResizeOutcome, ResizeReactor};
pub use stage::{FrameOutcome, MountOutcome, Stage, StageSettings};
pub use teardown::{TeardownReport, TeardownStep};
