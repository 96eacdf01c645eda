//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` translates window events into `InputEvent`s; the lifecycle's
//! input bridge turns those into scene events.

mod state;
mod types;

pub mod platform;

pub use state::InputState;
pub use types::{
    ButtonState,
    InputEvent,
    Key,
    KeyState,
    ListenerKind,
    Modifiers,
    MouseButton,
    PointerButtonEvent,
    PointerMoveEvent,
    WheelDelta,
};
