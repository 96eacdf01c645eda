use std::fmt;

/// Keyboard key identifier.
///
/// Only keys the scenes bind shortcuts to are named; everything else maps to
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// `=` / `+` on the main row, or keypad add.
    Plus,
    /// `-` on the main row, or keypad subtract.
    Minus,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

impl Key {
    /// Returns `0..=9` for digit keys.
    pub fn digit(self) -> Option<u8> {
        let d = match self {
            Key::Digit0 => 0,
            Key::Digit1 => 1,
            Key::Digit2 => 2,
            Key::Digit3 => 3,
            Key::Digit4 => 4,
            Key::Digit5 => 5,
            Key::Digit6 => 6,
            Key::Digit7 => 7,
            Key::Digit8 => 8,
            Key::Digit9 => 9,
            _ => return None,
        };
        Some(d)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` is "scroll lines" style input; `Pixel` is high precision (trackpads).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl WheelDelta {
    /// Vertical component normalized to lines (one line ~ 40 logical px).
    pub fn lines_y(self) -> f32 {
        match self {
            WheelDelta::Line { y, .. } => y,
            WheelDelta::Pixel { y, .. } => y / 40.0,
        }
    }
}

/// Listener categories a mount point can register.
///
/// Pointer move/up listeners observe events outside the mount point's bounds
/// so a drag that leaves the element still ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    Key,
    Focus,
    Resize,
}

impl ListenerKind {
    /// Listeners installed by the input bridge, in installation order.
    pub const INPUT: [ListenerKind; 6] = [
        ListenerKind::PointerDown,
        ListenerKind::PointerMove,
        ListenerKind::PointerUp,
        ListenerKind::Wheel,
        ListenerKind::Key,
        ListenerKind::Focus,
    ];

    /// True for listeners that must keep observing outside the mount point.
    pub fn captures_outside_bounds(self) -> bool {
        matches!(self, ListenerKind::PointerMove | ListenerKind::PointerUp)
    }
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event, carrying the position at the time of the press/release.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: ButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when the event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    Wheel {
        delta: WheelDelta,
        modifiers: Modifiers,
    },

    /// Pointer left the mount point's bounds.
    PointerLeft,

    /// Focus change.
    Focused(bool),
}

impl InputEvent {
    /// The listener that must be registered for this event to be delivered.
    ///
    /// `None` means the event only updates runtime-side tracking.
    pub fn listener_kind(&self) -> Option<ListenerKind> {
        match self {
            InputEvent::PointerButton(b) => Some(match b.state {
                ButtonState::Pressed => ListenerKind::PointerDown,
                ButtonState::Released => ListenerKind::PointerUp,
            }),
            InputEvent::PointerMoved(_) => Some(ListenerKind::PointerMove),
            InputEvent::Wheel { .. } => Some(ListenerKind::Wheel),
            InputEvent::Key { .. } => Some(ListenerKind::Key),
            InputEvent::Focused(_) => Some(ListenerKind::Focus),
            InputEvent::ModifiersChanged(_) | InputEvent::PointerLeft => None,
        }
    }
}
