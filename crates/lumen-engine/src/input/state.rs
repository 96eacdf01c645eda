use std::collections::HashSet;

use super::types::{
    ButtonState, InputEvent, Key, KeyState, Modifiers, MouseButton, PointerButtonEvent,
    PointerMoveEvent,
};

/// Raw input tracking for one window.
///
/// Platforms do not report pointer position or modifiers on button events, so the
/// runtime keeps them here and stamps them onto translated events.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds an event into the tracked state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                // Keep the last position while a button is held: the drag continues outside.
                if self.buttons_down.is_empty() {
                    self.pointer_pos = None;
                }
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
                match state {
                    ButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    ButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::Wheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn pointer_position_survives_leaving_during_drag() {
        let mut s = InputState::default();
        s.apply_event(&press(10.0, 10.0));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, Some((10.0, 10.0)));
    }

    #[test]
    fn pointer_position_clears_when_idle() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        s.apply_event(&press(0.0, 0.0));
        s.apply_event(&InputEvent::Key {
            key: Key::A,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.button_down(MouseButton::Left));
        assert!(!s.key_down(Key::A));
    }
}
