use crate::input::{ButtonState, InputEvent, Key, KeyState, ListenerKind, MouseButton};
use crate::scene::RotationDelta;

use super::events::{EventQueue, SceneEvent};
use super::mount::{ListenerId, MountPoint};

/// Radians of rotation per logical pixel of drag.
pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.01;

/// Camera dolly distance per wheel line.
pub const WHEEL_ZOOM_STEP: f32 = 0.5;

/// Transient, input-derived state. Owned by the input bridge; the frame driver
/// only reads it. Never stored in the world graph.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub dragging: bool,
    pub last_pointer: Option<(f32, f32)>,
    /// Automatic rotation on/off (Space).
    pub auto_animate: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            dragging: false,
            last_pointer: None,
            auto_animate: true,
        }
    }
}

/// Translates pointer/keyboard input on the mount point into scene events.
#[derive(Debug)]
pub struct InputBridge {
    sensitivity: f32,
    state: InteractionState,
    listeners: Vec<ListenerId>,
}

impl InputBridge {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            state: InteractionState::default(),
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Installs every input listener on `mount`.
    pub fn attach<M: MountPoint + ?Sized>(&mut self, mount: &mut M) {
        for kind in ListenerKind::INPUT {
            self.listeners.push(mount.add_listener(kind));
        }
    }

    /// Removes the listeners installed by [`attach`](Self::attach); returns how many.
    pub fn detach<M: MountPoint + ?Sized>(&mut self, mount: &mut M) -> usize {
        let n = self.listeners.len();
        for id in self.listeners.drain(..) {
            mount.remove_listener(id);
        }
        n
    }

    /// Folds one input event into the interaction state, queueing scene events.
    ///
    /// Returns false for events the bridge does not consume (unbound keys).
    pub fn handle<Ch>(&mut self, event: &InputEvent, queue: &mut EventQueue<Ch>) -> bool {
        match event {
            InputEvent::PointerButton(b) if b.button == MouseButton::Left => match b.state {
                ButtonState::Pressed => {
                    if !self.state.dragging {
                        self.state.dragging = true;
                        queue.push(SceneEvent::DragStart);
                    }
                    self.state.last_pointer = Some((b.x, b.y));
                    true
                }
                ButtonState::Released => {
                    if self.state.dragging {
                        self.move_pointer(b.x, b.y, queue);
                        self.end_drag(queue);
                    }
                    true
                }
            },

            InputEvent::PointerMoved(m) => {
                self.move_pointer(m.x, m.y, queue);
                true
            }

            InputEvent::Focused(false) => {
                // The release will never arrive.
                self.end_drag(queue);
                true
            }

            InputEvent::Wheel { delta, .. } => {
                let lines = delta.lines_y();
                if lines != 0.0 {
                    queue.push(SceneEvent::Zoom(lines * WHEEL_ZOOM_STEP));
                }
                true
            }

            InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false, .. } => {
                self.state.auto_animate = !self.state.auto_animate;
                log::debug!("auto-animate {}", if self.state.auto_animate { "on" } else { "off" });
                true
            }

            _ => false,
        }
    }

    fn move_pointer<Ch>(&mut self, x: f32, y: f32, queue: &mut EventQueue<Ch>) {
        if self.state.dragging {
            if let Some((lx, ly)) = self.state.last_pointer {
                let (dx, dy) = (x - lx, y - ly);
                if dx != 0.0 || dy != 0.0 {
                    queue.push(SceneEvent::DragMove(RotationDelta::new(
                        dx * self.sensitivity,
                        dy * self.sensitivity,
                    )));
                }
            }
        }
        self.state.last_pointer = Some((x, y));
    }

    fn end_drag<Ch>(&mut self, queue: &mut EventQueue<Ch>) {
        if self.state.dragging {
            self.state.dragging = false;
            queue.push(SceneEvent::DragEnd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, PointerButtonEvent, PointerMoveEvent, WheelDelta};

    fn button(state: ButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn drain(queue: &mut EventQueue<()>) -> Vec<SceneEvent<()>> {
        queue.drain().collect()
    }

    #[test]
    fn drag_emits_scaled_deltas() {
        let mut bridge = InputBridge::new(0.01);
        let mut q = EventQueue::new();
        bridge.handle(&button(ButtonState::Pressed, 100.0, 100.0), &mut q);
        assert!(bridge.state().dragging);
        bridge.handle(&moved(130.0, 80.0), &mut q);
        bridge.handle(&button(ButtonState::Released, 130.0, 80.0), &mut q);
        assert!(!bridge.state().dragging);

        let events = drain(&mut q);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SceneEvent::DragStart);
        let SceneEvent::DragMove(d) = events[1] else { panic!("expected DragMove") };
        assert!((d.yaw - 0.3).abs() < 1e-6);
        assert!((d.pitch + 0.2).abs() < 1e-6);
        assert_eq!(events[2], SceneEvent::DragEnd);
    }

    #[test]
    fn hover_does_not_rotate() {
        let mut bridge = InputBridge::new(0.01);
        let mut q: EventQueue<()> = EventQueue::new();
        bridge.handle(&moved(10.0, 10.0), &mut q);
        bridge.handle(&moved(50.0, 50.0), &mut q);
        assert!(q.is_empty());
        assert_eq!(bridge.state().last_pointer, Some((50.0, 50.0)));
    }

    #[test]
    fn release_at_a_new_position_reports_the_final_move() {
        let mut bridge = InputBridge::new(1.0);
        let mut q = EventQueue::new();
        bridge.handle(&button(ButtonState::Pressed, 0.0, 0.0), &mut q);
        bridge.handle(&button(ButtonState::Released, 5.0, 0.0), &mut q);
        let events = drain(&mut q);
        assert_eq!(
            events,
            vec![
                SceneEvent::DragStart,
                SceneEvent::DragMove(RotationDelta::new(5.0, 0.0)),
                SceneEvent::DragEnd
            ]
        );
    }

    #[test]
    fn focus_loss_ends_drag() {
        let mut bridge = InputBridge::new(0.01);
        let mut q = EventQueue::new();
        bridge.handle(&button(ButtonState::Pressed, 0.0, 0.0), &mut q);
        bridge.handle(&InputEvent::Focused(false), &mut q);
        assert!(!bridge.state().dragging);
        assert_eq!(drain(&mut q).last(), Some(&SceneEvent::DragEnd));
    }

    #[test]
    fn space_toggles_auto_animate_and_ignores_repeats() {
        let mut bridge = InputBridge::new(0.01);
        let mut q: EventQueue<()> = EventQueue::new();
        let key = |repeat| InputEvent::Key {
            key: Key::Space,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat,
        };
        bridge.handle(&key(false), &mut q);
        assert!(!bridge.state().auto_animate);
        assert!(!bridge.handle(&key(true), &mut q));
        assert!(!bridge.state().auto_animate);
    }

    #[test]
    fn wheel_becomes_zoom() {
        let mut bridge = InputBridge::new(0.01);
        let mut q = EventQueue::new();
        let wheel = InputEvent::Wheel {
            delta: WheelDelta::Line { x: 0.0, y: 2.0 },
            modifiers: Modifiers::default(),
        };
        bridge.handle(&wheel, &mut q);
        assert_eq!(drain(&mut q), vec![SceneEvent::Zoom(2.0 * WHEEL_ZOOM_STEP)]);
    }

    #[test]
    fn unbound_keys_are_not_consumed() {
        let mut bridge = InputBridge::new(0.01);
        let mut q: EventQueue<()> = EventQueue::new();
        let ev = InputEvent::Key {
            key: Key::W,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        assert!(!bridge.handle(&ev, &mut q));
    }
}
