use std::collections::VecDeque;

use crate::scene::RotationDelta;

/// Discrete interaction event, produced by the input bridge (or a host
/// control panel) and consumed once per tick by the frame driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent<Ch> {
    DragStart,
    /// Rotation already scaled by the drag sensitivity.
    DragMove(RotationDelta),
    DragEnd,
    /// Camera dolly amount; positive moves closer.
    Zoom(f32),
    ConfigChanged(Ch),
}

/// Single-consumer FIFO between event producers and the frame driver.
#[derive(Debug)]
pub struct EventQueue<Ch> {
    events: VecDeque<SceneEvent<Ch>>,
}

impl<Ch> Default for EventQueue<Ch> {
    fn default() -> Self {
        Self { events: VecDeque::new() }
    }
}

impl<Ch> EventQueue<Ch> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SceneEvent<Ch>) {
        self.events.push_back(event);
    }

    /// Takes every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = SceneEvent<Ch>> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
