use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of one active scene lifecycle.
///
/// Created on mount, invalid after teardown. Never reused within a process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SceneHandle(NonZeroU64);

impl SceneHandle {
    pub(crate) fn next() -> Self {
        let raw = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
        // The counter starts at 1 and would need 2^64 mounts to wrap.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    pub fn raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let a = SceneHandle::next();
        let b = SceneHandle::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
