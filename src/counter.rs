/// A position into a growable sequence of slots.
///
/// Stepping past the last slot appends a fresh one; stepping back from the
/// first slot wraps to the last. The tape cursor and the level index are both
/// one of these, so the two boundary policies are defined exactly once.
///
/// The counter does not own the storage. Callers pass the backing `Vec` (or
/// its length) to each operation and must always pass the same one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowCursor {
    index: usize,
}

impl GrowCursor {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Step forward, appending `fresh()` first if already on the last slot.
    ///
    /// Returns true when the storage grew.
    #[inline]
    pub fn advance<T>(&mut self, slots: &mut Vec<T>, fresh: impl FnOnce() -> T) -> bool {
        let grew = self.index + 1 >= slots.len();
        if grew {
            slots.push(fresh());
        }
        self.index += 1;
        grew
    }

    /// Step back, landing on `len - 1` when already at 0.
    #[inline]
    pub fn retreat(&mut self, len: usize) {
        debug_assert!(len > 0, "cursor over empty storage");
        if self.index == 0 {
            self.index = len;
        }
        self.index -= 1;
    }

    #[inline]
    pub fn to_start(&mut self) {
        self.index = 0;
    }

    #[inline]
    pub fn to_end(&mut self, len: usize) {
        self.index = len.saturating_sub(1);
    }
}
