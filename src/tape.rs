use crate::counter::GrowCursor;

/// One level of BFLX memory: a byte tape with its own cursor.
///
/// The tape starts as a single zero cell. Moving forward off the last cell
/// appends a new zero cell; moving back from the first cell wraps around to
/// the last. Cells are never removed, so the cursor is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: GrowCursor,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    pub fn new() -> Self {
        Self {
            cells: vec![0],
            cursor: GrowCursor::new(),
        }
    }

    /// Move the cursor forward, growing the tape by one cell if needed.
    ///
    /// Returns true when a cell was appended.
    #[inline]
    pub fn forward(&mut self) -> bool {
        self.cursor.advance(&mut self.cells, || 0)
    }

    /// Move the cursor back, wrapping from the first cell to the last.
    #[inline]
    pub fn back(&mut self) {
        self.cursor.retreat(self.cells.len());
    }

    #[inline(always)]
    pub fn increment(&mut self) {
        let cell = self.current_mut();
        *cell = cell.wrapping_add(1);
    }

    #[inline(always)]
    pub fn decrement(&mut self) {
        let cell = self.current_mut();
        *cell = cell.wrapping_sub(1);
    }

    /// Flip every bit of the current cell. No instruction maps to this.
    #[inline(always)]
    pub fn invert(&mut self) {
        *self.current_mut() ^= 0xff;
    }

    #[inline(always)]
    pub fn get(&self) -> u8 {
        self.cells[self.cursor.index()]
    }

    #[inline(always)]
    pub fn set(&mut self, value: u8) {
        *self.current_mut() = value;
    }

    pub fn reset_to_start(&mut self) {
        self.cursor.to_start();
    }

    pub fn reset_to_end(&mut self) {
        self.cursor.to_end(self.cells.len());
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline(always)]
    fn current_mut(&mut self) -> &mut u8 {
        &mut self.cells[self.cursor.index()]
    }
}
