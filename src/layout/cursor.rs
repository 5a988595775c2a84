//! Page cursor: remaining-space bookkeeping and break decisions.
//!
//! The cursor is a two-state machine. A reservation that does not fit moves
//! it to `NeedsBreak`, and nothing can be consumed until `advance_page`
//! brings it back to `OnPage`.

/// Cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Content may be placed on the current page
    OnPage,
    /// The last reservation did not fit; a page break is pending
    NeedsBreak,
}

/// Outcome of a reservation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservation {
    /// Whether the requested height fits on the current page
    pub fits: bool,

    /// Remaining usable height on the current page
    pub remaining: f32,
}

/// Tracks the vertical write position on the page being filled.
#[derive(Debug, Clone)]
pub struct PageCursor {
    usable_height: f32,
    used: f32,
    page_count: u32,
    state: CursorState,
}

/// Slack absorbing float rounding when heights are summed line by line.
const EPSILON: f32 = 1e-3;

impl PageCursor {
    /// Start on page 1 with the full usable height available.
    pub fn new(usable_height: f32) -> Self {
        Self {
            usable_height,
            used: 0.0,
            page_count: 1,
            state: CursorState::OnPage,
        }
    }

    /// Current state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Number of pages opened so far (the current page included).
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Height consumed on the current page.
    pub fn used(&self) -> f32 {
        self.used
    }

    /// Height still available on the current page.
    pub fn remaining(&self) -> f32 {
        (self.usable_height - self.used).max(0.0)
    }

    /// Whether nothing has been consumed on the current page.
    pub fn is_fresh(&self) -> bool {
        self.used <= 0.0
    }

    /// Check whether `height` fits on the current page.
    ///
    /// Does not consume anything. A failed check leaves the cursor in
    /// `NeedsBreak`.
    pub fn reserve(&mut self, height: f32) -> Reservation {
        let remaining = self.remaining();
        let fits = self.state == CursorState::OnPage && height <= remaining + EPSILON;
        if !fits {
            self.state = CursorState::NeedsBreak;
        }
        Reservation { fits, remaining }
    }

    /// Consume `height` at the current position and return the offset (from
    /// the top margin) where it starts.
    ///
    /// Returns `None` when a break is pending or the height does not fit.
    pub fn consume(&mut self, height: f32) -> Option<f32> {
        if self.state != CursorState::OnPage || height > self.remaining() + EPSILON {
            return None;
        }
        let offset = self.used;
        self.used = (self.used + height).min(self.usable_height);
        Some(offset)
    }

    /// Consume up to `height` of discardable spacing.
    ///
    /// Spacing that runs past the bottom of the page is dropped rather than
    /// carried to the next page.
    pub fn skip(&mut self, height: f32) {
        if self.state == CursorState::OnPage {
            self.used = (self.used + height).min(self.usable_height);
        }
    }

    /// Start a new page with the full usable height.
    pub fn advance_page(&mut self) {
        self.used = 0.0;
        self.page_count += 1;
        self.state = CursorState::OnPage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor() {
        let cursor = PageCursor::new(100.0);
        assert_eq!(cursor.state(), CursorState::OnPage);
        assert_eq!(cursor.page_count(), 1);
        assert_eq!(cursor.remaining(), 100.0);
        assert!(cursor.is_fresh());
    }

    #[test]
    fn test_reserve_does_not_consume() {
        let mut cursor = PageCursor::new(100.0);
        let r = cursor.reserve(40.0);
        assert!(r.fits);
        assert_eq!(r.remaining, 100.0);
        assert_eq!(cursor.remaining(), 100.0);
    }

    #[test]
    fn test_consume_returns_offset() {
        let mut cursor = PageCursor::new(100.0);
        assert_eq!(cursor.consume(30.0), Some(0.0));
        assert_eq!(cursor.consume(30.0), Some(30.0));
        assert_eq!(cursor.remaining(), 40.0);
        assert!(!cursor.is_fresh());
    }

    #[test]
    fn test_failed_reserve_needs_break() {
        let mut cursor = PageCursor::new(100.0);
        cursor.consume(80.0);
        let r = cursor.reserve(30.0);
        assert!(!r.fits);
        assert_eq!(r.remaining, 20.0);
        assert_eq!(cursor.state(), CursorState::NeedsBreak);

        // Nothing fits until the page advances, not even small heights.
        assert!(!cursor.reserve(1.0).fits);
        assert_eq!(cursor.consume(1.0), None);

        cursor.advance_page();
        assert_eq!(cursor.state(), CursorState::OnPage);
        assert_eq!(cursor.page_count(), 2);
        assert!(cursor.reserve(30.0).fits);
    }

    #[test]
    fn test_exact_fit() {
        let mut cursor = PageCursor::new(42.0);
        for _ in 0..3 {
            assert!(cursor.reserve(14.0).fits);
            cursor.consume(14.0);
        }
        assert!(!cursor.reserve(14.0).fits);
    }

    #[test]
    fn test_skip_clamps_to_page() {
        let mut cursor = PageCursor::new(50.0);
        cursor.consume(45.0);
        cursor.skip(20.0);
        assert_eq!(cursor.used(), 50.0);
        assert_eq!(cursor.remaining(), 0.0);
    }
}
