use core::ops::Range;

/// Start and end cell of a chase's travel
///
/// `start` may be greater than `end` for chases running backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaseBounds {
    pub start: u32,
    pub end: u32,
}

impl ChaseBounds {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn lower(self) -> u32 {
        if self.start < self.end { self.start } else { self.end }
    }

    pub const fn upper(self) -> u32 {
        if self.start > self.end { self.start } else { self.end }
    }

    /// Distance between the two ends
    pub const fn span(self) -> u32 {
        self.upper() - self.lower()
    }

    /// Number of cells the chase can visit
    pub const fn cells(self) -> u32 {
        self.span() + 1
    }

    pub fn start_position(self) -> f64 {
        f64::from(self.start)
    }

    pub fn end_position(self) -> f64 {
        f64::from(self.end)
    }
}

impl Default for ChaseBounds {
    fn default() -> Self {
        Self::new(0, 10)
    }
}

/// Clamp a signed cell range onto `0..len`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn bounded(from: i64, to: i64, len: usize) -> Range<usize> {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let from = from.clamp(0, len_i) as usize;
    let to = to.clamp(0, len_i) as usize;
    from..to.max(from)
}
