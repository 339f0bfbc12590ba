//! Set of line ending styles present in a buffer.

use crate::LineEnding;

/// Distinct line ending styles found in a buffer.
///
/// Only two styles exist, so membership is stored as flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LineEndingSet {
    lf: bool,
    crlf: bool,
}

impl LineEndingSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set containing a single style.
    pub fn single(ending: LineEnding) -> Self {
        let mut set = Self::new();
        set.insert(ending);
        set
    }

    /// Add a style. Returns true if it was not present yet.
    pub fn insert(&mut self, ending: LineEnding) -> bool {
        let slot = self.slot_mut(ending);
        let added = !*slot;
        *slot = true;
        added
    }

    pub fn contains(&self, ending: LineEnding) -> bool {
        match ending {
            LineEnding::LF => self.lf,
            LineEnding::CRLF => self.crlf,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.lf && !self.crlf
    }

    /// Both styles present.
    pub fn is_mixed(&self) -> bool {
        self.lf && self.crlf
    }

    /// Short label for a status tile: "LF", "CRLF", "Mixed", or empty.
    pub fn label(&self) -> &'static str {
        if self.is_mixed() {
            "Mixed"
        } else {
            self.iter().next().map_or("", LineEnding::name)
        }
    }

    /// Human-readable description of the set.
    pub fn description(&self) -> &'static str {
        if self.is_mixed() {
            "mixed LF and CRLF"
        } else {
            self.iter().next().map_or("unknown", LineEnding::name)
        }
    }

    /// Iterate present styles in `LineEnding::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = LineEnding> + '_ {
        LineEnding::ALL
            .into_iter()
            .filter(move |ending| self.contains(*ending))
    }

    fn slot_mut(&mut self, ending: LineEnding) -> &mut bool {
        match ending {
            LineEnding::LF => &mut self.lf,
            LineEnding::CRLF => &mut self.crlf,
        }
    }
}

impl FromIterator<LineEnding> for LineEndingSet {
    fn from_iter<I: IntoIterator<Item = LineEnding>>(iter: I) -> Self {
        let mut set = Self::new();
        for ending in iter {
            set.insert(ending);
        }
        set
    }
}
