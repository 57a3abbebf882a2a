use crate::selection::Verdict;
use serde::{Deserialize, Serialize};

/// Counters for one filtering/rendering pass, owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassTally {
    pub plotted: usize,
    /// Accepted events whose tensor could not be drawn.
    pub skipped: usize,
    pub below_magnitude: usize,
    pub outside_window: usize,
    pub outside_region: usize,
    pub invalid_timestamps: usize,
}

impl PassTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_plotted(&mut self) {
        self.plotted += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_invalid_timestamp(&mut self) {
        self.invalid_timestamps += 1;
    }

    /// Counts a filter rejection; accepted verdicts are ignored.
    pub fn record_verdict(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accepted => {}
            Verdict::BelowMagnitude => self.below_magnitude += 1,
            Verdict::OutsideWindow => self.outside_window += 1,
            Verdict::OutsideRegion => self.outside_region += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.below_magnitude + self.outside_window + self.outside_region
    }

    pub fn considered(&self) -> usize {
        self.plotted + self.skipped + self.rejected() + self.invalid_timestamps
    }
}
