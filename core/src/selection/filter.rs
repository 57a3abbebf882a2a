use crate::catalog::EventRecord;
use crate::prelude::TimestampError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Inclusive latitude/longitude box, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Region {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Outcome of evaluating one record against an [`EventFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    BelowMagnitude,
    OutsideWindow,
    OutsideRegion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFilter {
    pub window: TimeWindow,
    /// An event passes when either mb or ms is strictly greater.
    pub min_magnitude: f64,
    pub region: Option<Region>,
}

impl EventFilter {
    pub fn new(window: TimeWindow, min_magnitude: f64) -> Self {
        Self {
            window,
            min_magnitude,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn passes_magnitude(&self, record: &EventRecord) -> bool {
        record.mb > self.min_magnitude || record.ms > self.min_magnitude
    }

    /// Decodes the origin time first, then checks magnitude, window and region.
    ///
    /// Fails only when the record's origin time cannot be normalized; the
    /// caller decides whether that skips the record or aborts the pass.
    pub fn evaluate(&self, record: &EventRecord) -> Result<Verdict, TimestampError> {
        let instant = record.timestamp()?;
        if !self.passes_magnitude(record) {
            return Ok(Verdict::BelowMagnitude);
        }
        if !self.window.contains(instant) {
            return Ok(Verdict::OutsideWindow);
        }
        if let Some(region) = &self.region {
            if !region.contains(record.latitude, record.longitude) {
                return Ok(Verdict::OutsideRegion);
            }
        }
        Ok(Verdict::Accepted)
    }
}
