use crate::math::MomentTensor;
use crate::prelude::TimestampError;
use crate::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The six moment-tensor components with their uncertainties, unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentTensorComponents {
    pub mrr: f64,
    pub mrr_unc: f64,
    pub mtt: f64,
    pub mtt_unc: f64,
    pub mpp: f64,
    pub mpp_unc: f64,
    pub mrt: f64,
    pub mrt_unc: f64,
    pub mrp: f64,
    pub mrp_unc: f64,
    pub mtp: f64,
    pub mtp_unc: f64,
}

/// Centroid inversion result carried on the third line of a record group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub time_shift: f64,
    pub time_shift_unc: f64,
    pub latitude: f64,
    pub latitude_unc: f64,
    pub longitude: f64,
    pub longitude_unc: f64,
    pub depth: f64,
    pub depth_unc: f64,
}

/// Strike, dip and rake of one best double-couple nodal plane, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalPlane {
    pub strike: f64,
    pub dip: f64,
    pub rake: f64,
}

/// One seismic source assembled from a complete five-line record group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub catalog_id: String,
    /// `yyyy/mm/dd`, as written in the catalog.
    pub date: String,
    /// `hh:mm:ss.s`, as written in the catalog.
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub mb: f64,
    pub ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub moment_exponent: f64,
    pub tensor: MomentTensorComponents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Centroid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodal_planes: Option<[NodalPlane; 2]>,
}

impl EventRecord {
    /// Larger of the body-wave and surface-wave magnitudes.
    pub fn magnitude(&self) -> f64 {
        self.mb.max(self.ms)
    }

    /// Origin time, with the catalog's date layout and 60-second artifact repaired.
    pub fn timestamp(&self) -> Result<NaiveDateTime, TimestampError> {
        timestamp::to_instant(&self.date, &self.time)
    }

    pub fn normalized_timestamp(&self) -> Result<String, TimestampError> {
        timestamp::normalize(&self.date, &self.time)
    }

    /// Moment tensor scaled by `10^moment_exponent`.
    pub fn moment_tensor(&self) -> MomentTensor {
        let scale = 10f64.powf(self.moment_exponent);
        MomentTensor {
            mrr: self.tensor.mrr * scale,
            mtt: self.tensor.mtt * scale,
            mpp: self.tensor.mpp * scale,
            mrt: self.tensor.mrt * scale,
            mrp: self.tensor.mrp * scale,
            mtp: self.tensor.mtp * scale,
        }
    }
}
