use ndarray::{arr2, Array2};
use serde::{Deserialize, Serialize};

/// Moment tensor in the catalog's (r, θ, φ) = (up, south, east) frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentTensor {
    pub mrr: f64,
    pub mtt: f64,
    pub mpp: f64,
    pub mrt: f64,
    pub mrp: f64,
    pub mtp: f64,
}

impl MomentTensor {
    /// Component order matches the catalog and common plotting tools: mrr, mtt, mpp, mrt, mrp, mtp.
    pub fn from_components(components: [f64; 6]) -> Self {
        let [mrr, mtt, mpp, mrt, mrp, mtp] = components;
        Self {
            mrr,
            mtt,
            mpp,
            mrt,
            mrp,
            mtp,
        }
    }

    pub fn components(&self) -> [f64; 6] {
        [self.mrr, self.mtt, self.mpp, self.mrt, self.mrp, self.mtp]
    }

    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|value| value.is_finite())
    }

    pub fn as_matrix(&self) -> Array2<f64> {
        arr2(&[
            [self.mrr, self.mrt, self.mrp],
            [self.mrt, self.mtt, self.mtp],
            [self.mrp, self.mtp, self.mpp],
        ])
    }

    pub fn trace(&self) -> f64 {
        self.mrr + self.mtt + self.mpp
    }

    /// Frobenius norm of the full symmetric matrix.
    pub fn norm(&self) -> f64 {
        let diagonal = self.mrr * self.mrr + self.mtt * self.mtt + self.mpp * self.mpp;
        let off_diagonal = self.mrt * self.mrt + self.mrp * self.mrp + self.mtp * self.mtp;
        (diagonal + 2.0 * off_diagonal).sqrt()
    }

    /// Returns the tensor divided by its norm, or `None` for a zero tensor.
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        let c = self.components().map(|value| value / norm);
        Some(Self::from_components(c))
    }

    /// Amplitude `nᵀ M n` for a unit direction given in (r, θ, φ).
    pub fn radiation(&self, direction: [f64; 3]) -> f64 {
        let [r, t, p] = direction;
        self.mrr * r * r
            + self.mtt * t * t
            + self.mpp * p * p
            + 2.0 * (self.mrt * r * t + self.mrp * r * p + self.mtp * t * p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_symmetric_in_catalog_order() {
        let mt = MomentTensor::from_components([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let m = mt.as_matrix();
        assert_eq!(m[[0, 1]], 4.0);
        assert_eq!(m[[1, 0]], 4.0);
        assert_eq!(m[[0, 2]], 5.0);
        assert_eq!(m[[1, 2]], 6.0);
        assert_eq!(m[[2, 2]], 3.0);
    }

    #[test]
    fn normalized_tensor_has_unit_norm() {
        let mt = MomentTensor::from_components([3.0e27, 0.0, -3.0e27, 0.0, 4.0e27, 0.0]);
        let unit = mt.normalized().unwrap();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
        assert!(MomentTensor::default().normalized().is_none());
    }

    #[test]
    fn radiation_is_positive_along_tension() {
        let thrust = MomentTensor::from_components([1.0, 0.0, -1.0, 0.0, 0.0, 0.0]);
        assert!(thrust.radiation([1.0, 0.0, 0.0]) > 0.0);
        assert!(thrust.radiation([0.0, 0.0, 1.0]) < 0.0);
    }
}
