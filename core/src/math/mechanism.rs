use crate::math::matrix::SymmetricEigen;
use crate::math::tensor::MomentTensor;
use crate::prelude::MechanismError;
use serde::{Deserialize, Serialize};

// Relative size below which the deviatoric part is treated as absent.
const DEVIATORIC_FLOOR: f64 = 1e-9;

/// Faulting regime implied by whichever principal axis is closest to vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultStyle {
    StrikeSlip,
    Thrust,
    Normal,
}

impl FaultStyle {
    pub fn label(self) -> &'static str {
        match self {
            FaultStyle::StrikeSlip => "strike slip fault",
            FaultStyle::Thrust => "thrust fault",
            FaultStyle::Normal => "normal fault",
        }
    }

    /// Reference tensor used for legend glyphs.
    pub fn reference_tensor(self) -> MomentTensor {
        match self {
            FaultStyle::StrikeSlip => {
                MomentTensor::from_components([0.0, -1.0, 1.0, 0.0, 0.0, 0.0])
            }
            FaultStyle::Thrust => MomentTensor::from_components([1.0, 0.0, -1.0, 0.0, 0.0, 0.0]),
            FaultStyle::Normal => MomentTensor::from_components([-1.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
        }
    }
}

/// One principal axis, with orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalAxis {
    pub value: f64,
    /// Angle below horizontal, 0..=90.
    pub plunge: f64,
    /// Clockwise from north, 0..360.
    pub azimuth: f64,
}

impl PrincipalAxis {
    fn from_vector(value: f64, vector: [f64; 3]) -> Self {
        let [r, t, p] = vector;
        let (mut north, mut east, mut down) = (-t, p, -r);
        if down < 0.0 {
            north = -north;
            east = -east;
            down = -down;
        }
        let plunge = down.clamp(-1.0, 1.0).asin().to_degrees();
        let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);
        Self {
            value,
            plunge,
            azimuth,
        }
    }
}

/// Principal-axis description of a drawable moment tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalMechanism {
    /// Unit-norm copy of the source tensor.
    pub tensor: MomentTensor,
    pub t_axis: PrincipalAxis,
    pub n_axis: PrincipalAxis,
    pub p_axis: PrincipalAxis,
    pub style: FaultStyle,
}

impl FocalMechanism {
    pub fn from_tensor(tensor: &MomentTensor) -> Result<Self, MechanismError> {
        if !tensor.is_finite() {
            return Err(MechanismError::Degenerate("non-finite component".into()));
        }
        let unit = tensor
            .normalized()
            .ok_or_else(|| MechanismError::Degenerate("zero tensor".into()))?;

        let matrix = unit.as_matrix();
        let eigen = SymmetricEigen::decompose(matrix.view());
        let isotropic = unit.trace() / 3.0;
        let deviatoric = eigen
            .values
            .iter()
            .map(|value| (value - isotropic).abs())
            .fold(0.0, f64::max);
        if deviatoric <= DEVIATORIC_FLOOR {
            return Err(MechanismError::Degenerate(
                "no deviatoric component".into(),
            ));
        }

        let t_axis = PrincipalAxis::from_vector(eigen.values[0], eigen.vector(0));
        let n_axis = PrincipalAxis::from_vector(eigen.values[1], eigen.vector(1));
        let p_axis = PrincipalAxis::from_vector(eigen.values[2], eigen.vector(2));

        let style = if t_axis.plunge >= n_axis.plunge && t_axis.plunge >= p_axis.plunge {
            FaultStyle::Thrust
        } else if p_axis.plunge >= n_axis.plunge {
            FaultStyle::Normal
        } else {
            FaultStyle::StrikeSlip
        };

        Ok(Self {
            tensor: unit,
            t_axis,
            n_axis,
            p_axis,
            style,
        })
    }

    /// Whether a lower-hemisphere direction (r, θ, φ) falls in a compressional quadrant.
    pub fn is_compressional(&self, direction: [f64; 3]) -> bool {
        self.tensor.radiation(direction) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tensors_classify_as_their_style() {
        for style in [FaultStyle::StrikeSlip, FaultStyle::Thrust, FaultStyle::Normal] {
            let mechanism = FocalMechanism::from_tensor(&style.reference_tensor()).unwrap();
            assert_eq!(mechanism.style, style);
        }
    }

    #[test]
    fn thrust_tension_axis_is_vertical() {
        let mechanism = FocalMechanism::from_tensor(&FaultStyle::Thrust.reference_tensor()).unwrap();
        assert!((mechanism.t_axis.plunge - 90.0).abs() < 1e-6);
        assert!(mechanism.p_axis.plunge.abs() < 1e-6);
        // P lies along the east-west (φ) direction.
        let azimuth = mechanism.p_axis.azimuth;
        assert!((azimuth - 90.0).abs() < 1e-6 || (azimuth - 270.0).abs() < 1e-6);
    }

    #[test]
    fn scaled_catalog_tensor_is_accepted() {
        let tohoku = MomentTensor::from_components([1.73e29, -0.281e29, -1.45e29, 2.12e29, 4.55e29, -0.657e29]);
        let mechanism = FocalMechanism::from_tensor(&tohoku).unwrap();
        assert!(mechanism.t_axis.value > 0.0);
        assert!(mechanism.p_axis.value < 0.0);
        assert_eq!(mechanism.style, FaultStyle::Thrust);
    }

    #[test]
    fn degenerate_tensors_are_rejected() {
        let zero = MomentTensor::default();
        let isotropic = MomentTensor::from_components([1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        let broken = MomentTensor::from_components([f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]);
        for tensor in [zero, isotropic, broken] {
            assert!(matches!(
                FocalMechanism::from_tensor(&tensor),
                Err(MechanismError::Degenerate(_))
            ));
        }
    }

    #[test]
    fn compressional_quadrant_follows_tension() {
        let mechanism = FocalMechanism::from_tensor(&FaultStyle::Thrust.reference_tensor()).unwrap();
        assert!(mechanism.is_compressional([-1.0, 0.0, 0.0]));
        assert!(!mechanism.is_compressional([0.0, 0.0, 1.0]));
    }
}
