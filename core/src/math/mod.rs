pub mod matrix;
pub mod mechanism;
pub mod tensor;

pub use matrix::SymmetricEigen;
pub use mechanism::{FaultStyle, FocalMechanism, PrincipalAxis};
pub use tensor::MomentTensor;
