//! Event selection and the size/depth classes used to draw accepted events.

pub mod filter;
pub mod scale;

pub use filter::{EventFilter, Region, TimeWindow, Verdict};
pub use scale::{DepthBands, MarkerScale};
