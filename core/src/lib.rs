//! Core catalog parsing and moment-tensor mechanics for Global CMT maps.
//!
//! The modules cover the ndk record-group parser, the catalog timestamp
//! repair, event selection, and the tensor math the map renderer relies on.

pub mod catalog;
pub mod math;
pub mod prelude;
pub mod selection;
pub mod telemetry;
pub mod timestamp;

pub use catalog::{parse, parse_file, parse_str, EventRecord};
pub use prelude::{CatalogError, CatalogResult, MechanismError, TimestampError};
