pub mod parser;
pub mod record;

pub use parser::{parse, parse_file, parse_str, CatalogParser, GroupLine};
pub use record::{Centroid, EventRecord, MomentTensorComponents, NodalPlane};
