use crate::catalog::record::{Centroid, EventRecord, MomentTensorComponents, NodalPlane};
use crate::prelude::{CatalogError, CatalogResult};
use crate::telemetry::log::LogManager;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

const HEADER_FIELDS: usize = 8;
const TENSOR_FIELDS: usize = 13;

/// Position of a line inside its five-line record group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLine {
    /// Catalog tag, origin time, hypocenter and magnitudes.
    Header,
    /// Event identifier and inversion data-set summary.
    Identifiers,
    /// Centroid solution and its uncertainties.
    Centroid,
    /// Exponent plus the six tensor components and their uncertainties.
    Tensor,
    /// Principal axes, scalar moment and nodal planes.
    Axes,
}

impl GroupLine {
    pub fn next(self) -> Self {
        match self {
            GroupLine::Header => GroupLine::Identifiers,
            GroupLine::Identifiers => GroupLine::Centroid,
            GroupLine::Centroid => GroupLine::Tensor,
            GroupLine::Tensor => GroupLine::Axes,
            GroupLine::Axes => GroupLine::Header,
        }
    }

    /// 1-based position within the group.
    pub fn position(self) -> usize {
        match self {
            GroupLine::Header => 1,
            GroupLine::Identifiers => 2,
            GroupLine::Centroid => 3,
            GroupLine::Tensor => 4,
            GroupLine::Axes => 5,
        }
    }
}

/// Streaming reader for ndk catalogs.
pub struct CatalogParser {
    state: GroupLine,
    pending: Option<EventRecord>,
    records: Vec<EventRecord>,
    last_line: usize,
    logger: LogManager,
}

impl CatalogParser {
    pub fn new() -> Self {
        Self {
            state: GroupLine::Header,
            pending: None,
            records: Vec::new(),
            last_line: 0,
            logger: LogManager::scoped("catalog"),
        }
    }

    pub fn state(&self) -> GroupLine {
        self.state
    }

    /// Feeds one physical line. Blank lines are ignored and do not advance the group.
    pub fn consume_line(&mut self, line_no: usize, line: &str) -> CatalogResult<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        self.last_line = line_no;
        let fields: Vec<&str> = trimmed.split_whitespace().collect();

        match self.state {
            GroupLine::Header => {
                self.pending = Some(parse_header(line_no, &fields)?);
            }
            GroupLine::Identifiers => {
                let record = self.pending_mut(line_no)?;
                record.event_id = fields.first().map(|id| id.to_string());
            }
            GroupLine::Centroid => {
                let record = self.pending_mut(line_no)?;
                record.centroid = parse_centroid(&fields);
            }
            GroupLine::Tensor => {
                let (exponent, tensor) = parse_tensor(line_no, &fields)?;
                let record = self.pending_mut(line_no)?;
                record.moment_exponent = exponent;
                record.tensor = tensor;
            }
            GroupLine::Axes => {
                let mut record = self
                    .pending
                    .take()
                    .ok_or_else(|| CatalogError::malformed(line_no, "record group lost its header"))?;
                record.nodal_planes = parse_nodal_planes(&fields);
                self.records.push(record);
            }
        }

        self.state = self.state.next();
        Ok(())
    }

    /// Completes the pass; an unfinished group at end of input is fatal.
    pub fn finish(self) -> CatalogResult<Vec<EventRecord>> {
        if self.state != GroupLine::Header {
            return Err(CatalogError::malformed(
                self.last_line,
                format!(
                    "incomplete record group: input ended after {} of 5 lines",
                    self.state.position() - 1
                ),
            ));
        }
        self.logger
            .detail(&format!("parsed {} catalog records", self.records.len()));
        Ok(self.records)
    }

    fn pending_mut(&mut self, line_no: usize) -> CatalogResult<&mut EventRecord> {
        self.pending
            .as_mut()
            .ok_or_else(|| CatalogError::malformed(line_no, "record group lost its header"))
    }
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses every record group from `reader`, in file order.
pub fn parse<R: BufRead>(reader: R) -> CatalogResult<Vec<EventRecord>> {
    let mut parser = CatalogParser::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| match err.kind() {
            ErrorKind::InvalidData => {
                CatalogError::malformed(index + 1, "line is not valid UTF-8")
            }
            _ => CatalogError::Io(err),
        })?;
        parser.consume_line(index + 1, &line)?;
    }
    parser.finish()
}

pub fn parse_str(text: &str) -> CatalogResult<Vec<EventRecord>> {
    parse(text.as_bytes())
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> CatalogResult<Vec<EventRecord>> {
    let file = File::open(path.as_ref())?;
    parse(BufReader::new(file))
}

fn decimal(line_no: usize, name: &str, field: &str) -> CatalogResult<f64> {
    field.parse::<f64>().map_err(|_| {
        CatalogError::malformed(line_no, format!("{name}: {field:?} is not a number"))
    })
}

fn parse_header(line_no: usize, fields: &[&str]) -> CatalogResult<EventRecord> {
    if fields.len() < HEADER_FIELDS {
        return Err(CatalogError::malformed(
            line_no,
            format!(
                "header line has {} fields, expected at least {}",
                fields.len(),
                HEADER_FIELDS
            ),
        ));
    }
    let region = if fields.len() > HEADER_FIELDS {
        Some(fields[HEADER_FIELDS..].join(" "))
    } else {
        None
    };

    Ok(EventRecord {
        catalog_id: fields[0].to_string(),
        date: fields[1].to_string(),
        time: fields[2].to_string(),
        latitude: decimal(line_no, "latitude", fields[3])?,
        longitude: decimal(line_no, "longitude", fields[4])?,
        depth: decimal(line_no, "depth", fields[5])?,
        mb: decimal(line_no, "mb", fields[6])?,
        ms: decimal(line_no, "ms", fields[7])?,
        region,
        moment_exponent: 0.0,
        tensor: MomentTensorComponents::default(),
        event_id: None,
        centroid: None,
        nodal_planes: None,
    })
}

fn parse_tensor(
    line_no: usize,
    fields: &[&str],
) -> CatalogResult<(f64, MomentTensorComponents)> {
    if fields.len() != TENSOR_FIELDS {
        return Err(CatalogError::malformed(
            line_no,
            format!(
                "tensor line has {} fields, expected {}",
                fields.len(),
                TENSOR_FIELDS
            ),
        ));
    }
    let value = |index: usize, name: &str| decimal(line_no, name, fields[index]);

    let exponent = value(0, "moment_exponent")?;
    let tensor = MomentTensorComponents {
        mrr: value(1, "mrr")?,
        mrr_unc: value(2, "mrr_unc")?,
        mtt: value(3, "mtt")?,
        mtt_unc: value(4, "mtt_unc")?,
        mpp: value(5, "mpp")?,
        mpp_unc: value(6, "mpp_unc")?,
        mrt: value(7, "mrt")?,
        mrt_unc: value(8, "mrt_unc")?,
        mrp: value(9, "mrp")?,
        mrp_unc: value(10, "mrp_unc")?,
        mtp: value(11, "mtp")?,
        mtp_unc: value(12, "mtp_unc")?,
    };
    Ok((exponent, tensor))
}

// Optional metadata: anything that does not decode is dropped, never fatal.
fn parse_centroid(fields: &[&str]) -> Option<Centroid> {
    if fields.first() != Some(&"CENTROID:") || fields.len() < 9 {
        return None;
    }
    let values = fields[1..9]
        .iter()
        .map(|field| field.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    Some(Centroid {
        time_shift: values[0],
        time_shift_unc: values[1],
        latitude: values[2],
        latitude_unc: values[3],
        longitude: values[4],
        longitude_unc: values[5],
        depth: values[6],
        depth_unc: values[7],
    })
}

fn parse_nodal_planes(fields: &[&str]) -> Option<[NodalPlane; 2]> {
    if fields.len() < 7 {
        return None;
    }
    let values = fields[fields.len() - 6..]
        .iter()
        .map(|field| field.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    Some([
        NodalPlane {
            strike: values[0],
            dip: values[1],
            rake: values[2],
        },
        NodalPlane {
            strike: values[3],
            dip: values[4],
            rake: values[5],
        },
    ])
}
