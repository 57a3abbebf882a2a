/// Fatal structural problems found while reading a catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("malformed catalog at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("reading catalog: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Date/time strings that do not have the catalog's fixed layout.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("unexpected date/time layout {date:?} {time:?}")]
    Structure { date: String, time: String },
    #[error("cannot parse timestamp {0:?}")]
    Unparseable(String),
}

/// Raised when a moment tensor has no usable focal mechanism.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MechanismError {
    #[error("degenerate moment tensor: {0}")]
    Degenerate(String),
}
