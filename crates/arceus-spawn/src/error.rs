//! Crate-level error type

use crate::domain::encounter::TableId;
use crate::domain::table_format::TableFormatError;
use crate::infra::records::RecordError;
use thiserror::Error;

/// Errors raised while building or simulating a spawn batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Table id is not registered
    #[error("unknown encounter table {0}")]
    UnknownTable(TableId),
    /// Event type, location or parameter combination that was never reverse engineered
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    /// Raw record bytes could not be parsed
    #[error(transparent)]
    InvalidRecord(#[from] RecordError),
    /// Memory channel failure
    #[error("memory channel error: {0}")]
    Channel(String),
    /// Encounter table file could not be read
    #[error(transparent)]
    TableFormat(#[from] TableFormatError),
}

impl SpawnError {
    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(msg.into())
    }
}
