//! Explicit mapper configuration.
//!
//! There is no process-wide default: the configuration value is passed into
//! model construction, and every compiled statement carries the consistency
//! options it inherited from there. Honoring them is the transport's job.

use serde::{Deserialize, Serialize};

/// Consistency level requested for reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

impl std::fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::All => "ALL",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
        };
        write!(f, "{name}")
    }
}

/// Serial consistency level for conditional (compare-and-set) statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerialConsistencyLevel {
    Serial,
    LocalSerial,
}

/// Configuration handed to model construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Keyspace all table models built with this config live in.
    pub keyspace: String,
    #[serde(default)]
    pub read_consistency: Option<ConsistencyLevel>,
    #[serde(default)]
    pub write_consistency: Option<ConsistencyLevel>,
    #[serde(default)]
    pub serial_consistency: Option<SerialConsistencyLevel>,
}

impl MapperConfig {
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            read_consistency: None,
            write_consistency: None,
            serial_consistency: None,
        }
    }

    pub fn with_read_consistency(mut self, level: ConsistencyLevel) -> Self {
        self.read_consistency = Some(level);
        self
    }

    pub fn with_write_consistency(mut self, level: ConsistencyLevel) -> Self {
        self.write_consistency = Some(level);
        self
    }

    pub fn with_serial_consistency(mut self, level: SerialConsistencyLevel) -> Self {
        self.serial_consistency = Some(level);
        self
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
