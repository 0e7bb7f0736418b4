use std::time::Duration;
use thiserror::Error;

use crate::refresh::Step;

#[derive(Debug, Error)]
pub enum RdmError {
    #[error("invalid device url '{0}': must be an absolute http(s) url")]
    InvalidUrl(String),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} timed out after {}ms", .after.as_millis())]
    Timeout { endpoint: String, after: Duration },

    #[error("{step} failed: {source}")]
    Fetch {
        step: Step,
        #[source]
        source: Box<RdmError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl RdmError {
    /// Wrap an error with the refresh step it happened in.
    pub fn at(self, step: Step) -> Self {
        RdmError::Fetch {
            step,
            source: Box::new(self),
        }
    }

    /// The refresh step this error was raised in, if known.
    pub fn step(&self) -> Option<Step> {
        match self {
            RdmError::Fetch { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RdmError>;
