//! Error types.

use crate::ObjectId;
use thiserror::Error;

/// Errors raised while configuring or triggering a sensor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required sensor parameter is absent.
    #[error("Unable to retrieve sensor parameter: {0}")]
    MissingParameter(String),

    /// A sensor parameter is present but outside its valid range.
    #[error("Invalid sensor parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The sensor's host is not part of the sensor view.
    #[error("Host vehicle {0:?} not in sensor view")]
    HostNotFound(ObjectId),
}

pub type Result<T> = std::result::Result<T, Error>;
