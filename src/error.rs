use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::Envelope;

/// Raw input could not be turned into a request payload.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid number encountered: {0}")]
    InvalidNumber(String),

    #[error("No instances provided.")]
    NoInstances,
}

/// The inference endpoint could not be reached or answered with a failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Response is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

impl TransportError {
    /// Numeric HTTP status, when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status(code) => Some(*code),
            TransportError::Request(err) | TransportError::Decode(err) => {
                err.status().map(|s| s.as_u16())
            }
        }
    }
}

/// Outcome of a failed submission, after it has been shown on the surface.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Unknown prediction mode '{0}', expected 'numeric' or 'text'")]
    InvalidMode(String),
}

/// Failures of the relay service. Each maps onto an error envelope.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RelayError {
    #[error("Invalid request body format. Expected a JSON object.")]
    InvalidBody,

    #[error("No instances provided in the event.")]
    NoInstances,

    #[error("Invalid format for 'instances'. {0}")]
    InvalidInstances(&'static str),

    #[error("Exception during inference invocation: {0}")]
    Upstream(String),

    #[error("Failed to encode instances as CSV: {0}")]
    Encode(String),
}

impl RelayError {
    pub fn envelope(&self) -> Envelope {
        Envelope::error(self.status_code().as_u16(), &self.to_string())
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Upstream(_) | RelayError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}
