pub mod app;
pub mod client;
pub mod control;
pub mod controller;
pub mod session;
pub mod tabs;
pub mod view;

pub use app::{App, Command, Completion, Dispatch};
pub use client::Client;
pub use control::{Control, InFlight};
pub use controller::{HandController, PlayedHand, TournamentController};
pub use session::{AgentCatalog, SessionState};
pub use tabs::{Tab, TabController};
use hitstand_types::api::EnvelopeError;
use thiserror::Error;

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    /// The service answered with `success: false`; the message is shown as-is.
    #[error("{0}")]
    Service(String),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
    #[error("{0} is already in progress")]
    Busy(&'static str),
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
}

impl From<EnvelopeError> for Error {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Service(message) => Error::Service(message),
            EnvelopeError::Malformed(err) => Error::InvalidResponse(err),
        }
    }
}

impl Error {
    /// The request could not be sent or its response could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Reqwest(_) | Error::FailedWithBody { .. } | Error::InvalidResponse(_)
        )
    }

    /// The service understood the request and refused it.
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    /// Single line shown to the user.
    pub fn notification(&self) -> String {
        match self {
            Error::Service(message) => message.clone(),
            other if other.is_transport() => format!("Request failed: {other}"),
            other => other.to_string(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
