use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors, one variant per failure kind. The transport layer maps the
/// kind to a status code with an exhaustive match instead of inspecting
/// message text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A structural rule was violated (missing/short title, non-array
    /// ingredients or instructions). Raised before any write is issued.
    #[error("{0}")]
    Validation(String),
    /// A locally-checkable client mistake, e.g. a non-numeric id. Raised
    /// before the repository is called.
    #[error("{0}")]
    InvalidInput(String),
    /// No row exists for the given id.
    #[error("{0}")]
    NotFound(String),
    /// The underlying store failed or is unreachable. The public message is
    /// deliberately generic; detail goes to the log.
    #[error("Database operation failed")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::Storage(e)
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(anyhow::Error::new(e))
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::NotFound(_) => "not_found",
            Error::Storage(_) => "storage_error",
        }
    }
}

/// An [`Error`] paired with the request path, ready to leave the process as
/// the public failure envelope.
#[derive(Debug)]
pub struct HttpError {
    pub error: Error,
    pub path: String,
}

impl HttpError {
    pub fn new(error: Error, path: impl Into<String>) -> Self {
        Self {
            error,
            path: path.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    message: String,
    error: String,
    timestamp: String,
    path: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let Error::Storage(ref source) = self.error {
            tracing::error!(error = %source, path = %self.path, "storage failure");
        }
        let status = self.error.status();
        let body = FailureBody {
            success: false,
            message: self.error.to_string(),
            error: self.error.kind().to_string(),
            timestamp: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            path: self.path,
        };
        (status, Json(body)).into_response()
    }
}
