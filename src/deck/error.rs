use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{element::CodecError, store::StoreError};
use crate::api::ErrorResponse;

#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Slide '{0}' not found")]
    SlideNotFound(String),
    #[error("Option '{0}' not found")]
    OptionNotFound(String),
    #[error("Slide content is corrupt: {0}")]
    ContentCorrupt(String),
    #[error("Poll data is corrupt: {0}")]
    PollDataCorrupt(String),
    #[error("Internal error: {0}")]
    Internal(#[from] StoreError),
}

impl DeckError {
    /// Stable error kind reported to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            DeckError::NotFound(_) => "NotFound",
            DeckError::SlideNotFound(_) => "SlideNotFound",
            DeckError::OptionNotFound(_) => "OptionNotFound",
            DeckError::ContentCorrupt(_) => "ContentCorrupt",
            DeckError::PollDataCorrupt(_) => "PollDataCorrupt",
            DeckError::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DeckError::NotFound(_) | DeckError::SlideNotFound(_) | DeckError::OptionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DeckError::ContentCorrupt(_) | DeckError::PollDataCorrupt(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DeckError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CodecError> for DeckError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Content(e) => DeckError::ContentCorrupt(e.to_string()),
            CodecError::PollData(e) => DeckError::PollDataCorrupt(e.to_string()),
            CodecError::MissingPollData => {
                DeckError::PollDataCorrupt("poll element carries no poll data".into())
            }
        }
    }
}

impl IntoResponse for DeckError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "Request rejected");
        }
        (status, Json(ErrorResponse::new(self.kind(), &self.to_string()))).into_response()
    }
}
