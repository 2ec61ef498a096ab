use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use surety_auth_types::identity::InsufficientRole;
use surety_core::error::{FieldViolation, error_response};

/// Portal service error variants.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("invalid input")]
    Validation(Vec<FieldViolation>),
    // Unknown email, wrong PIN, expired or already-used PIN all look the same.
    #[error("Invalid email or PIN")]
    InvalidCredential,
    #[error("invalid or expired link")]
    TokenInvalid,
    #[error("forbidden")]
    Forbidden,
    #[error("proposal not found")]
    ProposalNotFound,
    #[error("policyholder not found")]
    PolicyholderNotFound,
    #[error("offer not found")]
    OfferNotFound,
    #[error("broker already exists")]
    BrokerAlreadyExists,
    #[error("offer already decided")]
    OfferAlreadyDecided,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::Forbidden => "FORBIDDEN",
            Self::ProposalNotFound => "PROPOSAL_NOT_FOUND",
            Self::PolicyholderNotFound => "POLICYHOLDER_NOT_FOUND",
            Self::OfferNotFound => "OFFER_NOT_FOUND",
            Self::BrokerAlreadyExists => "BROKER_ALREADY_EXISTS",
            Self::OfferAlreadyDecided => "OFFER_ALREADY_DECIDED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }
}

impl From<InsufficientRole> for PortalError {
    fn from(_: InsufficientRole) -> Self {
        Self::Forbidden
    }
}

impl From<JsonRejection> for PortalError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("body", rejection.body_text())
    }
}

impl From<PathRejection> for PortalError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation("path", rejection.body_text())
    }
}

impl From<QueryRejection> for PortalError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation("query", rejection.body_text())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::InvalidCredential | Self::TokenInvalid => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ProposalNotFound
            | Self::PolicyholderNotFound
            | Self::OfferNotFound => StatusCode::NOT_FOUND,
            Self::BrokerAlreadyExists | Self::OfferAlreadyDecided => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s are logged here; TraceLayer records every request.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let details: &[FieldViolation] = match &self {
            Self::Validation(details) => details.as_slice(),
            _ => &[],
        };
        error_response(status, self.kind(), &self.to_string(), details)
    }
}
