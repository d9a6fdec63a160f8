use serde::Serialize;
use thiserror::Error;

/// A single failed validation rule, tied to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The full error taxonomy of the platform. Every service operation converts
/// whatever goes wrong into one of these at its own boundary; raw store or
/// provider errors never cross the service layer. Display text is safe to show
/// to clients; the underlying detail is logged where the failure happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    #[error("signup was rejected by the identity provider")]
    SignupFailed,
    #[error("profile creation failed")]
    ProfileCreateFailed,
    #[error("user not found")]
    UserNotFound,
    #[error("campaign not found")]
    CampaignNotFound,
    #[error("you do not have permission to perform this action")]
    Unauthorized,
    #[error("campaign could not be created")]
    CreateFailed,
    #[error("status update failed")]
    UpdateFailed,
    #[error("application could not be submitted")]
    ApplicationFailed,
    #[error("you have already applied to this campaign")]
    DuplicateApplication,
    #[error("this campaign is not recruiting")]
    CampaignNotRecruiting,
    #[error("status cannot change from {from} to {to}")]
    InvalidStatusTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("lookup failed")]
    FetchFailed,
    #[error("an unexpected error occurred")]
    Internal,
}

impl PlatformError {
    /// Machine-readable code carried in the failure envelope.
    pub fn code(&self) -> &'static str {
        match self {
            PlatformError::SignupFailed => "SIGNUP_FAILED",
            PlatformError::ProfileCreateFailed => "PROFILE_CREATE_FAILED",
            PlatformError::UserNotFound => "USER_NOT_FOUND",
            PlatformError::CampaignNotFound => "CAMPAIGN_NOT_FOUND",
            PlatformError::Unauthorized => "UNAUTHORIZED",
            PlatformError::CreateFailed => "CREATE_FAILED",
            PlatformError::UpdateFailed => "UPDATE_FAILED",
            PlatformError::ApplicationFailed => "APPLICATION_FAILED",
            PlatformError::DuplicateApplication => "DUPLICATE_APPLICATION",
            PlatformError::CampaignNotRecruiting => "CAMPAIGN_NOT_RECRUITING",
            PlatformError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            PlatformError::Validation(_) => "VALIDATION_FAILED",
            PlatformError::FetchFailed => "FETCH_FAILED",
            PlatformError::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP-equivalent status for the failure envelope.
    pub fn status(&self) -> u16 {
        match self {
            PlatformError::SignupFailed
            | PlatformError::CreateFailed
            | PlatformError::UpdateFailed
            | PlatformError::ApplicationFailed
            | PlatformError::CampaignNotRecruiting
            | PlatformError::InvalidStatusTransition { .. }
            | PlatformError::Validation(_) => 400,
            PlatformError::Unauthorized => 403,
            PlatformError::UserNotFound | PlatformError::CampaignNotFound => 404,
            PlatformError::DuplicateApplication => 409,
            PlatformError::ProfileCreateFailed
            | PlatformError::FetchFailed
            | PlatformError::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Uniform success/failure envelope carried by every operation result,
/// regardless of transport.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            status: 200,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &PlatformError) -> Self {
        let details = match err {
            PlatformError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };
        Self {
            ok: false,
            status: err.status(),
            data: None,
            error: Some(ErrorBody {
                code: err.code(),
                message: err.to_string(),
                details,
            }),
        }
    }

    pub fn from_result(result: Result<T, PlatformError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}
