use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use log::error;

use crate::databases::auth::accounts::StoreError;
use crate::services::email::DeliveryFailure;
use crate::services::password::PasswordError;
use crate::services::validation::FieldError;
use crate::session::SessionError;

/// Outcomes of the signup, verification and login flows.
///
/// Handlers turn the user-facing variants into re-rendered forms or flashes;
/// everything else falls through to `ResponseError` as a 500.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("form validation failed")]
    Validation(Vec<FieldError>),

    #[error("an account with that email already exists")]
    DuplicateEmail,

    #[error("incorrect verification code")]
    IncorrectCode,

    #[error("no pending signup in session")]
    NoPendingSignup,

    #[error(transparent)]
    Delivery(#[from] DeliveryFailure),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::Database(e) => AuthError::Database(e),
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::IncorrectCode => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::NoPendingSignup => StatusCode::SEE_OTHER,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::NoPendingSignup => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .finish(),
            AuthError::Validation(_) | AuthError::IncorrectCode | AuthError::DuplicateEmail => {
                HttpResponse::build(self.status_code()).body(self.to_string())
            }
            _ => {
                error!("request failed: {}", self);
                HttpResponse::InternalServerError().body("Internal server error")
            }
        }
    }
}

/// Raised by the `CurrentAccount` extractor; answers with a redirect to the login page.
#[derive(Debug, thiserror::Error)]
#[error("login required")]
pub struct Unauthorized;

impl ResponseError for Unauthorized {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .finish()
    }
}
