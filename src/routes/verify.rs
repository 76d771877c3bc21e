use actix_session::Session;
use actix_web::{web, HttpResponse};
use crate::databases::auth::accounts::AccountStore;
use crate::databases::auth::pending::PendingSignup;
use crate::error::AuthError;
use crate::pages;
use crate::routes::{html, redirect};
use crate::services::validation::{FieldError, VerifyRequest};
use crate::services::verification::submit_code;
use crate::session::{push_flash, Flash};

const INCORRECT_CODE_MESSAGE: &str = "Not the right code buddy! Try again";

pub async fn verify_form(session: Session) -> Result<HttpResponse, AuthError> {
    match PendingSignup::load(&session)? {
        Some(pending) => Ok(html(pages::verify(&pending.email, &[]))),
        None => Ok(redirect("/")),
    }
}

pub async fn verify(
    session: Session,
    form: web::Form<VerifyRequest>,
    accounts: web::Data<dyn AccountStore>,
) -> Result<HttpResponse, AuthError> {
    // Nothing to confirm without a pending signup; never reach the workflow.
    let Some(pending) = PendingSignup::load(&session)? else {
        return Ok(redirect("/"));
    };

    match submit_code(&session, accounts.get_ref(), &form.ver_code).await {
        Ok(_) => {
            session.renew();
            Ok(redirect("/"))
        }
        Err(AuthError::Validation(errors)) => Ok(html(pages::verify(&pending.email, &errors))),
        Err(AuthError::IncorrectCode) => {
            let errors = [FieldError::new("ver_code", INCORRECT_CODE_MESSAGE)];
            Ok(html(pages::verify(&pending.email, &errors)))
        }
        Err(AuthError::NoPendingSignup) => Ok(redirect("/")),
        Err(AuthError::DuplicateEmail) => {
            push_flash(
                &session,
                Flash::warning("An account with that email already exists. Please log in instead."),
            )?;
            Ok(redirect("/sign-up"))
        }
        Err(e) => Err(e),
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/verify")
            .route(web::get().to(verify_form))
            .route(web::post().to(verify)),
    );
}
