use actix_session::Session;
use actix_web::{web, HttpResponse};
use crate::databases::auth::accounts::AccountStore;
use crate::databases::auth::pending::SignupData;
use crate::error::AuthError;
use crate::pages;
use crate::routes::{html, redirect};
use crate::services::email::Mailer;
use crate::services::verification::initiate_signup;
use crate::session::{current_account_id, push_flash, take_flash, Flash};

pub async fn signup_form(session: Session) -> Result<HttpResponse, AuthError> {
    if current_account_id(&session)?.is_some() {
        return Ok(redirect("/"));
    }

    let flash = take_flash(&session)?;
    Ok(html(pages::signup(&SignupData::default(), &[], flash.as_ref())))
}

pub async fn signup(
    session: Session,
    form: web::Form<SignupData>,
    accounts: web::Data<dyn AccountStore>,
    mailer: web::Data<dyn Mailer>,
) -> Result<HttpResponse, AuthError> {
    if current_account_id(&session)?.is_some() {
        return Ok(redirect("/"));
    }

    let data = form.into_inner();
    match initiate_signup(&session, accounts.get_ref(), mailer.get_ref(), data.clone()).await {
        Ok(_) => Ok(redirect("/verify")),
        Err(AuthError::Validation(errors)) => Ok(html(pages::signup(&data, &errors, None))),
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
        web::resource("/sign-up")
            .route(web::get().to(signup_form))
            .route(web::post().to(signup)),
    );
}
