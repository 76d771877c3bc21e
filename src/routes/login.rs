use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{error, info};

use crate::databases::auth::accounts::AccountStore;
use crate::error::AuthError;
use crate::pages;
use crate::routes::{html, redirect};
use crate::services::password::verify_password;
use crate::services::validation::{validate_login, LoginRequest};
use crate::session::{current_account_id, log_in, push_flash, take_flash, CurrentAccount, Flash};

const BAD_CREDENTIALS_MESSAGE: &str = "Email or password incorrect, try again!";

pub async fn login_form(session: Session) -> Result<HttpResponse, AuthError> {
    if current_account_id(&session)?.is_some() {
        return Ok(redirect("/"));
    }

    let flash = take_flash(&session)?;
    Ok(html(pages::login("", &[], flash.as_ref())))
}

/// Unknown email and wrong password end in the same flash so the form can't
/// reveal which addresses have accounts.
pub async fn login(
    session: Session,
    form: web::Form<LoginRequest>,
    accounts: web::Data<dyn AccountStore>,
) -> Result<HttpResponse, AuthError> {
    if current_account_id(&session)?.is_some() {
        return Ok(redirect("/"));
    }

    let form = form.into_inner();
    if let Err(errors) = validate_login(&form) {
        return Ok(html(pages::login(&form.email, &errors, None)));
    }
    let LoginRequest { email, password } = form;

    let account = accounts.find_by_email(&email).await?;
    let authenticated = match &account {
        Some(account) => verify_password(&password, &account.password_hash).unwrap_or_else(|e| {
            error!("Stored hash for account {} is unreadable: {}", account.id, e);
            false
        }),
        None => false,
    };

    match account {
        Some(account) if authenticated => {
            session.renew();
            log_in(&session, account.id)?;
            info!("Account {} logged in", account.id);
            Ok(redirect("/"))
        }
        _ => {
            push_flash(&session, Flash::danger(BAD_CREDENTIALS_MESSAGE))?;
            Ok(redirect("/login"))
        }
    }
}

pub async fn logout(account: CurrentAccount, session: Session) -> HttpResponse {
    session.purge();
    info!("Account {} logged out", account.id);
    redirect("/")
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_form))
            .route(web::post().to(login)),
    )
    .route("/logout", web::get().to(logout));
}
