use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::error::AuthError;
use crate::pages;
use crate::routes::html;
use crate::session::{current_account_id, take_flash};

pub async fn home(session: Session) -> Result<HttpResponse, AuthError> {
    let authenticated = current_account_id(&session)?.is_some();
    let flash = take_flash(&session)?;
    Ok(html(pages::home(flash.as_ref(), authenticated)))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));
}
