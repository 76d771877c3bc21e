use actix_web::{http::header, web, HttpResponse};

pub mod auth;
pub mod conquer;
pub mod home;
pub mod login;
pub mod verify;


pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.configure(home::init)
        .configure(auth::init)
        .configure(verify::init)
        .configure(login::init)
        .configure(conquer::init);
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}
