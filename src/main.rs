use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

use conquer::config::Config;
use conquer::databases::auth::accounts::AccountStore;
use conquer::databases::setup_backend;
use conquer::routes;
use conquer::services::email::{Mailer, SmtpMailer};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let pool = setup_backend(&config).await?;
    let accounts: Arc<dyn AccountStore> = Arc::new(pool.clone());
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&config.mail)?);
    let session_key = Key::derive_from(config.secret_key.as_bytes());

    let cookie_secure = config.session_cookie_secure;

    info!("Server running at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::from(accounts.clone()))
            .app_data(web::Data::from(mailer.clone()))
            .configure(routes::init)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
