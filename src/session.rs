use actix_session::{Session, SessionExt};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::Unauthorized;

pub const ACCOUNT_ID_KEY: &str = "account_id";
const FLASH_CATEGORY_KEY: &str = "_flash_category";
const FLASH_MESSAGE_KEY: &str = "_flash_message";

#[derive(Debug, thiserror::Error)]
#[error("session error: {0}")]
pub struct SessionError(pub String);

/// Per-client string map. The verification workflow only ever talks to this,
/// never to a concrete cookie store.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str);
    fn clear(&self);
}

impl SessionStore for Session {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Session::get::<String>(self, key).map_err(|e| SessionError(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        Session::insert(self, key, value).map_err(|e| SessionError(e.to_string()))
    }

    fn remove(&self, key: &str) {
        Session::remove(self, key);
    }

    fn clear(&self) {
        Session::clear(self);
    }
}

pub fn log_in<S: SessionStore + ?Sized>(session: &S, account_id: i32) -> Result<(), SessionError> {
    session.set(ACCOUNT_ID_KEY, &account_id.to_string())
}

pub fn current_account_id<S: SessionStore + ?Sized>(session: &S) -> Result<Option<i32>, SessionError> {
    Ok(session
        .get(ACCOUNT_ID_KEY)?
        .and_then(|raw| raw.parse::<i32>().ok()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn warning(message: impl Into<String>) -> Self {
        Flash { category: "warning".to_string(), message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Flash { category: "danger".to_string(), message: message.into() }
    }
}

pub fn push_flash<S: SessionStore + ?Sized>(session: &S, flash: Flash) -> Result<(), SessionError> {
    session.set(FLASH_CATEGORY_KEY, &flash.category)?;
    session.set(FLASH_MESSAGE_KEY, &flash.message)
}

/// Returns the pending flash, if any, and removes it so it renders once.
/// A session that can't be read is an error, not an empty flash.
pub fn take_flash<S: SessionStore + ?Sized>(session: &S) -> Result<Option<Flash>, SessionError> {
    let Some(message) = session.get(FLASH_MESSAGE_KEY)? else {
        return Ok(None);
    };
    let category = session
        .get(FLASH_CATEGORY_KEY)?
        .unwrap_or_else(|| "info".to_string());
    session.remove(FLASH_MESSAGE_KEY);
    session.remove(FLASH_CATEGORY_KEY);
    Ok(Some(Flash { category, message }))
}

/// The authenticated caller. Extracting it from a request without a logged-in
/// session redirects to the login page.
#[derive(Debug, Clone, Copy)]
pub struct CurrentAccount {
    pub id: i32,
}

impl FromRequest for CurrentAccount {
    type Error = Unauthorized;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        ready(match current_account_id(&session) {
            Ok(Some(id)) => Ok(CurrentAccount { id }),
            _ => Err(Unauthorized),
        })
    }
}
