use crate::session::{SessionError, SessionStore};

pub use crate::services::validation::SignupData;

pub const SIGNUP_EMAIL_KEY: &str = "signup_email";
pub const SIGNUP_NAME_KEY: &str = "signup_name";
pub const SIGNUP_PASSWORD_KEY: &str = "signup_password";
pub const VERIFICATION_CODE_KEY: &str = "verification_code";

const PENDING_KEYS: [&str; 4] = [
    SIGNUP_EMAIL_KEY,
    SIGNUP_NAME_KEY,
    SIGNUP_PASSWORD_KEY,
    VERIFICATION_CODE_KEY,
];

/// Registration data waiting for its emailed code. Lives only in the
/// session; at most one per session.
///
/// The password is held in plaintext until confirmation, when it is hashed
/// into the new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub verification_code: String,
}

impl PendingSignup {
    /// Writes all fields, replacing whatever signup was pending before.
    pub fn store<S: SessionStore + ?Sized>(&self, session: &S) -> Result<(), SessionError> {
        session.set(SIGNUP_EMAIL_KEY, &self.email)?;
        session.set(SIGNUP_NAME_KEY, &self.name)?;
        session.set(SIGNUP_PASSWORD_KEY, &self.password)?;
        session.set(VERIFICATION_CODE_KEY, &self.verification_code)
    }

    /// `None` unless every field is present.
    pub fn load<S: SessionStore + ?Sized>(session: &S) -> Result<Option<Self>, SessionError> {
        let (Some(verification_code), Some(email)) =
            (session.get(VERIFICATION_CODE_KEY)?, session.get(SIGNUP_EMAIL_KEY)?)
        else {
            return Ok(None);
        };
        let (Some(name), Some(password)) =
            (session.get(SIGNUP_NAME_KEY)?, session.get(SIGNUP_PASSWORD_KEY)?)
        else {
            return Ok(None);
        };

        Ok(Some(PendingSignup { name, email, password, verification_code }))
    }

    pub fn discard<S: SessionStore + ?Sized>(session: &S) {
        for key in PENDING_KEYS {
            session.remove(key);
        }
    }
}
