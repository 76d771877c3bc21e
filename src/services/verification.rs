//! Signup verification workflow.
//!
//! `initiate_signup` parks the registration in the session and mails a
//! 6-digit code; `submit_code` compares a candidate against it and, on a
//! match, creates the account. No account exists before that point.
//!
//! There is no expiry and no attempt limit on codes; a pending signup stays
//! valid for as long as the session does.

use log::{info, warn};
use rand::Rng;
use std::ops::RangeInclusive;

use crate::databases::auth::accounts::{Account, AccountStore, NewAccount};
use crate::databases::auth::pending::{PendingSignup, SignupData};
use crate::error::AuthError;
use crate::services::email::Mailer;
use crate::services::password::hash_password;
use crate::services::validation::{validate_code, validate_signup};
use crate::session::{log_in, SessionStore};

pub const CODE_RANGE: RangeInclusive<u32> = 100_000..=999_999;
pub const VERIFICATION_SUBJECT: &str = "Confirm Your Account";

/// Returned once a code has been issued. The session carries the actual
/// pending state; this only reports where the code went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub email: String,
}

pub fn generate_code() -> String {
    rand::thread_rng().gen_range(CODE_RANGE).to_string()
}

pub fn verification_message(name: &str, code: &str) -> String {
    format!("Hey {}, {} is your code to verify your account.", name, code)
}

pub async fn initiate_signup<S, A, M>(
    session: &S,
    accounts: &A,
    mailer: &M,
    data: SignupData,
) -> Result<IssuedCode, AuthError>
where
    S: SessionStore + ?Sized,
    A: AccountStore + ?Sized,
    M: Mailer + ?Sized,
{
    validate_signup(&data).map_err(AuthError::Validation)?;

    if accounts.email_exists(&data.email).await? {
        return Err(AuthError::DuplicateEmail);
    }

    let pending = PendingSignup {
        name: data.name,
        email: data.email,
        password: data.password,
        verification_code: generate_code(),
    };
    pending.store(session)?;

    // A delivery failure is surfaced as-is; the pending signup stays in place.
    mailer
        .send(
            &pending.email,
            VERIFICATION_SUBJECT,
            &verification_message(&pending.name, &pending.verification_code),
        )
        .await?;

    info!("Verification code issued for {}", pending.email);
    Ok(IssuedCode { email: pending.email })
}

pub async fn submit_code<S, A>(session: &S, accounts: &A, candidate: &str) -> Result<Account, AuthError>
where
    S: SessionStore + ?Sized,
    A: AccountStore + ?Sized,
{
    let pending = PendingSignup::load(session)?.ok_or(AuthError::NoPendingSignup)?;

    validate_code(candidate).map_err(AuthError::Validation)?;
    if candidate != pending.verification_code {
        return Err(AuthError::IncorrectCode);
    }

    let password_hash = hash_password(&pending.password)?;
    let created = accounts
        .create_account(NewAccount {
            name: pending.name,
            email: pending.email.clone(),
            password_hash,
        })
        .await;

    let account = match created {
        Ok(account) => account,
        Err(err) => {
            let err = AuthError::from(err);
            if matches!(err, AuthError::DuplicateEmail) {
                // Lost the race to another signup for the same address; this
                // pending signup can never succeed.
                warn!("Email {} was registered while verification was pending", pending.email);
                PendingSignup::discard(session);
            }
            return Err(err);
        }
    };

    PendingSignup::discard(session);
    log_in(session, account.id)?;

    info!("Account {} created for {}", account.id, account.email);
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::databases::auth::pending::{SIGNUP_PASSWORD_KEY, VERIFICATION_CODE_KEY};
    use crate::services::password::verify_password;
    use crate::session::current_account_id;
    use crate::test_support::{FailingMailer, MemoryAccounts, MemorySession, RecordingMailer};

    fn ada() -> SignupData {
        SignupData {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            password: "longpass1".to_string(),
            confirm_password: "longpass1".to_string(),
        }
    }

    fn issued_code(session: &MemorySession) -> String {
        session.get(VERIFICATION_CODE_KEY).unwrap().expect("code issued")
    }

    #[test]
    fn codes_are_six_digit_numbers() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(CODE_RANGE.contains(&code.parse::<u32>().unwrap()));
        }
    }

    #[tokio::test]
    async fn initiate_stores_pending_and_mails_code() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();

        let issued = initiate_signup(&session, &accounts, &mailer, ada()).await.unwrap();
        assert_eq!(issued.email, "ada@x.com");

        let pending = PendingSignup::load(&session).unwrap().unwrap();
        assert_eq!(pending.name, "Ada");
        assert_eq!(pending.password, "longpass1");

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@x.com");
        assert_eq!(sent[0].subject, VERIFICATION_SUBJECT);
        assert_eq!(sent[0].body, verification_message("Ada", &pending.verification_code));
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn invalid_form_touches_nothing() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();
        let mut data = ada();
        data.confirm_password = "different1".to_string();

        let err = initiate_signup(&session, &accounts, &mailer, data).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(session.is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn existing_email_is_rejected_before_any_mail() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::with_account("Ada", "ada@x.com");
        let mailer = RecordingMailer::default();

        let err = initiate_signup(&session, &accounts, &mailer, ada()).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert!(mailer.sent().is_empty());
        assert_eq!(PendingSignup::load(&session).unwrap(), None);
    }

    #[tokio::test]
    async fn delivery_failure_propagates() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();

        let err = initiate_signup(&session, &accounts, &FailingMailer, ada()).await.unwrap_err();
        assert!(matches!(err, AuthError::Delivery(_)));
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn correct_code_creates_hashed_account_and_logs_in() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();
        initiate_signup(&session, &accounts, &mailer, ada()).await.unwrap();
        let code = issued_code(&session);

        let account = submit_code(&session, &accounts, &code).await.unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(account.email, "ada@x.com");
        assert_ne!(account.password_hash, "longpass1");
        assert!(verify_password("longpass1", &account.password_hash).unwrap());
        assert_eq!(current_account_id(&session).unwrap(), Some(account.id));
        assert_eq!(PendingSignup::load(&session).unwrap(), None);
        assert_eq!(session.get(SIGNUP_PASSWORD_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn wrong_code_keeps_pending_for_retry() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();
        initiate_signup(&session, &accounts, &mailer, ada()).await.unwrap();
        let code = issued_code(&session);
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let before = PendingSignup::load(&session).unwrap();
        for _ in 0..3 {
            let err = submit_code(&session, &accounts, wrong).await.unwrap_err();
            assert!(matches!(err, AuthError::IncorrectCode));
        }
        assert!(accounts.is_empty());
        assert_eq!(PendingSignup::load(&session).unwrap(), before);
        assert_eq!(current_account_id(&session).unwrap(), None);

        submit_code(&session, &accounts, &code).await.unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn code_is_compared_without_trimming() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        initiate_signup(&session, &accounts, &RecordingMailer::default(), ada()).await.unwrap();
        let code = issued_code(&session);

        let padded = format!(" {}", &code[..5]);
        let err = submit_code(&session, &accounts, &padded).await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectCode));

        let err = submit_code(&session, &accounts, &format!("{} ", code)).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn second_submission_finds_nothing_pending() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        initiate_signup(&session, &accounts, &RecordingMailer::default(), ada()).await.unwrap();
        let code = issued_code(&session);

        submit_code(&session, &accounts, &code).await.unwrap();
        let err = submit_code(&session, &accounts, &code).await.unwrap_err();

        assert!(matches!(err, AuthError::NoPendingSignup));
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn submit_without_signup_is_no_pending() {
        let err = submit_code(&MemorySession::default(), &MemoryAccounts::default(), "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NoPendingSignup));
    }

    #[tokio::test]
    async fn racing_signups_yield_one_account() {
        // Both sessions pass the pre-check before either commits.
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();
        let first = MemorySession::default();
        let second = MemorySession::default();
        initiate_signup(&first, &accounts, &mailer, ada()).await.unwrap();
        initiate_signup(&second, &accounts, &mailer, ada()).await.unwrap();

        submit_code(&first, &accounts, &issued_code(&first)).await.unwrap();
        let err = submit_code(&second, &accounts, &issued_code(&second)).await.unwrap_err();

        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(accounts.len(), 1);
        assert_eq!(PendingSignup::load(&second).unwrap(), None);
        assert_eq!(current_account_id(&second).unwrap(), None);
    }

    #[tokio::test]
    async fn second_signup_with_same_email_fails_at_precheck() {
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();
        let first = MemorySession::default();
        initiate_signup(&first, &accounts, &mailer, ada()).await.unwrap();
        submit_code(&first, &accounts, &issued_code(&first)).await.unwrap();

        let err = initiate_signup(&MemorySession::default(), &accounts, &mailer, ada())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn resignup_replaces_the_pending_code() {
        let session = MemorySession::default();
        let accounts = MemoryAccounts::default();
        let mailer = RecordingMailer::default();

        initiate_signup(&session, &accounts, &mailer, ada()).await.unwrap();
        let mut grace = ada();
        grace.name = "Grace".to_string();
        grace.email = "grace@x.com".to_string();
        initiate_signup(&session, &accounts, &mailer, grace).await.unwrap();

        let account = submit_code(&session, &accounts, &issued_code(&session)).await.unwrap();
        assert_eq!(account.email, "grace@x.com");
        assert_eq!(accounts.len(), 1);
    }
}
