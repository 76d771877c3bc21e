//! In-memory stand-ins for the session, account store and mailer.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::databases::auth::accounts::{Account, AccountStore, NewAccount, StoreError};
use crate::services::email::{DeliveryFailure, Mailer};
use crate::session::{SessionError, SessionStore};

#[derive(Default)]
pub struct MemorySession {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySession {
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }

    fn clear(&self) {
        self.values.borrow_mut().clear();
    }
}

/// Enforces email uniqueness at insert time, like the `users` table does.
#[derive(Default)]
pub struct MemoryAccounts {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccounts {
    pub fn with_account(name: &str, email: &str) -> Self {
        let store = MemoryAccounts::default();
        store.accounts.lock().unwrap().push(Account {
            id: 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        });
        store
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccounts {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.accounts.lock().unwrap().iter().any(|a| a.email == email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().iter().find(|a| a.email == email).cloned())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let created = Account {
            id: accounts.len() as i32 + 1,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
        };
        accounts.push(created.clone());
        Ok(created)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryFailure> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<(), DeliveryFailure> {
        Err(DeliveryFailure {
            to: to.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}
