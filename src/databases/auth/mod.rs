pub mod accounts;
pub mod pending;
