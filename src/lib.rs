pub mod config;
pub mod databases;
pub mod error;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
