pub mod email;
pub mod password;
pub mod validation;
pub mod verification;
