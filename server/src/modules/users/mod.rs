//! User accounts: authentication, administration, and authorization.

pub mod authorizer;
pub mod service;

pub use authorizer::{Authorizer, Role};
