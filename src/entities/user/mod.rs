//! Users and the session

pub mod store;

pub use crate::core::auth::User;
pub use store::{AuthStore, MIN_PASSWORD_LEN, SessionState};
