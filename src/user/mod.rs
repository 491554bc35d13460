mod auth;
mod store;

pub use auth::PasswordHasherKind;
pub use store::{AdminBootstrap, AdminUser, SqliteUserStore, USER_VERSIONED_SCHEMAS};
