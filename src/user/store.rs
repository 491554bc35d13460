use super::auth::PasswordHasherKind;
use crate::config::AdminSettings;
use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned, Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// V 0
const ADMIN_USER_TABLE_V_0: Table = Table {
    name: "admin_user",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("email", &SqlType::Text, non_null = true),
        sqlite_column!("password_hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_admin_user_username", "username")],
};

pub const USER_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ADMIN_USER_TABLE_V_0],
    migration: None,
}];

#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

/// Result of [`SqliteUserStore::ensure_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created,
    AlreadyExists,
    /// The account exists but its password is not the configured one.
    PasswordDiffers,
}

pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
    hasher: PasswordHasherKind,
}

impl SqliteUserStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path, USER_VERSIONED_SCHEMAS, "user")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            hasher: PasswordHasherKind::Argon2,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("User store connection mutex poisoned"))
    }

    /// Creates the administrative account unless one with the same username
    /// already exists. Existing accounts are left untouched.
    pub fn ensure_admin(&self, admin: &AdminSettings) -> Result<AdminBootstrap> {
        if self.get_admin(&admin.username)?.is_some() {
            debug!("Admin user {} already exists", admin.username);
            if self.verify_password(&admin.username, &admin.password)? {
                return Ok(AdminBootstrap::AlreadyExists);
            }
            return Ok(AdminBootstrap::PasswordDiffers);
        }

        let salt = self.hasher.generate_b64_salt();
        let password_hash = self.hasher.hash(admin.password.as_bytes(), &salt)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO admin_user (username, email, password_hash, hasher) VALUES (?1, ?2, ?3, ?4)",
            params![
                admin.username,
                admin.email,
                password_hash,
                self.hasher.to_string()
            ],
        )
        .with_context(|| format!("Failed to create admin user {}", admin.username))?;
        debug!("Created admin user {}", admin.username);
        Ok(AdminBootstrap::Created)
    }

    pub fn get_admin(&self, username: &str) -> Result<Option<AdminUser>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, username, email, created FROM admin_user WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, i64>("id")?,
                        row.get::<_, String>("username")?,
                        row.get::<_, String>("email")?,
                        row.get::<_, i64>("created")?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(id, username, email, created)| AdminUser {
            id,
            username,
            email,
            created: DateTime::from_timestamp(created, 0).unwrap_or_default(),
        }))
    }

    /// Checks `password` against the stored hash. Unknown users never match.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let conn = self.lock()?;
        let stored = conn
            .query_row(
                "SELECT password_hash, hasher FROM admin_user WHERE username = ?1",
                params![username],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match stored {
            Some((hash, hasher)) => hasher.parse::<PasswordHasherKind>()?.verify(password, hash),
            None => Ok(false),
        }
    }
}
