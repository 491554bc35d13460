//! Password hashing for administrative accounts.

use anyhow::{anyhow, bail, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordHasherKind {
    Argon2,
}

impl FromStr for PasswordHasherKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(PasswordHasherKind::Argon2),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl fmt::Display for PasswordHasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordHasherKind::Argon2 => write!(f, "argon2"),
        }
    }
}

impl PasswordHasherKind {
    pub fn generate_b64_salt(&self) -> String {
        match self {
            PasswordHasherKind::Argon2 => {
                let mut salt = [0u8; 16];
                rand::rng().fill(&mut salt);
                // 16 bytes always encode to a valid salt
                SaltString::encode_b64(&salt)
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            }
        }
    }

    /// PHC string of `plain` hashed with `b64_salt`.
    pub fn hash<T: AsRef<str>>(&self, plain: &[u8], b64_salt: T) -> Result<String> {
        match self {
            PasswordHasherKind::Argon2 => {
                let salt =
                    SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
                let hash = Argon2::default()
                    .hash_password(plain, &salt)
                    .map_err(|err| anyhow!("{}", err))?;
                Ok(hash.to_string())
            }
        }
    }

    pub fn verify<T: AsRef<str>>(&self, plain_pw: &str, target_hash: T) -> Result<bool> {
        match self {
            PasswordHasherKind::Argon2 => {
                let password_hash =
                    PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
                Ok(Argon2::default()
                    .verify_password(plain_pw.as_bytes(), &password_hash)
                    .is_ok())
            }
        }
    }
}
