use std::{fmt, sync::OnceLock};

use argon2::{
    password_hash::{self, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
use derive_more::From;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Client, Error};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    // Records written without presence checks may lack any of these.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(
        default,
        rename = "password",
        skip_serializing_if = "Option::is_none"
    )]
    pub password_hash: Option<PasswordHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Id(Uuid);

impl Id {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<u128> for Id {
    fn from(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Staff,
    Admin,
}

/// Argon2id PHC string, stored under the `password` key.
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(secret: &str) -> Result<Self, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
    }

    pub fn verify(&self, secret: &str) -> bool {
        match password_hash::PasswordHash::new(&self.0) {
            Ok(hash) => Argon2::default()
                .verify_password(secret.as_bytes(), &hash)
                .is_ok(),
            // Stores written before hashing was introduced hold the secret
            // itself.
            Err(_) => self.0 == secret,
        }
    }

    /// Spends one verification against a throwaway hash, so a login for an
    /// unknown email costs as much as one with a wrong password.
    pub fn verify_nothing(secret: &str) {
        static DUMMY: OnceLock<Option<PasswordHash>> = OnceLock::new();

        if let Some(hash) = DUMMY.get_or_init(|| Self::new("").ok()) {
            let _ = hash.verify(secret);
        }
    }
}

impl User {
    /// Whether `secret` is this user's password. Records without a stored
    /// password never match.
    pub fn has_password(&self, secret: &str) -> bool {
        self.password_hash
            .as_ref()
            .is_some_and(|hash| hash.verify(secret))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[derive(Debug, From)]
pub enum InsertError {
    #[from]
    DbError(Error),
    EmailTaken,
}

impl Client {
    pub async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Error> {
        Ok(self.read_all().await?.into_iter().find(|u| u.email == email))
    }

    /// Appends `user` unless its email is already stored.
    ///
    /// The check and the write happen under the store lock, so two
    /// concurrent inserts can neither both succeed with the same email nor
    /// drop each other's record.
    pub async fn insert_user(&self, user: User) -> Result<(), InsertError> {
        let _guard = self.lock.lock().await;

        let mut users = self.load().await?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(InsertError::EmailTaken);
        }
        users.push(user);
        self.save(&users).await?;

        Ok(())
    }
}
