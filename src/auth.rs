//! Registration and login over the user store.

use argon2::password_hash;
use derive_more::From;
use tokio::task;

use crate::{api, config::DemoAccount, db};

pub struct Service {
    db_client: db::Client,

    demo_accounts: Vec<DemoAccount>,
}

pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub grade: Option<String>,
    pub school: Option<String>,
}

impl Service {
    pub fn new(db_client: db::Client, demo_accounts: Vec<DemoAccount>) -> Self {
        Self {
            db_client,
            demo_accounts,
        }
    }

    /// Stores a new student account.
    pub async fn register(
        &self,
        Registration {
            name,
            email,
            password,
            grade,
            school,
        }: Registration,
    ) -> Result<(), RegisterError> {
        use RegisterError as E;

        require("Name", &name).map_err(E::MissingField)?;
        require("Email", &email).map_err(E::MissingField)?;
        require("Password", &password).map_err(E::MissingField)?;

        if self.demo_accounts.iter().any(|a| a.email == email)
            || self.db_client.get_user_by_email(&email).await?.is_some()
        {
            return Err(E::DuplicateUser);
        }

        let password_hash =
            task::spawn_blocking(move || db::user::PasswordHash::new(&password))
                .await?
                .map_err(E::HashingFailed)?;

        let user = db::User {
            id: db::user::Id::new(),
            name,
            email,
            password_hash: Some(password_hash),
            grade,
            school,
            role: db::user::Role::Student,
            department: None,
            joining_date: None,
        };
        let id = user.id;

        self.db_client.insert_user(user).await.map_err(|e| match e {
            db::user::InsertError::DbError(e) => E::DbError(e),
            db::user::InsertError::EmailTaken => E::DuplicateUser,
        })?;

        tracing::info!(user_id = ?id, "registered new student");
        Ok(())
    }

    /// Resolves `email` and `password` to the matching account.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<api::User, LoginError> {
        use LoginError as E;

        if let Some(demo) = self
            .demo_accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
        {
            tracing::info!(user_id = ?demo.id, "demo account logged in");
            return Ok(api::User {
                user_id: demo.id,
                name: demo.name.clone(),
                email: demo.email.clone(),
                grade: None,
                school: demo.school.clone(),
                role: demo.role,
                department: demo.department.clone(),
                joining_date: demo.joining_date.clone(),
            });
        }

        let candidates = self
            .db_client
            .read_all()
            .await?
            .into_iter()
            .filter(|u| u.email == email)
            .collect::<Vec<_>>();
        let password = password.to_owned();
        let user = task::spawn_blocking(move || {
            if candidates.is_empty() {
                db::user::PasswordHash::verify_nothing(&password);
            }
            candidates.into_iter().find(|u| u.has_password(&password))
        })
        .await?
        .ok_or(E::InvalidCredentials)?;

        tracing::info!(user_id = ?user.id, "user logged in");
        Ok(api::User {
            user_id: user.id,
            name: user.name,
            email: user.email,
            grade: user.grade,
            school: user.school,
            role: user.role,
            department: user.department,
            joining_date: user.joining_date,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        Err(field)
    } else {
        Ok(())
    }
}

#[derive(Debug, From)]
pub enum RegisterError {
    #[from]
    DbError(db::Error),
    DuplicateUser,
    HashingFailed(password_hash::Error),
    #[from]
    JoinError(task::JoinError),
    MissingField(&'static str),
}

#[derive(Debug, From)]
pub enum LoginError {
    #[from]
    DbError(db::Error),
    InvalidCredentials,
    #[from]
    JoinError(task::JoinError),
}
