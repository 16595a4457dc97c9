pub mod user;

use std::{
    io,
    path::{Path, PathBuf},
};

use derive_more::{Display, From};
use tokio::{fs, sync::Mutex};

use crate::config;

pub use self::user::User;

#[derive(Debug, Display, From)]
pub enum Error {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::error::Error for Error {}

pub fn open(config: config::Store) -> Client {
    Client::new(config.path)
}

/// Users persisted as a single JSON array, read and rewritten as a whole.
pub struct Client {
    path: PathBuf,

    // Serializes every read-modify-write cycle on the file.
    lock: Mutex<()>,
}

impl Client {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every stored user in insertion order.
    ///
    /// A missing file is created holding an empty array first.
    pub async fn read_all(&self) -> Result<Vec<User>, Error> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Replaces the whole store with `users`.
    pub async fn write_all(&self, users: &[User]) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        self.save(users).await
    }

    async fn load(&self) -> Result<Vec<User>, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(data) if data.trim().is_empty() => Ok(Vec::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "creating empty user store");
                self.save(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, users: &[User]) -> Result<(), Error> {
        if let Some(dir) =
            self.path.parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir).await?;
        }

        let data = serde_json::to_string_pretty(users)?;

        // Write aside and rename, so readers never see a truncated store.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}
