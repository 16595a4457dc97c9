pub mod user;

use serde::{Deserialize, Serialize};

pub use self::user::User;

/// Body of every response that only carries a status message.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
