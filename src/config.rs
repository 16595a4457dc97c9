use std::{net, path::PathBuf};

use serde::Deserialize;

use crate::db::user::{Id, Role};

#[derive(Deserialize)]
pub struct Config {
    pub store: Store,
    pub http: Http,
    #[serde(default)]
    pub demo_accounts: Vec<DemoAccount>,
}

#[derive(Deserialize)]
pub struct Store {
    pub path: PathBuf,
}

#[derive(Deserialize)]
pub struct Http {
    pub server: Server,
    pub cors: Cors,
}

#[derive(Deserialize)]
pub struct Server {
    pub addr: net::SocketAddr,
}

#[derive(Deserialize)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}

/// Built-in account resolved at login but never written to the store.
#[derive(Clone, Debug, Deserialize)]
pub struct DemoAccount {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub school: Option<String>,
    pub department: Option<String>,
    pub joining_date: Option<String>,
}
