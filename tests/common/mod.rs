use std::path::PathBuf;

use astradex_accounts::{
    api,
    auth,
    config::DemoAccount,
    db::{self, user},
    server,
};
use reqwest::StatusCode;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net;

pub struct Client {
    inner: reqwest::Client,
    base_url: String,
    pub store_path: PathBuf,
    _store_dir: TempDir,
}

impl Client {
    /// Serves the app on an ephemeral port over a fresh store.
    pub async fn spawn() -> Self {
        let store_dir = TempDir::new().expect("failed to create a store dir");
        let store_path = store_dir.path().join("user.json");

        let service = auth::Service::new(
            db::Client::new(&store_path),
            vec![DemoAccount {
                id: user::Id::from(2),
                name: "Prof. S. Sharma".into(),
                email: "staff@astradex.com".into(),
                password: "staff".into(),
                role: user::Role::Staff,
                school: Some("Astradex School".into()),
                department: Some("Physics Dept".into()),
                joining_date: Some("15/03/2024".into()),
            }],
        );
        let listener = net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind a listener");
        let addr = listener.local_addr().expect("failed to get an address");
        tokio::spawn(async move {
            axum::serve(listener, server::router(service))
                .await
                .expect("server failed");
        });

        Self {
            inner: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            store_path,
            _store_dir: store_dir,
        }
    }

    pub async fn index(&self) -> String {
        self.inner
            .get(&self.base_url)
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .expect("wrong status code")
            .text()
            .await
            .expect("failed to get a response")
    }

    pub async fn register(
        &self,
        body: Value,
    ) -> Result<api::Message, (StatusCode, api::Message)> {
        let resp = self
            .inner
            .post(format!("{}/register", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("failed to send a request");
        let status = resp.status();
        let message = resp
            .json::<api::Message>()
            .await
            .expect("failed to get a response");
        if status.is_success() {
            Ok(message)
        } else {
            Err((status, message))
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<api::user::Login, (StatusCode, api::Message)> {
        self.login_with(serde_json::json!({
            "email": email,
            "password": password,
        }))
        .await
    }

    pub async fn login_with(
        &self,
        body: Value,
    ) -> Result<api::user::Login, (StatusCode, api::Message)> {
        let resp = self
            .inner
            .post(format!("{}/login", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("failed to send a request");
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await.expect("failed to get a response"))
        } else {
            Err((status, resp.json().await.expect("failed to get a response")))
        }
    }

    pub async fn login_raw(&self, email: &str, password: &str) -> Value {
        self.inner
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .expect("wrong status code")
            .json()
            .await
            .expect("failed to get a response")
    }
}
