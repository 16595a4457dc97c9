use std::{env, error::Error};

use tokio::{fs, net};
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

use astradex_accounts::{auth, db, server, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path =
        env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".into());
    let config = fs::read_to_string(&config_path).await?;
    let config = toml::from_str::<Config>(&config)?;

    let db_client = db::open(config.store);
    let users = db_client.read_all().await?;
    tracing::info!(
        path = %db_client.path().display(),
        users = users.len(),
        "opened user store"
    );

    let cors = server::cors(&config.http.cors)?;
    let app = server::router(auth::Service::new(
        db_client,
        config.demo_accounts,
    ))
    .layer(cors);

    let listener = net::TcpListener::bind(config.http.server.addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
