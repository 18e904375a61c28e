use std::net::SocketAddr;

use anyhow::Context;

use ug_portal_server::{app, db};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let pool = db::connect().await?;
    let port = match std::env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().context("PORT must be a valid port number")?,
        Err(_) => DEFAULT_PORT,
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Starting UG Portal HTTP Server on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app(pool).into_make_service())
        .await?;
    Ok(())
}
