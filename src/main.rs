/*
 * Responsibility
 * - Start the tokio runtime
 * - Call app::run() (no logic lives here)
 */
use anyhow::Result;

mod api;
mod app;
mod config;
mod error;
mod middleware;
mod repos;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
