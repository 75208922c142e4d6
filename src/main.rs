//! Shopping List - per-shop delivery tracker

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopping_list::api::{router, AppState};
use shopping_list::assets::InitialData;
use shopping_list::config::Config;
use shopping_list::store::ShoppingStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let state = InitialData::load(&config.assets).await?.into_state();
    let store = ShoppingStore::spawn(state, config.store_capacity);
    let app = router(AppState { store });

    tracing::info!("Shopping list listening on {}", config.bind_addr());
    axum::serve(tokio::net::TcpListener::bind(config.bind_addr()).await?, app).await?;
    Ok(())
}
