use std::{env, net::SocketAddr};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use xun_calendar::{calendar, config, resolve_data_dir, router, AppState, Storage, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;

    let mut store = Store::load(Storage::new(&data_dir));
    store.subscribe(|_, key| debug!(key = ?key, "state updated"));

    let periods =
        calendar::compute_periods(config::YEAR, config::PERIOD_COUNT, config::PERIOD_DAYS);
    let state = AppState::new(periods, store);
    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
