use std::{
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use structview::*;
use tokio_util::sync::CancellationToken;

#[derive(Explore, Default)]
struct Stats {
    ticks: AtomicU64,
    history: RwLock<Vec<u64>>,
    #[explore(debug)]
    period: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let stats = Arc::new(Stats {
        period: Duration::from_millis(500),
        ..Default::default()
    });

    let explorer = Explorer::new(Config::default());
    explorer.register_shared("stats", stats.clone())?;

    let cancel = CancellationToken::new();
    let server = tokio::spawn(server::serve(explorer, cancel.clone()));

    // Keep changing the state; every GET / shows the current values.
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(stats.period);
        loop {
            interval.tick().await;
            let tick = stats.ticks.fetch_add(1, Ordering::Relaxed);
            let mut history = stats.history.write().expect("history lock poisoned");
            history.push(tick);
            if history.len() > 10 {
                history.remove(0);
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    ticker.abort();
    cancel.cancel();
    server.await.expect("server task panicked")
}
