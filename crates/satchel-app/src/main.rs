use satchel_core::config::load_config;
use satchel_db::db::connection::create_pool;
use satchel_service::notify::email::EmailChannel;
use satchel_service::notify::push::PushChannel;
use satchel_service::reminder::store::PgReminderStore;
use satchel_service::reminder::sweep::run_sweep;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Satchel reminder dispatcher");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    run_migrations(&config.database.url).await?;

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    tracing::info!("Database connection pool created.");

    let store = PgReminderStore::new(pool);
    let email = EmailChannel::new(&config.mail)?;
    let push = PushChannel;

    let period = std::time::Duration::from_secs(config.sweep.interval_seconds);
    let first_tick = tokio::time::Instant::now() + next_tick_delay(chrono::Utc::now(), period);
    let mut ticker = tokio::time::interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        interval_seconds = config.sweep.interval_seconds,
        "Sweep loop running"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = chrono::Utc::now();
                match run_sweep(&store, &email, &push, now).await {
                    Ok(stats) => {
                        if stats.due > 0 {
                            tracing::info!(?stats, "sweep pass delivered reminders");
                        }
                    }
                    Err(error) => tracing::error!(%error, "sweep pass failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// Delay from `now` to the next wall-clock instant aligned to the sweep
/// period, so the default 60-second cadence fires on whole minutes.
fn next_tick_delay(
    now: chrono::DateTime<chrono::Utc>,
    period: std::time::Duration,
) -> std::time::Duration {
    let period_ms = i64::try_from(period.as_millis()).unwrap_or(60_000).max(1);
    let elapsed_ms = now.timestamp_millis().rem_euclid(period_ms);
    std::time::Duration::from_millis(u64::try_from(period_ms - elapsed_ms).unwrap_or_default())
}

/// Applies pending migrations over a blocking connection before the async
/// pool starts serving.
async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        use diesel::Connection;
        use diesel_migrations::MigrationHarness;

        let mut conn = diesel::PgConnection::establish(&url)?;
        conn.run_pending_migrations(satchel_db::MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("running migrations: {e}"))?;
        Ok(())
    })
    .await??;

    tracing::info!("Database migrations applied");
    Ok(())
}
