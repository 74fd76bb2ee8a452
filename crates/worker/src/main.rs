use chrono::{Datelike, Utc, Weekday};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lastmile_worker::sweep::run_delay_sweep;

/// The sweep runs once per week; cron fires this binary daily and every run
/// that is not a Monday exits immediately. `DELAY_SWEEP_FORCE=1` overrides
/// the gate for manual runs.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lastmile_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let today = Utc::now().date_naive();
    let forced = std::env::var("DELAY_SWEEP_FORCE").as_deref() == Ok("1");
    if today.weekday() != Weekday::Mon && !forced {
        tracing::info!(%today, "Not Monday, skipping delay sweep");
        return;
    }

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    let pool = match lastmile_db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };

    match run_delay_sweep(&pool, today).await {
        Ok(report) => {
            tracing::info!(
                checked = report.checked,
                delayed = report.delayed,
                "Delay sweep finished"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Delay sweep failed");
            std::process::exit(1);
        }
    }
}
