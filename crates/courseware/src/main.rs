use std::env;
use std::sync::Arc;

use courseware::config::ServiceConfig;
use courseware::gamification::GamificationConfig;
use courseware::server::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "courseware=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    let gamification = match &config.gamification_dir {
        Some(dir) => GamificationConfig::load_from_directory(dir)?,
        None => {
            warn!("COURSEWARE_GAMIFICATION_DIR not set, gamification disabled");
            GamificationConfig::empty()
        }
    };
    if config.quiz_passing_score.is_none() {
        warn!("COURSEWARE_QUIZ_PASSING_SCORE not set, quiz requests must carry passingScore");
    }

    let addr = config.listen_addr;
    let backend_url = config.backend_url.clone();
    let state = Arc::new(AppState::new(config, gamification)?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, backend = %backend_url, "Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;
    Ok(())
}
