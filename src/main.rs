use std::env;

use outsourcing_cost_engine::api::{AppState, create_router};
use outsourcing_cost_engine::config::ConfigLoader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_POLICY_DIR: &str = "./config/standard";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outsourcing_cost_engine=debug,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let policy_dir = env::var("PRICING_POLICY_DIR").unwrap_or_else(|_| DEFAULT_POLICY_DIR.into());
    let bind_address =
        env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.into());

    let config = ConfigLoader::load(&policy_dir).inspect_err(|err| {
        tracing::error!(policy_dir = %policy_dir, error = %err, "Failed to load pricing policy");
    })?;

    let metadata = config.metadata();
    tracing::info!(
        policy = %metadata.code,
        version = %metadata.version,
        margin_formula = config.policy().options().margin_formula.as_str(),
        "Loaded pricing policy from {}",
        policy_dir
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    tracing::info!("Server started at http://{}", bind_address);
    axum::serve(listener, router).await?;

    Ok(())
}
