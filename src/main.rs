use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tea_storefront_api::{
    app::build_app,
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    email::Mailer,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tea_storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    tracing::info!("migrations applied");

    let mailer = Mailer::new(config.mail.clone())?;
    if !mailer.is_enabled() {
        tracing::warn!("MAIL_API_KEY not set; order emails will be skipped");
    }

    let state = AppState {
        orm: create_orm_conn(&pool),
        pool,
        config: Arc::new(config),
        mailer,
    };
    let app = build_app(state);

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
