//! Turncoat Commerce - storefront extensions service

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turncoat_commerce::api::{self, AppState};
use turncoat_commerce::domain::ports::Notifier;
use turncoat_commerce::infrastructure::{nats, postgres};
use turncoat_commerce::modules::category_bundle::CategoryBundleService;
use turncoat_commerce::payment::sumup::SumUpProvider;
use turncoat_commerce::subscribers::{CartPromotionGuard, OrderPlacedNotifier, Subscribers};
use turncoat_commerce::workflows::PromotionHooks;
use turncoat_commerce::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let db = PgPoolOptions::new().max_connections(10).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let bundles = CategoryBundleService::new(Arc::new(postgres::PgCategoryBundleStore::new(db.clone())));
    let payments = Arc::new(SumUpProvider::new(config.sumup.clone())?);

    let nats_client = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "NATS unavailable, event subscribers disabled");
                None
            }
        },
        None => None,
    };

    if let Some(client) = nats_client {
        let notifier: Arc<dyn Notifier> = Arc::new(nats::NatsNotifier::new(client.clone()));
        let subscribers = Arc::new(Subscribers {
            cart_guard: CartPromotionGuard::new(Arc::new(postgres::PgCartRepository::new(db.clone())), bundles.clone()),
            order_placed: OrderPlacedNotifier::new(Arc::new(postgres::PgOrderRepository::new(db.clone())), notifier, config.notification_admin_email.clone()),
            promotion_hooks: PromotionHooks::new(bundles.clone()),
        });
        nats::spawn_event_listeners(client, subscribers).await?;
    }

    let app = api::router(AppState { bundles, payments });

    tracing::info!("🚀 Turncoat Commerce listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
