//! Application state wiring and tracing setup.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use quotecast_core::quotes::InMemoryQuoteStore;
use quotecast_core::subscriptions::InMemorySubscriptionStore;
use quotecast_core::symbols::InMemorySymbolStore;
use quotecast_core::{
    BroadcastDispatcher, QuoteService, SubscriptionService, SymbolDirectoryService,
};
use quotecast_market_data::{IexProvider, MarketDataProvider, SimulatedProvider};

use crate::config::Config;
use crate::ws::ConnectionRegistry;

pub struct AppState {
    pub quote_service: Arc<QuoteService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub symbol_directory: Arc<SymbolDirectoryService>,
    pub dispatcher: Arc<BroadcastDispatcher>,
    pub connections: Arc<ConnectionRegistry>,
    pub provider_id: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("QUOTECAST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> = if config.use_simulated_provider {
        Arc::new(SimulatedProvider::new(config.simulated_interval))
    } else {
        let token = config.iex_token.as_deref().ok_or_else(|| {
            anyhow::anyhow!("QUOTECAST_IEX_TOKEN is required when the simulated provider is off")
        })?;
        match config.iex_base_url.as_deref() {
            Some(base_url) => Arc::new(IexProvider::new(base_url, token)),
            None => Arc::new(IexProvider::with_default_base_url(token)),
        }
    };
    let provider_id = provider.id().to_string();
    tracing::info!("Market data provider in use: {}", provider_id);

    // Connection registry doubles as the push channel - two-phase initialization
    // Phase 1: Create the registry (sockets can attach before any broadcast runs)
    let connections = Arc::new(ConnectionRegistry::new());

    let quote_store = Arc::new(InMemoryQuoteStore::new());
    let subscription_store = Arc::new(InMemorySubscriptionStore::new());
    let symbol_store = Arc::new(InMemorySymbolStore::new());

    let quote_service = Arc::new(
        QuoteService::new(provider.clone(), quote_store).with_chunk_size(config.refresh_chunk_size),
    );
    let subscription_service = Arc::new(SubscriptionService::new(subscription_store));
    let symbol_directory = Arc::new(
        SymbolDirectoryService::new(provider, symbol_store)
            .with_chunk_size(config.directory_chunk_size),
    );

    // Phase 2: The dispatcher fans out through the same registry
    let dispatcher = Arc::new(BroadcastDispatcher::new(
        subscription_service.clone(),
        connections.clone(),
    ));

    Ok(Arc::new(AppState {
        quote_service,
        subscription_service,
        symbol_directory,
        dispatcher,
        connections,
        provider_id,
    }))
}
