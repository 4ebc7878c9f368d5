use std::sync::Arc;

use chrono_tz::Tz;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wealthdesk_client::BackendClient;
use wealthdesk_core::portfolio::irr::RecalculationOrchestrator;
use wealthdesk_core::portfolio::performance::{PerformanceService, PerformanceServiceTrait};
use wealthdesk_core::PortfolioDataProvider;

use crate::config::Config;

pub struct AppState {
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
    pub recalculation: Arc<RecalculationOrchestrator>,
    /// Reporting timezone, used to pick the default activity year.
    pub timezone: Tz,
}

pub fn init_tracing() {
    let log_format = std::env::var("WD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
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

/// Wires the services against the configured backend.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let client = BackendClient::with_options(
        &config.backend_url,
        config.backend_token.clone(),
        config.request_timeout,
    )?;
    tracing::info!("Backend API: {}", client.base_url());
    Ok(build_state_with_provider(config, Arc::new(client)))
}

pub fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn PortfolioDataProvider>,
) -> Arc<AppState> {
    let performance_service = Arc::new(PerformanceService::new(
        provider.clone(),
        config.view_options(),
    ));
    let recalculation = Arc::new(RecalculationOrchestrator::new(
        provider,
        performance_service.clone(),
        config.recalculation_options(),
    ));

    Arc::new(AppState {
        performance_service,
        recalculation,
        timezone: config.timezone,
    })
}
