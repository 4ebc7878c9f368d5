use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use wealthdesk_core::constants::{DEFAULT_CASH_FUND_NAME, DEFAULT_IRR_REFRESH_DELAY_MS};
use wealthdesk_core::portfolio::irr::RecalculationOptions;
use wealthdesk_core::portfolio::performance::PerformanceViewOptions;
use wealthdesk_core::utils::time_utils::DEFAULT_REPORTING_TZ;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub backend_url: String,
    pub backend_token: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub irr_refresh_delay: Duration,
    pub cash_fund_name: String,
    pub timezone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            backend_url: "http://localhost:8000/api".to_string(),
            backend_token: None,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            irr_refresh_delay: Duration::from_millis(DEFAULT_IRR_REFRESH_DELAY_MS),
            cash_fund_name: DEFAULT_CASH_FUND_NAME.to_string(),
            timezone: DEFAULT_REPORTING_TZ,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = std::env::var("WD_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid WD_LISTEN_ADDR")?;
        let backend_url = std::env::var("WD_BACKEND_URL").unwrap_or(defaults.backend_url);
        let backend_token = std::env::var("WD_BACKEND_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let cors_allow = std::env::var("WD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("WD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let refresh_delay_ms: u64 = std::env::var("WD_IRR_REFRESH_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_IRR_REFRESH_DELAY_MS);
        let cash_fund_name = std::env::var("WD_CASH_FUND_NAME")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.cash_fund_name);
        let timezone = match std::env::var("WD_TIMEZONE") {
            Ok(name) => Tz::from_str(name.trim())
                .map_err(|e| anyhow::anyhow!("Invalid WD_TIMEZONE {name:?}: {e}"))?,
            Err(_) => defaults.timezone,
        };

        Ok(Self {
            listen_addr,
            backend_url,
            backend_token,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            irr_refresh_delay: Duration::from_millis(refresh_delay_ms),
            cash_fund_name,
            timezone,
        })
    }

    pub fn view_options(&self) -> PerformanceViewOptions {
        PerformanceViewOptions {
            cash_fund_name: self.cash_fund_name.clone(),
            timezone: self.timezone,
        }
    }

    pub fn recalculation_options(&self) -> RecalculationOptions {
        RecalculationOptions {
            refresh_delay: self.irr_refresh_delay,
        }
    }
}
