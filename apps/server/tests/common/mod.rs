#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use wealthdesk_core::activities::{ActivityLogEntry, ActivityType};
use wealthdesk_core::errors::{Error, Result};
use wealthdesk_core::portfolio::holdings::{Fund, Holding};
use wealthdesk_core::portfolio::irr::{IrrRecalculationResult, LatestIrr, MissingValuation};
use wealthdesk_core::{ActivityScope, PortfolioDataProvider};
use wealthdesk_server::{api::app_router, build_state_with_provider, config::Config};

/// Portfolio 1 holds two active funds and one sold fund.
/// Portfolio 9 makes the backend reject recalculation.
pub struct StubBackend {
    pub holdings_calls: AtomicUsize,
    pub recalculations: Mutex<Vec<(i64, NaiveDate)>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            holdings_calls: AtomicUsize::new(0),
            recalculations: Mutex::new(Vec::new()),
        }
    }

    pub fn holdings_calls(&self) -> usize {
        self.holdings_calls.load(Ordering::SeqCst)
    }
}

fn holding(id: i64, fund_name: &str, status: &str) -> Holding {
    Holding {
        id,
        portfolio_id: 1,
        fund_id: Some(id + 100),
        fund_name: Some(fund_name.to_string()),
        status: Some(status.to_string()),
        product_owner: Some("J Smith".to_string()),
        portfolio_name: Some("ISA".to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl PortfolioDataProvider for StubBackend {
    async fn get_portfolio_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>> {
        self.holdings_calls.fetch_add(1, Ordering::SeqCst);
        if portfolio_id != 1 {
            return Ok(Vec::new());
        }
        let mut zeta = holding(1, "Zeta Income", "active");
        zeta.irr = Some(dec!(3.1));
        let mut cash = holding(2, "Cashline", "active");
        cash.irr = Some(dec!(0.5));
        let mut sold = holding(3, "Old Tracker", "inactive");
        sold.irr = Some(dec!(4.0));
        Ok(vec![zeta, cash, sold])
    }

    async fn get_activity_logs(&self, _scope: ActivityScope) -> Result<Vec<ActivityLogEntry>> {
        Ok(vec![
            ActivityLogEntry {
                id: 1,
                holding_id: 1,
                activity_timestamp: Utc.with_ymd_and_hms(2023, 2, 10, 9, 0, 0).unwrap().into(),
                activity_type: ActivityType::Investment,
                amount: dec!(1000),
            },
            ActivityLogEntry {
                id: 2,
                holding_id: 3,
                activity_timestamp: Utc.with_ymd_and_hms(2022, 7, 1, 9, 0, 0).unwrap().into(),
                activity_type: ActivityType::Withdrawal,
                amount: dec!(-400),
            },
        ])
    }

    async fn get_latest_irr(&self, _holding_id: i64) -> Result<Option<LatestIrr>> {
        Ok(None)
    }

    async fn recalculate_portfolio_irr(
        &self,
        portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> Result<IrrRecalculationResult> {
        self.recalculations
            .lock()
            .unwrap()
            .push((portfolio_id, as_of_date));
        if portfolio_id == 9 {
            return Err(Error::Upstream {
                status: 400,
                message: Some("Portfolio has no funds".to_string()),
            });
        }
        Ok(IrrRecalculationResult {
            total_funds: 3,
            successful: 2,
            skipped: 0,
            failed: 1,
            missing_valuations: vec![MissingValuation {
                holding_id: 2,
                fund_name: Some("Cashline".to_string()),
            }],
            ..Default::default()
        })
    }

    async fn get_fund_catalog(&self) -> Result<Vec<Fund>> {
        Ok(Vec::new())
    }
}

pub fn test_config() -> Config {
    Config {
        irr_refresh_delay: Duration::ZERO,
        ..Config::default()
    }
}

pub fn build_test_router() -> (Arc<StubBackend>, Router) {
    let backend = Arc::new(StubBackend::new());
    let config = test_config();
    let state = build_state_with_provider(&config, backend.clone());
    (backend, app_router(state, &config))
}
