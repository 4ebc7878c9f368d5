//! In-memory provider shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::sync::Notify;

use crate::activities::{ActivityLogEntry, ActivityType};
use crate::errors::{Error, Result};
use crate::portfolio::holdings::{Fund, Holding};
use crate::portfolio::irr::{IrrRecalculationResult, LatestIrr};
use crate::portfolio::{ActivityScope, PortfolioDataProvider};

/// What the next bulk recalculation call returns.
#[derive(Clone)]
pub enum MockRecalculation {
    Succeeds(IrrRecalculationResult),
    Fails { status: u16, message: Option<String> },
}

pub struct MockProvider {
    pub holdings: Mutex<Vec<Holding>>,
    pub activities: Mutex<Vec<ActivityLogEntry>>,
    pub latest_irrs: Mutex<HashMap<i64, LatestIrr>>,
    pub catalog: Mutex<Vec<Fund>>,
    pub recalculation: Mutex<MockRecalculation>,
    pub fail_catalog: Mutex<bool>,
    pub fail_holdings: Mutex<bool>,
    pub failing_latest_irr: Mutex<Vec<i64>>,
    /// When set, recalculation waits for a notification before answering.
    pub recalculation_gate: Mutex<Option<Arc<Notify>>>,
    pub holdings_calls: AtomicUsize,
    pub activity_calls: AtomicUsize,
    pub latest_irr_calls: AtomicUsize,
    pub recalculation_calls: AtomicUsize,
    pub recalculation_dates: Mutex<Vec<NaiveDate>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            holdings: Mutex::new(Vec::new()),
            activities: Mutex::new(Vec::new()),
            latest_irrs: Mutex::new(HashMap::new()),
            catalog: Mutex::new(Vec::new()),
            recalculation: Mutex::new(MockRecalculation::Succeeds(
                IrrRecalculationResult::default(),
            )),
            fail_catalog: Mutex::new(false),
            fail_holdings: Mutex::new(false),
            failing_latest_irr: Mutex::new(Vec::new()),
            recalculation_gate: Mutex::new(None),
            holdings_calls: AtomicUsize::new(0),
            activity_calls: AtomicUsize::new(0),
            latest_irr_calls: AtomicUsize::new(0),
            recalculation_calls: AtomicUsize::new(0),
            recalculation_dates: Mutex::new(Vec::new()),
        }
    }

    pub fn with_holdings(self, holdings: Vec<Holding>) -> Self {
        *self.holdings.lock().unwrap() = holdings;
        self
    }

    pub fn with_activities(self, activities: Vec<ActivityLogEntry>) -> Self {
        *self.activities.lock().unwrap() = activities;
        self
    }

    pub fn with_recalculation(self, recalculation: MockRecalculation) -> Self {
        *self.recalculation.lock().unwrap() = recalculation;
        self
    }

    pub fn holdings_calls(&self) -> usize {
        self.holdings_calls.load(Ordering::SeqCst)
    }

    pub fn recalculation_calls(&self) -> usize {
        self.recalculation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortfolioDataProvider for MockProvider {
    async fn get_portfolio_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>> {
        self.holdings_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_holdings.lock().unwrap() {
            return Err(Error::Transport("connection refused".to_string()));
        }
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    async fn get_activity_logs(&self, scope: ActivityScope) -> Result<Vec<ActivityLogEntry>> {
        self.activity_calls.fetch_add(1, Ordering::SeqCst);
        let activities = self.activities.lock().unwrap().clone();
        Ok(match scope {
            ActivityScope::Portfolio(_) => activities,
            ActivityScope::Holding(holding_id) => activities
                .into_iter()
                .filter(|a| a.holding_id == holding_id)
                .collect(),
        })
    }

    async fn get_latest_irr(&self, holding_id: i64) -> Result<Option<LatestIrr>> {
        self.latest_irr_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_latest_irr.lock().unwrap().contains(&holding_id) {
            return Err(Error::Upstream {
                status: 500,
                message: None,
            });
        }
        Ok(self.latest_irrs.lock().unwrap().get(&holding_id).cloned())
    }

    async fn recalculate_portfolio_irr(
        &self,
        _portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> Result<IrrRecalculationResult> {
        self.recalculation_calls.fetch_add(1, Ordering::SeqCst);
        self.recalculation_dates.lock().unwrap().push(as_of_date);

        let gate = self.recalculation_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.recalculation.lock().unwrap().clone() {
            MockRecalculation::Succeeds(result) => Ok(result),
            MockRecalculation::Fails { status, message } => {
                Err(Error::Upstream { status, message })
            }
        }
    }

    async fn get_fund_catalog(&self) -> Result<Vec<Fund>> {
        if *self.fail_catalog.lock().unwrap() {
            return Err(Error::Transport("catalog unavailable".to_string()));
        }
        Ok(self.catalog.lock().unwrap().clone())
    }
}

pub fn holding(id: i64, portfolio_id: i64, fund_name: &str) -> Holding {
    Holding {
        id,
        portfolio_id,
        fund_id: Some(id * 10),
        fund_name: Some(fund_name.to_string()),
        status: Some("active".to_string()),
        ..Default::default()
    }
}

pub fn activity(
    id: i64,
    holding_id: i64,
    activity_type: ActivityType,
    amount: Decimal,
    (year, month, day): (i32, u32, u32),
) -> ActivityLogEntry {
    ActivityLogEntry {
        id,
        holding_id,
        activity_timestamp: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap().into(),
        activity_type,
        amount,
    }
}
