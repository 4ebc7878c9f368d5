use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::join_all;
use log::{debug, warn};

use super::csv_export::export_performance_csv;
use super::performance_model::{PerformanceView, PerformanceViewOptions, YearWindow};
use super::view_builder::build_performance_view;
use crate::activities::{activity_years, filter_by_year, monthly_totals};
use crate::errors::{Result, ValidationError};
use crate::portfolio::holdings::{Fund, Holding};
use crate::portfolio::{ActivityScope, PortfolioDataProvider};
use crate::utils::time_utils::today_in;

/// Years outside this range are rejected as input errors.
const MIN_REPORTING_YEAR: i32 = 1900;
const MAX_REPORTING_YEAR: i32 = 2200;

#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Fetches holdings and activity logs and rebuilds the performance table.
    async fn load_view(&self, portfolio_id: i64) -> Result<PerformanceView>;

    /// Activity entries of one calendar year plus the month-by-month grid.
    async fn year_window(&self, portfolio_id: i64, year: i32) -> Result<YearWindow>;

    /// Freshly built table rendered as CSV.
    async fn export_csv(&self, portfolio_id: i64) -> Result<String>;

    /// Most recent committed view, if any refresh has completed.
    fn cached_view(&self, portfolio_id: i64) -> Option<PerformanceView>;
}

pub struct PerformanceService {
    provider: Arc<dyn PortfolioDataProvider>,
    options: PerformanceViewOptions,
    next_ticket: AtomicU64,
    committed: DashMap<i64, (u64, PerformanceView)>,
}

impl PerformanceService {
    pub fn new(provider: Arc<dyn PortfolioDataProvider>, options: PerformanceViewOptions) -> Self {
        Self {
            provider,
            options,
            next_ticket: AtomicU64::new(0),
            committed: DashMap::new(),
        }
    }

    fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Stores `view` unless a refresh that started later has already been
    /// stored. Returns whether the view was committed.
    fn commit_view(&self, portfolio_id: i64, ticket: u64, view: &PerformanceView) -> bool {
        match self.committed.entry(portfolio_id) {
            Entry::Occupied(mut existing) => {
                if existing.get().0 > ticket {
                    debug!(
                        "Discarding superseded refresh {} for portfolio {} (latest {})",
                        ticket,
                        portfolio_id,
                        existing.get().0
                    );
                    return false;
                }
                existing.insert((ticket, view.clone()));
                true
            }
            Entry::Vacant(slot) => {
                slot.insert((ticket, view.clone()));
                true
            }
        }
    }

    /// The catalog is only used for display names, so a failed lookup
    /// degrades to the names the holdings already carry.
    async fn fund_catalog(&self) -> HashMap<i64, Fund> {
        match self.provider.get_fund_catalog().await {
            Ok(funds) => funds.into_iter().map(|f| (f.id, f)).collect(),
            Err(e) => {
                warn!("Failed to load fund catalog: {}. Using holding names only.", e);
                HashMap::new()
            }
        }
    }

    /// Fills IRRs the holdings payload left empty from the latest stored value.
    async fn fill_latest_irrs(&self, holdings: &mut [Holding]) {
        let missing: Vec<i64> = holdings
            .iter()
            .filter(|h| h.irr.is_none())
            .map(|h| h.id)
            .collect();
        if missing.is_empty() {
            return;
        }

        let lookups =
            join_all(missing.iter().map(|id| self.provider.get_latest_irr(*id))).await;

        let mut latest = HashMap::new();
        for (holding_id, lookup) in missing.into_iter().zip(lookups) {
            match lookup {
                Ok(Some(irr)) => {
                    latest.insert(holding_id, irr);
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to load latest IRR for holding {}: {}", holding_id, e),
            }
        }

        for holding in holdings.iter_mut() {
            if let Some(irr) = latest.remove(&holding.id) {
                holding.irr = Some(irr.irr);
                if holding.irr_date.is_none() {
                    holding.irr_date = irr.irr_date;
                }
            }
        }
    }
}

/// Copies fund name and ISIN from the catalog where the holding has none.
pub(crate) fn enrich_from_catalog(holdings: &mut [Holding], catalog: &HashMap<i64, Fund>) {
    for holding in holdings.iter_mut() {
        let Some(fund) = holding.fund_id.and_then(|id| catalog.get(&id)) else {
            continue;
        };
        if holding.fund_name.as_deref().map_or(true, str::is_empty) {
            holding.fund_name = Some(fund.fund_name.clone());
        }
        if holding.isin.is_none() {
            holding.isin = fund.isin_number.clone();
        }
    }
}

fn validate_year(year: i32) -> Result<()> {
    if (MIN_REPORTING_YEAR..=MAX_REPORTING_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::InvalidInput(format!("Year {year} is out of range")).into())
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn load_view(&self, portfolio_id: i64) -> Result<PerformanceView> {
        let ticket = self.issue_ticket();
        debug!("Refreshing portfolio {} (ticket {})", portfolio_id, ticket);

        let (mut holdings, activities) = futures::try_join!(
            self.provider.get_portfolio_holdings(portfolio_id),
            self.provider.get_activity_logs(ActivityScope::Portfolio(portfolio_id)),
        )?;

        let catalog = self.fund_catalog().await;
        enrich_from_catalog(&mut holdings, &catalog);
        self.fill_latest_irrs(&mut holdings).await;

        let today = today_in(self.options.timezone);
        let view = build_performance_view(&holdings, &activities, today, &self.options);
        self.commit_view(portfolio_id, ticket, &view);
        Ok(view)
    }

    async fn year_window(&self, portfolio_id: i64, year: i32) -> Result<YearWindow> {
        validate_year(year)?;

        let activities = self
            .provider
            .get_activity_logs(ActivityScope::Portfolio(portfolio_id))
            .await?;
        let tz = self.options.timezone;

        Ok(YearWindow {
            year,
            available_years: activity_years(&activities, tz),
            grid: monthly_totals(&activities, year, tz),
            activities: filter_by_year(&activities, year, tz),
        })
    }

    async fn export_csv(&self, portfolio_id: i64) -> Result<String> {
        let view = self.load_view(portfolio_id).await?;
        export_performance_csv(&view)
    }

    fn cached_view(&self, portfolio_id: i64) -> Option<PerformanceView> {
        self.committed
            .get(&portfolio_id)
            .map(|entry| entry.value().1.clone())
    }
}

#[cfg(test)]
impl PerformanceService {
    pub(crate) fn commit_for_test(
        &self,
        portfolio_id: i64,
        ticket: u64,
        view: &PerformanceView,
    ) -> bool {
        self.commit_view(portfolio_id, ticket, view)
    }
}
