//! Drives a bulk IRR recalculation for one portfolio and refreshes the
//! performance view once the backend has settled.
//!
//! Per portfolio the state moves `Idle -> DateSelected -> Calculating ->
//! Settled -> Idle`. Only one calculation may be in flight per portfolio.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, error, info, warn};

use super::irr_model::{
    MissingValuationWarning, RecalculationOutcome, RecalculationState, Settlement,
};
use crate::constants::DEFAULT_IRR_REFRESH_DELAY_MS;
use crate::errors::{Error, Result};
use crate::portfolio::performance::{PerformanceServiceTrait, PerformanceView};
use crate::portfolio::PortfolioDataProvider;

#[derive(Debug, Clone)]
pub struct RecalculationOptions {
    /// Pause between the backend settling and the view refetch, so the
    /// backend's own follow-up writes land first.
    pub refresh_delay: Duration,
}

impl Default for RecalculationOptions {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_millis(DEFAULT_IRR_REFRESH_DELAY_MS),
        }
    }
}

pub struct RecalculationOrchestrator {
    provider: Arc<dyn PortfolioDataProvider>,
    performance: Arc<dyn PerformanceServiceTrait>,
    options: RecalculationOptions,
    states: Arc<DashMap<i64, RecalculationState>>,
}

/// Returns the portfolio to `Idle` if a calculation future is dropped
/// before it settles.
struct CalculatingGuard<'a> {
    states: &'a DashMap<i64, RecalculationState>,
    portfolio_id: i64,
    armed: bool,
}

impl CalculatingGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CalculatingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Entry::Occupied(mut current) = self.states.entry(self.portfolio_id) {
            if current.get().is_calculating() {
                warn!(
                    "IRR recalculation for portfolio {} was abandoned before settling",
                    self.portfolio_id
                );
                current.insert(RecalculationState::Idle);
            }
        }
    }
}

impl RecalculationOrchestrator {
    pub fn new(
        provider: Arc<dyn PortfolioDataProvider>,
        performance: Arc<dyn PerformanceServiceTrait>,
        options: RecalculationOptions,
    ) -> Self {
        Self {
            provider,
            performance,
            options,
            states: Arc::new(DashMap::new()),
        }
    }

    pub fn state(&self, portfolio_id: i64) -> RecalculationState {
        self.states
            .get(&portfolio_id)
            .map(|s| s.value().clone())
            .unwrap_or(RecalculationState::Idle)
    }

    /// Picks the as-of date for the next calculation. Re-selecting replaces
    /// the previous choice.
    pub fn select_date(
        &self,
        portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> Result<RecalculationState> {
        let next = RecalculationState::DateSelected { as_of_date };
        match self.states.entry(portfolio_id) {
            Entry::Occupied(mut current) => {
                if current.get().is_calculating() {
                    return Err(Error::RecalculationInProgress(portfolio_id));
                }
                current.insert(next.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(next.clone());
            }
        }
        debug!("Portfolio {} IRR date set to {}", portfolio_id, as_of_date);
        Ok(next)
    }

    /// Clears a selected date. Not allowed while calculating.
    pub fn reset(&self, portfolio_id: i64) -> Result<()> {
        if let Some(current) = self.states.get(&portfolio_id) {
            if current.is_calculating() {
                return Err(Error::RecalculationInProgress(portfolio_id));
            }
        }
        self.states.insert(portfolio_id, RecalculationState::Idle);
        Ok(())
    }

    /// Selects `as_of_date` and runs the calculation in one step.
    pub async fn recalculate_as_of(
        &self,
        portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> Result<RecalculationOutcome> {
        self.select_date(portfolio_id, as_of_date)?;
        self.recalculate(portfolio_id).await
    }

    /// Runs the calculation for the selected date.
    ///
    /// A backend failure does not return `Err`: it settles as
    /// [`Settlement::Failed`] with a user-facing message and is not retried.
    /// `Err` is reserved for requests the state machine rejects.
    pub async fn recalculate(&self, portfolio_id: i64) -> Result<RecalculationOutcome> {
        let as_of_date = self.begin(portfolio_id)?;
        let mut guard = CalculatingGuard {
            states: &self.states,
            portfolio_id,
            armed: true,
        };

        info!("Recalculating IRR for portfolio {} as of {}", portfolio_id, as_of_date);

        let (settlement, warning) = match self
            .provider
            .recalculate_portfolio_irr(portfolio_id, as_of_date)
            .await
        {
            Ok(result) => {
                let summary = result.summary();
                info!("Portfolio {}: {}", portfolio_id, summary);
                for failure in result.failures() {
                    warn!(
                        "IRR failed for holding {}: {}",
                        failure.holding_id,
                        failure.message.as_deref().unwrap_or("no message")
                    );
                }
                let warning = MissingValuationWarning::from_result(&result);
                (Settlement::Success { result, summary }, warning)
            }
            Err(e) => {
                error!("IRR recalculation failed for portfolio {}: {}", portfolio_id, e);
                (
                    Settlement::Failed {
                        message: e.user_message(),
                    },
                    None,
                )
            }
        };

        self.states.insert(
            portfolio_id,
            RecalculationState::Settled {
                settlement: settlement.clone(),
            },
        );
        let refresh = tokio::spawn(refresh_after_settle(
            self.performance.clone(),
            self.states.clone(),
            portfolio_id,
            self.options.refresh_delay,
        ));
        guard.disarm();

        let view = match refresh.await {
            Ok(view) => view,
            Err(e) => {
                error!("IRR refresh task for portfolio {} failed: {}", portfolio_id, e);
                finish_settled(&self.states, portfolio_id);
                None
            }
        };

        Ok(RecalculationOutcome {
            portfolio_id,
            as_of_date,
            settlement,
            warning,
            view,
        })
    }

    /// Moves `DateSelected` to `Calculating` atomically.
    fn begin(&self, portfolio_id: i64) -> Result<NaiveDate> {
        let Entry::Occupied(mut current) = self.states.entry(portfolio_id) else {
            return Err(no_date_selected(portfolio_id));
        };
        match current.get() {
            RecalculationState::DateSelected { as_of_date } => {
                let as_of_date = *as_of_date;
                current.insert(RecalculationState::Calculating { as_of_date });
                Ok(as_of_date)
            }
            RecalculationState::Calculating { .. } => {
                Err(Error::RecalculationInProgress(portfolio_id))
            }
            RecalculationState::Idle | RecalculationState::Settled { .. } => {
                Err(no_date_selected(portfolio_id))
            }
        }
    }
}

/// Waits out the refresh delay, reloads the view and returns the portfolio
/// to `Idle`. Runs as its own task, so both happen even if the caller that
/// started the calculation is dropped.
async fn refresh_after_settle(
    performance: Arc<dyn PerformanceServiceTrait>,
    states: Arc<DashMap<i64, RecalculationState>>,
    portfolio_id: i64,
    delay: Duration,
) -> Option<PerformanceView> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let view = match performance.load_view(portfolio_id).await {
        // A refresh that started later may already have committed.
        Ok(view) => Some(performance.cached_view(portfolio_id).unwrap_or(view)),
        Err(e) => {
            warn!(
                "Failed to refresh portfolio {} after IRR recalculation: {}",
                portfolio_id, e
            );
            None
        }
    };

    finish_settled(&states, portfolio_id);
    view
}

/// Returns a settled portfolio to `Idle` unless a new date was picked
/// during the refresh.
fn finish_settled(states: &DashMap<i64, RecalculationState>, portfolio_id: i64) {
    if let Entry::Occupied(mut current) = states.entry(portfolio_id) {
        if matches!(current.get(), RecalculationState::Settled { .. }) {
            current.insert(RecalculationState::Idle);
        }
    }
}

fn no_date_selected(portfolio_id: i64) -> Error {
    Error::InvalidState(format!("No IRR date selected for portfolio {portfolio_id}"))
}
