#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::activities::ActivityType;
    use crate::errors::{Error, ValidationError};
    use crate::portfolio::holdings::Fund;
    use crate::portfolio::irr::LatestIrr;
    use crate::portfolio::performance::{
        PerformanceRow, PerformanceService, PerformanceServiceTrait, PerformanceViewOptions,
    };
    use crate::test_support::{activity, holding, MockProvider};

    fn service(provider: MockProvider) -> (Arc<MockProvider>, PerformanceService) {
        let provider = Arc::new(provider);
        let service = PerformanceService::new(provider.clone(), PerformanceViewOptions::default());
        (provider, service)
    }

    fn inactive(
        id: i64,
        fund_name: &str,
        irr: rust_decimal::Decimal,
    ) -> crate::portfolio::holdings::Holding {
        let mut h = holding(id, 7, fund_name);
        h.status = Some("inactive".to_string());
        h.irr = Some(irr);
        h
    }

    #[tokio::test]
    async fn test_load_view_consolidates_inactive_holdings() {
        let mut alpha = holding(1, 7, "Alpha Growth");
        alpha.irr = Some(dec!(5.0));
        alpha.market_value = dec!(1200);
        let provider = MockProvider::new()
            .with_holdings(vec![
                alpha,
                inactive(2, "Old Bond", dec!(2.0)),
                inactive(3, "Old Equity", dec!(3.0)),
            ])
            .with_activities(vec![
                activity(1, 1, ActivityType::Investment, dec!(1000), (2023, 3, 1)),
                activity(2, 2, ActivityType::Investment, dec!(500), (2021, 1, 1)),
                activity(3, 3, ActivityType::Withdrawal, dec!(-250), (2022, 6, 1)),
            ]);
        let (provider, service) = service(provider);

        let view = service.load_view(7).await.unwrap();

        assert_eq!(view.active_count, 1);
        assert_eq!(view.inactive_count, 2);
        assert_eq!(view.fund_names(), vec!["Alpha Growth", "Previous Funds"]);

        let previous = view.previous_funds().unwrap();
        assert_eq!(previous.irr, Some(dec!(-195.0)));
        assert_eq!(previous.cash_flows.investment, dec!(500));
        assert_eq!(previous.cash_flows.withdrawal, dec!(250));

        assert_eq!(view.totals.cash_flows.investment, dec!(1500));
        assert_eq!(provider.holdings_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_view_enriches_names_from_catalog() {
        let mut unnamed = holding(1, 7, "");
        unnamed.fund_name = None;
        unnamed.fund_id = Some(42);
        let provider = MockProvider::new().with_holdings(vec![unnamed]);
        *provider.catalog.lock().unwrap() = vec![Fund {
            id: 42,
            fund_name: "Global Index".to_string(),
            isin_number: Some("GB00B0000001".to_string()),
        }];
        let (_, service) = service(provider);

        let view = service.load_view(7).await.unwrap();
        match &view.rows[0] {
            PerformanceRow::Fund(row) => {
                assert_eq!(row.fund_name, "Global Index");
                assert_eq!(row.isin.as_deref(), Some("GB00B0000001"));
            }
            other => panic!("expected a fund row, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_catalog_failure_does_not_fail_view() {
        let provider = MockProvider::new().with_holdings(vec![holding(1, 7, "Alpha")]);
        *provider.fail_catalog.lock().unwrap() = true;
        let (_, service) = service(provider);

        let view = service.load_view(7).await.unwrap();
        assert_eq!(view.fund_names(), vec!["Alpha"]);
    }

    #[tokio::test]
    async fn test_missing_irrs_filled_from_latest() {
        let mut known = holding(1, 7, "Alpha");
        known.irr = Some(dec!(1.5));
        let provider = MockProvider::new().with_holdings(vec![
            known,
            holding(2, 7, "Beta"),
            holding(3, 7, "Gamma"),
        ]);
        provider.latest_irrs.lock().unwrap().insert(
            2,
            LatestIrr {
                irr: dec!(7.25),
                irr_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            },
        );
        provider.failing_latest_irr.lock().unwrap().push(3);
        let (provider, service) = service(provider);

        let view = service.load_view(7).await.unwrap();

        let irr_of = |name: &str| {
            view.rows
                .iter()
                .find(|r| r.fund_name() == name)
                .and_then(|r| r.irr())
        };
        assert_eq!(irr_of("Alpha"), Some(dec!(1.5)));
        assert_eq!(irr_of("Beta"), Some(dec!(7.25)));
        assert_eq!(irr_of("Gamma"), None);
        // Only holdings without an IRR are looked up.
        assert_eq!(
            provider
                .latest_irr_calls
                .load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }

    #[tokio::test]
    async fn test_holdings_failure_propagates() {
        let provider = MockProvider::new();
        *provider.fail_holdings.lock().unwrap() = true;
        let (_, service) = service(provider);

        let err = service.load_view(7).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(service.cached_view(7).is_none());
    }

    #[tokio::test]
    async fn test_superseded_refresh_is_not_committed() {
        let provider = MockProvider::new().with_holdings(vec![holding(1, 7, "Alpha")]);
        let (provider, service) = service(provider);

        let older = service.load_view(7).await.unwrap();
        *provider.holdings.lock().unwrap() = vec![holding(1, 7, "Alpha"), holding(2, 7, "Beta")];
        let newer = service.load_view(7).await.unwrap();
        assert_eq!(service.cached_view(7), Some(newer.clone()));

        // A response for ticket 1 arriving after ticket 2 committed is dropped.
        assert!(!service.commit_for_test(7, 1, &older));
        assert_eq!(service.cached_view(7), Some(newer));
    }

    #[tokio::test]
    async fn test_year_window_filters_and_lists_years() {
        let provider = MockProvider::new().with_activities(vec![
            activity(1, 1, ActivityType::Investment, dec!(100), (2022, 5, 1)),
            activity(2, 1, ActivityType::Investment, dec!(200), (2023, 1, 15)),
            activity(3, 1, ActivityType::Withdrawal, dec!(50), (2023, 11, 2)),
        ]);
        let (_, service) = service(provider);

        let window = service.year_window(7, 2023).await.unwrap();
        assert_eq!(window.year, 2023);
        assert_eq!(window.available_years, vec![2023, 2022]);
        assert_eq!(window.activities.len(), 2);

        let row = window.grid.row(1, &ActivityType::Investment).unwrap();
        assert_eq!(row.months[0], dec!(200));
        assert_eq!(row.total, dec!(200));
    }

    #[tokio::test]
    async fn test_year_window_rejects_out_of_range_year() {
        let (_, service) = service(MockProvider::new());
        let err = service.year_window(7, 10_000).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_export_csv_uses_fresh_view() {
        let provider = MockProvider::new().with_holdings(vec![holding(1, 7, "Alpha")]);
        let (provider, service) = service(provider);

        let csv = service.export_csv(7).await.unwrap();
        assert!(csv.starts_with("\"Fund Name\""));
        assert!(csv.contains("\"Alpha\""));
        assert_eq!(provider.holdings_calls(), 1);
    }
}
