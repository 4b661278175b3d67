//! End-to-end tests of selection, history validation and replay against an
//! in-memory data source.

mod common;

use common::*;
use insider_screen::cli::{history_pipeline, replay_pipeline, select_pipeline};
use insider_screen::domain::error::{HistoryError, ScreenError};
use insider_screen::domain::history::{request_history, validate_history};
use insider_screen::domain::replay::run_replay;
use insider_screen::domain::selection::SelectionCriteria;
use std::collections::BTreeSet;

fn set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

mod selection {
    use super::*;

    #[test]
    fn one_date_scenario() {
        let port = february_source();
        let selected =
            select_pipeline(&port, &SelectionCriteria::default(), date(2022, 2, 14)).unwrap();
        assert_eq!(selected, set(&["AAA"]));
    }

    #[test]
    fn date_without_data_selects_nothing() {
        let port = february_source();
        let selected =
            select_pipeline(&port, &SelectionCriteria::default(), date(2022, 2, 12)).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn data_source_failure_propagates() {
        let d = date(2022, 2, 14);
        let port = MockUniverseDataPort::new().with_error(d, "disk on fire");
        let err = select_pipeline(&port, &SelectionCriteria::default(), d).unwrap_err();
        assert!(matches!(err, ScreenError::DataSource { reason } if reason == "disk on fire"));
    }
}

mod history {
    use super::*;

    #[test]
    fn ten_trading_days_before_start() {
        let port = february_source();
        let settings = sample_settings();

        let rows = history_pipeline(&port, &settings).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].date, date(2022, 1, 31));
        assert_eq!(rows[9].date, date(2022, 2, 11));
        assert!(rows.iter().all(|r| r.record_count == 2 && r.selected_count == 1));
    }

    #[test]
    fn short_history_is_fatal() {
        let mut port = MockUniverseDataPort::new();
        for d in trading_days(date(2022, 2, 7), 10) {
            port = port.with_records(d, vec![make_tx("AAA", d, "0.01", "200000000")]);
        }
        let err = history_pipeline(&port, &sample_settings()).unwrap_err();
        assert!(matches!(
            err,
            ScreenError::History(HistoryError::UnexpectedCount {
                expected: 10,
                actual: 5
            })
        ));
    }

    #[test]
    fn empty_historical_batch_is_fatal() {
        let empty_day = date(2022, 2, 2);
        let port = february_source().with_records(empty_day, Vec::new());
        let err = history_pipeline(&port, &sample_settings()).unwrap_err();
        assert!(matches!(
            err,
            ScreenError::History(HistoryError::EmptyBatch { date }) if date == empty_day
        ));
    }

    #[test]
    fn expected_count_is_a_parameter() {
        let port = february_source();
        let mut settings = sample_settings();
        settings.history.days = 3;

        let rows = history_pipeline(&port, &settings).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2022, 2, 9), date(2022, 2, 10), date(2022, 2, 11)]);
    }

    #[test]
    fn require_selection_rejects_days_with_no_survivors() {
        let quiet_day = date(2022, 2, 3);
        let port = february_source()
            .with_records(quiet_day, vec![make_tx("TINY", quiet_day, "0.2", "5000000")]);
        let mut settings = sample_settings();

        assert!(history_pipeline(&port, &settings).is_ok());

        settings.history.require_selection = true;
        let err = history_pipeline(&port, &settings).unwrap_err();
        assert!(matches!(
            err,
            ScreenError::History(HistoryError::EmptySelection { date }) if date == quiet_day
        ));
    }

    #[test]
    fn history_excludes_start_date_itself() {
        let port = february_source();
        let batches = request_history(&port, date(2022, 2, 14), 10).unwrap();
        assert!(batches.iter().all(|b| b.date < date(2022, 2, 14)));
        assert!(validate_history(&batches, 10, &SelectionCriteria::default(), true).is_ok());
    }
}

mod replay {
    use super::*;

    fn rotating_source() -> MockUniverseDataPort {
        let d1 = date(2022, 2, 14);
        let d2 = date(2022, 2, 15);
        let d3 = date(2022, 2, 16);
        MockUniverseDataPort::new()
            .with_records(
                d1,
                vec![
                    make_tx("AAA", d1, "0.01", "200000000"),
                    make_tx("BBB", d1, "0.02", "900000000"),
                ],
            )
            .with_records(
                d2,
                vec![
                    make_tx("AAA", d2, "0.01", "200000000"),
                    make_tx("BBB", d2, "0.004", "900000000"),
                    make_tx("CCC", d2, "0.03", "150000000"),
                ],
            )
            .with_records(d3, vec![make_tx("AAA", d3, "0.01", "200000000")])
    }

    #[test]
    fn steps_track_selection_changes() {
        let port = rotating_source();
        let settings = sample_settings();
        let result = run_replay(&port, &settings.criteria, &settings.replay).unwrap();

        assert_eq!(result.steps.len(), 3);

        let first = &result.steps[0];
        assert_eq!(first.selected, set(&["AAA", "BBB"]));
        assert_eq!(first.changes.added, vec!["AAA", "BBB"]);
        assert!(first.changes.removed.is_empty());

        let second = &result.steps[1];
        assert_eq!(second.record_count, 3);
        assert_eq!(second.selected, set(&["AAA", "CCC"]));
        assert_eq!(second.changes.added, vec!["CCC"]);
        assert_eq!(second.changes.removed, vec!["BBB"]);

        let third = &result.steps[2];
        assert_eq!(third.changes.removed, vec!["CCC"]);

        assert_eq!(result.final_selection(), set(&["AAA"]));
        assert_eq!(result.change_count(), 3);
    }

    #[test]
    fn unchanged_days_produce_empty_changes() {
        let port = february_source();
        let settings = sample_settings();
        let result = run_replay(&port, &settings.criteria, &settings.replay).unwrap();

        assert_eq!(result.steps.len(), 5);
        assert!(!result.steps[0].changes.is_empty());
        assert!(result.steps[1..].iter().all(|s| s.changes.is_empty()));
        assert_eq!(result.change_count(), 1);
    }

    #[test]
    fn window_without_data_is_no_data() {
        let port = MockUniverseDataPort::new()
            .with_records(date(2021, 1, 4), vec![make_tx("AAA", date(2021, 1, 4), "0.01", "200000000")]);
        let settings = sample_settings();
        let err = run_replay(&port, &settings.criteria, &settings.replay).unwrap_err();
        assert!(matches!(err, ScreenError::NoData { .. }));
    }

    #[test]
    fn replay_pipeline_checks_history_first() {
        let port = rotating_source();
        let settings = sample_settings();

        let err = replay_pipeline(&port, &settings, false).unwrap_err();
        assert!(matches!(err, ScreenError::History(_)));

        let result = replay_pipeline(&port, &settings, true).unwrap();
        assert_eq!(result.steps.len(), 3);
    }

    #[test]
    fn replay_pipeline_full_run() {
        let port = february_source();
        let result = replay_pipeline(&port, &sample_settings(), false).unwrap();
        assert_eq!(result.steps.len(), 5);
        assert_eq!(result.final_selection(), set(&["AAA"]));
    }

    #[test]
    fn replay_is_repeatable() {
        let port = rotating_source();
        let settings = sample_settings();
        let a = run_replay(&port, &settings.criteria, &settings.replay).unwrap();
        let b = run_replay(&port, &settings.criteria, &settings.replay).unwrap();
        assert_eq!(a.steps, b.steps);
    }
}
