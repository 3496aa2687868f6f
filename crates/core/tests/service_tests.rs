// ═══════════════════════════════════════════════════════════════════
// Service Tests — LedgerService, AggregationService
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use shop_ledger_core::models::ledger::Ledger;
use shop_ledger_core::models::month::YearMonth;
use shop_ledger_core::models::record::{CostCategory, CostRecord, IncomeCategory, IncomeRecord};
use shop_ledger_core::services::aggregation_service::{AggregationService, MAX_GOAL_PROGRESS};
use shop_ledger_core::services::ledger_service::LedgerService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ym(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn income(id: &str, date: &str, amount: f64, category: IncomeCategory) -> IncomeRecord {
    IncomeRecord {
        id: id.into(),
        date: date.into(),
        amount,
        category,
        note: String::new(),
    }
}

fn cost(id: &str, date: &str, amount: f64) -> CostRecord {
    CostRecord {
        id: id.into(),
        date: date.into(),
        amount,
        category: CostCategory::Material,
        note: String::new(),
    }
}

/// February 2026 with a bit of January and March around it.
fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.income = vec![
        income("i1", "2026-02-01", 500.0, IncomeCategory::Market),
        income("i2", "2026-02-14", 250.0, IncomeCategory::Online),
        income("i3", "2026-02-28", 100.0, IncomeCategory::Other),
        income("i4", "2026-02-20", 50.0, IncomeCategory::Market),
        income("i5", "2026-01-31", 999.0, IncomeCategory::Market),
        income("i6", "2026-03-01", 1.0, IncomeCategory::Online),
        income("i7", "garbage", 300.0, IncomeCategory::Market),
    ];
    ledger.cost = vec![
        cost("c1", "2026-02-03", 120.0),
        cost("c2", "2026-02-27", 80.0),
        cost("c3", "2026-01-15", 40.0),
    ];
    ledger.goals.set(&ym("2026-02"), 1000.0);
    ledger
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService
// ═══════════════════════════════════════════════════════════════════

mod ledger_service {
    use super::*;

    #[test]
    fn add_income_appends_and_returns_id() {
        let service = LedgerService::new();
        let mut ledger = Ledger::new();
        let record = IncomeRecord::new(d(2026, 2, 1), 10.0, IncomeCategory::Market, "");
        let expected = record.id.clone();

        let id = service.add_income(&mut ledger, record);
        assert_eq!(id, expected);
        assert_eq!(ledger.income.len(), 1);
        assert_eq!(ledger.income[0].id, id);
    }

    #[test]
    fn add_replaces_empty_id() {
        let service = LedgerService::new();
        let mut ledger = Ledger::new();
        let id = service.add_cost(&mut ledger, cost("", "2026-02-01", 1.0));
        assert!(!id.is_empty());
        assert_eq!(ledger.cost[0].id, id);
    }

    #[test]
    fn add_replaces_colliding_id() {
        let service = LedgerService::new();
        let mut ledger = Ledger::new();
        service.add_income(&mut ledger, income("dup", "2026-02-01", 1.0, IncomeCategory::Other));
        let second = service.add_income(&mut ledger, income("dup", "2026-02-02", 2.0, IncomeCategory::Other));

        assert_ne!(second, "dup");
        assert_eq!(ledger.income.len(), 2);
        assert_ne!(ledger.income[0].id, ledger.income[1].id);
    }

    #[test]
    fn add_then_remove_restores_prior_state() {
        let service = LedgerService::new();
        let mut ledger = sample_ledger();
        let before = ledger.clone();

        let income_id = service.add_income(
            &mut ledger,
            IncomeRecord::new(d(2026, 2, 5), 42.0, IncomeCategory::Online, "x"),
        );
        let cost_id = service.add_cost(
            &mut ledger,
            CostRecord::new(d(2026, 2, 5), 7.0, CostCategory::Booth, ""),
        );
        assert_ne!(ledger, before);

        assert_eq!(service.remove_income(&mut ledger, &income_id), 1);
        assert_eq!(service.remove_cost(&mut ledger, &cost_id), 1);
        assert_eq!(ledger, before);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let service = LedgerService::new();
        let mut ledger = sample_ledger();
        let before = ledger.clone();
        assert_eq!(service.remove_income(&mut ledger, "nope"), 0);
        assert_eq!(service.remove_cost(&mut ledger, "nope"), 0);
        assert_eq!(ledger, before);
    }

    #[test]
    fn remove_drops_every_record_with_that_id() {
        let service = LedgerService::new();
        let mut ledger = Ledger::new();
        ledger.income = vec![
            income("same", "2026-02-01", 1.0, IncomeCategory::Other),
            income("keep", "2026-02-01", 1.0, IncomeCategory::Other),
            income("same", "2026-02-02", 1.0, IncomeCategory::Other),
        ];
        assert_eq!(service.remove_income(&mut ledger, "same"), 2);
        assert_eq!(ledger.income.len(), 1);
        assert_eq!(ledger.income[0].id, "keep");
    }

    #[test]
    fn set_goal_clamps() {
        let service = LedgerService::new();
        let mut ledger = Ledger::new();
        assert_eq!(service.set_goal(&mut ledger, &ym("2026-02"), 1500.75), 1500);
        assert_eq!(service.set_goal(&mut ledger, &ym("2026-03"), -20.0), 0);
        assert_eq!(ledger.goals.get(&ym("2026-02")), 1500);
        assert_eq!(ledger.goals.get(&ym("2026-03")), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AggregationService — month summaries
// ═══════════════════════════════════════════════════════════════════

mod month_summary {
    use super::*;

    #[test]
    fn totals_for_month() {
        let s = AggregationService::new().month_summary(&sample_ledger(), &ym("2026-02"));
        assert_eq!(s.month, ym("2026-02"));
        assert_eq!(s.total_income, 900.0);
        assert_eq!(s.total_cost, 200.0);
        assert_eq!(s.profit, 700.0);
    }

    #[test]
    fn income_by_category() {
        let s = AggregationService::new().month_summary(&sample_ledger(), &ym("2026-02"));
        assert_eq!(s.income_by_category.market, 550.0);
        assert_eq!(s.income_by_category.online, 250.0);
        assert_eq!(s.income_by_category.other, 100.0);
        assert_eq!(s.income_by_category.total(), s.total_income);
    }

    #[test]
    fn profit_is_income_minus_cost_for_every_month() {
        let service = AggregationService::new();
        let ledger = sample_ledger();
        for month in ["2025-12", "2026-01", "2026-02", "2026-03", "2026-04"] {
            let s = service.month_summary(&ledger, &ym(month));
            assert_eq!(s.profit, s.total_income - s.total_cost, "month {month}");
        }
    }

    #[test]
    fn profit_can_be_negative() {
        let s = AggregationService::new().month_summary(&sample_ledger(), &ym("2026-01"));
        assert_eq!(s.total_income, 999.0);
        assert_eq!(s.total_cost, 40.0);

        let mut ledger = Ledger::new();
        ledger.cost.push(cost("c", "2026-05-01", 30.0));
        let s = AggregationService::new().month_summary(&ledger, &ym("2026-05"));
        assert_eq!(s.profit, -30.0);
    }

    #[test]
    fn month_boundary_days_land_in_different_buckets() {
        let mut ledger = Ledger::new();
        ledger.income = vec![
            income("a", "2026-01-31", 10.0, IncomeCategory::Market),
            income("b", "2026-02-01", 20.0, IncomeCategory::Market),
        ];
        let service = AggregationService::new();
        assert_eq!(service.month_summary(&ledger, &ym("2026-01")).total_income, 10.0);
        assert_eq!(service.month_summary(&ledger, &ym("2026-02")).total_income, 20.0);
    }

    #[test]
    fn malformed_dates_match_no_month() {
        let mut ledger = Ledger::new();
        ledger.income.push(income("x", "garbage", 300.0, IncomeCategory::Market));
        ledger.income.push(income("y", "", 300.0, IncomeCategory::Market));
        let s = AggregationService::new().month_summary(&ledger, &ym("2026-02"));
        assert_eq!(s.total_income, 0.0);
    }

    #[test]
    fn non_numeric_amount_contributes_zero() {
        let record: IncomeRecord = serde_json::from_str(
            r#"{"id":"n","date":"2026-02-10","amount":"abc","type":"market","note":""}"#,
        )
        .unwrap();
        let mut ledger = Ledger::new();
        ledger.income.push(record);
        ledger.income.push(income("ok", "2026-02-11", 5.0, IncomeCategory::Market));

        let s = AggregationService::new().month_summary(&ledger, &ym("2026-02"));
        assert_eq!(s.total_income, 5.0);
        assert!(!s.total_income.is_nan());
        assert!(!s.profit.is_nan());
    }

    #[test]
    fn unknown_category_buckets_into_other() {
        let record: IncomeRecord = serde_json::from_str(
            r#"{"id":"w","date":"2026-02-10","amount":70,"type":"wholesale"}"#,
        )
        .unwrap();
        let mut ledger = Ledger::new();
        ledger.income.push(record);
        let s = AggregationService::new().month_summary(&ledger, &ym("2026-02"));
        assert_eq!(s.income_by_category.other, 70.0);
    }

    #[test]
    fn empty_ledger_gives_zero_summary() {
        let s = AggregationService::new().month_summary(&Ledger::new(), &ym("2026-02"));
        assert_eq!(s.total_income, 0.0);
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.profit, 0.0);
    }

    #[test]
    fn does_not_mutate_ledger() {
        let ledger = sample_ledger();
        let before = ledger.clone();
        let service = AggregationService::new();
        service.month_summary(&ledger, &ym("2026-02"));
        service.rolling_summaries(&ledger, ym("2026-02"), 6);
        service.goal_progress(&ledger, &ym("2026-02"));
        assert_eq!(ledger, before);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AggregationService — rolling windows
// ═══════════════════════════════════════════════════════════════════

mod rolling {
    use super::*;

    #[test]
    fn six_months_across_year_boundary() {
        let months: Vec<String> = AggregationService::new()
            .rolling_months(ym("2026-02"), 6)
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(
            months,
            vec!["2025-09", "2025-10", "2025-11", "2025-12", "2026-01", "2026-02"]
        );
    }

    #[test]
    fn single_month() {
        assert_eq!(
            AggregationService::new().rolling_months(ym("2026-01"), 1),
            vec![ym("2026-01")]
        );
    }

    #[test]
    fn two_months_from_january() {
        assert_eq!(
            AggregationService::new().rolling_months(ym("2026-01"), 2),
            vec![ym("2025-12"), ym("2026-01")]
        );
    }

    #[test]
    fn zero_months_is_empty() {
        assert!(AggregationService::new().rolling_months(ym("2026-01"), 0).is_empty());
    }

    #[test]
    fn length_order_and_last_element() {
        let service = AggregationService::new();
        for n in 1..=40 {
            let months = service.rolling_months(ym("2026-02"), n);
            assert_eq!(months.len(), n);
            assert!(months.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(*months.last().unwrap(), ym("2026-02"));
        }
    }

    #[test]
    fn window_stops_at_year_zero() {
        let months = AggregationService::new().rolling_months(ym("0000-02"), 4);
        assert_eq!(months, vec![ym("0000-01"), ym("0000-02")]);
    }

    #[test]
    fn rolling_summaries_line_up_with_months() {
        let service = AggregationService::new();
        let ledger = sample_ledger();
        let series = service.rolling_summaries(&ledger, ym("2026-03"), 3);
        let months: Vec<YearMonth> = series.iter().map(|s| s.month).collect();
        assert_eq!(months, vec![ym("2026-01"), ym("2026-02"), ym("2026-03")]);
        assert_eq!(series[0].total_income, 999.0);
        assert_eq!(series[1].total_income, 900.0);
        assert_eq!(series[2].total_income, 1.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AggregationService — goal progress
// ═══════════════════════════════════════════════════════════════════

mod goal_progress {
    use super::*;

    fn ledger_with(income_amount: f64, goal: f64) -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .income
            .push(income("i", "2026-02-10", income_amount, IncomeCategory::Market));
        ledger.goals.set(&ym("2026-02"), goal);
        ledger
    }

    #[test]
    fn no_goal_is_zero_regardless_of_income() {
        let mut ledger = Ledger::new();
        ledger.income.push(income("i", "2026-02-10", 5000.0, IncomeCategory::Market));
        assert_eq!(AggregationService::new().goal_progress(&ledger, &ym("2026-02")), 0);
    }

    #[test]
    fn zero_goal_is_zero() {
        assert_eq!(AggregationService::new().goal_progress(&ledger_with(500.0, 0.0), &ym("2026-02")), 0);
    }

    #[test]
    fn half_way() {
        assert_eq!(AggregationService::new().goal_progress(&ledger_with(500.0, 1000.0), &ym("2026-02")), 50);
    }

    #[test]
    fn rounds_to_nearest() {
        let service = AggregationService::new();
        assert_eq!(service.goal_progress(&ledger_with(1.0, 3.0), &ym("2026-02")), 33);
        assert_eq!(service.goal_progress(&ledger_with(2.0, 3.0), &ym("2026-02")), 67);
        assert_eq!(service.goal_progress(&ledger_with(1.0, 8.0), &ym("2026-02")), 13);
    }

    #[test]
    fn capped_at_maximum() {
        let p = AggregationService::new().goal_progress(&ledger_with(20_000.0, 100.0), &ym("2026-02"));
        assert_eq!(p, MAX_GOAL_PROGRESS);
        assert_eq!(p, 999);
    }

    #[test]
    fn other_months_goal_is_ignored() {
        let ledger = ledger_with(500.0, 1000.0);
        assert_eq!(AggregationService::new().goal_progress(&ledger, &ym("2026-03")), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AggregationService — display lists
// ═══════════════════════════════════════════════════════════════════

mod entries_for_month {
    use super::*;

    #[test]
    fn filtered_and_newest_first() {
        let ledger = sample_ledger();
        let ids: Vec<&str> = AggregationService::new()
            .entries_for_month(&ledger.income, &ym("2026-02"))
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["i3", "i4", "i2", "i1"]);
    }

    #[test]
    fn works_for_costs() {
        let ledger = sample_ledger();
        let entries = AggregationService::new().entries_for_month(&ledger.cost, &ym("2026-01"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "c3");
    }

    #[test]
    fn empty_month() {
        let ledger = sample_ledger();
        assert!(AggregationService::new()
            .entries_for_month(&ledger.income, &ym("2024-01"))
            .is_empty());
    }
}
