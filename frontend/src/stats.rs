//! Aggregates shown on the dashboard cards and summary section.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::Expense;

pub fn total_cost(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.total_cost).sum()
}

/// Distinct expense type names in the order they first appear.
pub fn expense_type_names(expenses: &[Expense]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for expense in expenses {
        if !names.iter().any(|n| n == &expense.expense_type_name) {
            names.push(expense.expense_type_name.clone());
        }
    }
    names
}

pub fn unit_for(expense_type: &str) -> &'static str {
    match expense_type {
        "Electricity" => "kWh",
        "Gas" | "Water" => "m³",
        "Fuel" => "L",
        _ => "units",
    }
}

/// Percent change from `previous` to `current`; 0 when there is no baseline.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Expenses of one type, most recently created first.
pub fn newest_first<'a>(expenses: &'a [Expense], expense_type: &str) -> Vec<&'a Expense> {
    let mut matching: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.expense_type_name == expense_type)
        .collect();
    matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    matching
}

fn latest_change(sorted: &[&Expense], value: impl Fn(&Expense) -> f64) -> f64 {
    match sorted {
        [current, previous, ..] => percent_change(value(current), value(previous)),
        _ => 0.0,
    }
}

pub fn last_update(expenses: &[Expense]) -> Option<NaiveDateTime> {
    expenses.iter().filter_map(Expense::created_at).max()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageStatus {
    Optimal,
    HighUsage,
}

impl UsageStatus {
    pub fn label(self) -> &'static str {
        match self {
            UsageStatus::Optimal => "Optimal",
            UsageStatus::HighUsage => "High Usage",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UsageSummary {
    pub current_usage: f64,
    pub average: f64,
    pub change: f64,
    pub unit: &'static str,
}

impl UsageSummary {
    pub fn status(&self) -> UsageStatus {
        if self.change <= 0.0 {
            UsageStatus::Optimal
        } else {
            UsageStatus::HighUsage
        }
    }
}

pub fn usage_summary(expenses: &[Expense], expense_type: &str) -> UsageSummary {
    let sorted = newest_first(expenses, expense_type);
    let unit = unit_for(expense_type);
    let Some(latest) = sorted.first() else {
        return UsageSummary {
            current_usage: 0.0,
            average: 0.0,
            change: 0.0,
            unit,
        };
    };

    let sum: f64 = sorted.iter().map(|e| e.quantity).sum();
    UsageSummary {
        current_usage: latest.quantity,
        average: sum / sorted.len() as f64,
        change: latest_change(&sorted, |e| e.quantity),
        unit,
    }
}

/// Figures for one expense-type card in the dashboard carousel.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeCard {
    pub total_cost: f64,
    pub quantity: f64,
    pub avg_cost: f64,
    pub change: f64,
    pub cost_change: f64,
    pub last_reading: Option<f64>,
    pub last_update: Option<NaiveDate>,
    pub unit: &'static str,
}

pub fn type_card(expenses: &[Expense], expense_type: &str) -> TypeCard {
    let sorted = newest_first(expenses, expense_type);
    let total_cost: f64 = sorted.iter().map(|e| e.total_cost).sum();
    let quantity: f64 = sorted.iter().map(|e| e.quantity).sum();
    let avg_cost = if quantity > 0.0 {
        total_cost / quantity
    } else {
        0.0
    };

    TypeCard {
        total_cost,
        quantity,
        avg_cost,
        change: latest_change(&sorted, |e| e.quantity),
        cost_change: latest_change(&sorted, |e| e.total_cost),
        last_reading: sorted.first().map(|e| e.quantity),
        last_update: sorted.first().and_then(|e| e.created_at()).map(|ts| ts.date()),
        unit: unit_for(expense_type),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn expense(kind: &str, quantity: f64, cost: f64, day: &str) -> Expense {
        Expense {
            user_expense_id: None,
            expense_type_name: kind.to_string(),
            quantity,
            rate_per_unit: if quantity > 0.0 { cost / quantity } else { 0.0 },
            total_cost: cost,
            expense_for_date: day.to_string(),
            created_date: Some(format!("{}T08:00:00", day)),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("Electricity", 100.0, 25.0, "2024-01-10"),
            expense("Gas", 40.0, 20.0, "2024-01-12"),
            expense("Electricity", 150.0, 37.5, "2024-02-10"),
            expense("Water", 10.0, 5.0, "2024-02-11"),
        ]
    }

    #[test]
    fn total_is_sum_of_total_cost() {
        assert_eq!(total_cost(&sample()), 87.5);
        assert_eq!(total_cost(&[]), 0.0);
    }

    #[test]
    fn type_names_keep_first_seen_order() {
        assert_eq!(expense_type_names(&sample()), vec!["Electricity", "Gas", "Water"]);
    }

    #[test]
    fn units_by_type() {
        assert_eq!(unit_for("Electricity"), "kWh");
        assert_eq!(unit_for("Water"), "m³");
        assert_eq!(unit_for("Fuel"), "L");
        assert_eq!(unit_for("Internet"), "units");
    }

    #[test]
    fn change_uses_two_most_recent_entries() {
        let summary = usage_summary(&sample(), "Electricity");
        assert_eq!(summary.current_usage, 150.0);
        assert_eq!(summary.average, 125.0);
        assert_eq!(summary.change, 50.0);
        assert_eq!(summary.status(), UsageStatus::HighUsage);
    }

    #[test]
    fn single_entry_has_no_change() {
        let summary = usage_summary(&sample(), "Gas");
        assert_eq!(summary.change, 0.0);
        assert_eq!(summary.status(), UsageStatus::Optimal);
    }

    #[test]
    fn unknown_type_is_all_zero() {
        let summary = usage_summary(&sample(), "Fuel");
        assert_eq!(summary.current_usage, 0.0);
        assert_eq!(summary.unit, "L");
        let card = type_card(&sample(), "Fuel");
        assert_eq!(card.avg_cost, 0.0);
        assert_eq!(card.last_reading, None);
    }

    #[test]
    fn zero_baseline_does_not_divide() {
        assert_eq!(percent_change(10.0, 0.0), 0.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn card_figures() {
        let card = type_card(&sample(), "Electricity");
        assert_eq!(card.total_cost, 62.5);
        assert_eq!(card.quantity, 250.0);
        assert_eq!(card.avg_cost, 0.25);
        assert_eq!(card.cost_change, 50.0);
        assert_eq!(card.last_reading, Some(150.0));
        assert_eq!(card.last_update, NaiveDate::from_ymd_opt(2024, 2, 10));
    }

    #[test]
    fn last_update_is_latest_created_date() {
        let latest = last_update(&sample()).unwrap();
        assert_eq!(latest.date(), NaiveDate::from_ymd_opt(2024, 2, 11).unwrap());
        assert!(last_update(&[]).is_none());
    }
}
