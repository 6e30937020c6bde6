//! Filtering, sorting and paging for the expense table.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::Expense;

pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilter {
    /// `None` shows every type.
    pub expense_type: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub search: String,
}

impl ExpenseFilter {
    pub fn is_active(&self) -> bool {
        self.expense_type.is_some()
            || self.start.is_some()
            || self.end.is_some()
            || !self.search.trim().is_empty()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(kind) = &self.expense_type {
            if &expense.expense_type_name != kind {
                return false;
            }
        }

        // a half-open range is ignored until both ends are picked
        if let (Some(start), Some(end)) = (self.start, self.end) {
            match expense.expense_day() {
                Some(day) if day >= start && day <= end => {}
                _ => return false,
            }
        }

        let query = self.search.trim().to_lowercase();
        if !query.is_empty() {
            return expense.expense_type_name.to_lowercase().contains(&query)
                || expense.quantity.to_string().contains(&query)
                || expense.total_cost.to_string().contains(&query);
        }

        true
    }

    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Quantity,
    TotalCost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Clicking the active ascending column flips it; anything else sorts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == Some(key) && self.direction == Some(SortDirection::Ascending)
        {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self {
            key: Some(key),
            direction: Some(direction),
        }
    }

    pub fn indicator(self, key: SortKey) -> &'static str {
        match (self.key == Some(key), self.direction) {
            (true, Some(SortDirection::Ascending)) => " ↑",
            (true, Some(SortDirection::Descending)) => " ↓",
            _ => "",
        }
    }

    pub fn apply(self, expenses: &mut [Expense]) {
        let (Some(key), Some(direction)) = (self.key, self.direction) else {
            return;
        };
        expenses.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

fn compare(a: &Expense, b: &Expense, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.expense_day().cmp(&b.expense_day()),
        SortKey::Quantity => a.quantity.total_cmp(&b.quantity),
        SortKey::TotalCost => a.total_cost.total_cmp(&b.total_cost),
    }
}

pub fn page_count(len: usize) -> usize {
    (len + PAGE_SIZE - 1) / PAGE_SIZE
}

/// Rows for a 1-based page number; out of range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// `(first, last)` row numbers for the "Showing x to y of z" caption.
pub fn showing_range(page: usize, len: usize) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let start = page.saturating_sub(1) * PAGE_SIZE;
    ((start + 1).min(len), (start + PAGE_SIZE).min(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::expense;

    fn sample() -> Vec<Expense> {
        vec![
            expense("Electricity", 100.0, 25.0, "2024-01-10"),
            expense("Gas", 40.0, 20.0, "2024-01-12"),
            expense("Electricity", 150.0, 37.5, "2024-02-10"),
            expense("Water", 12.5, 5.0, "2024-02-11"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = ExpenseFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn filters_by_type() {
        let filter = ExpenseFilter {
            expense_type: Some("Electricity".into()),
            ..Default::default()
        };
        let rows = filter.apply(&sample());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|e| e.expense_type_name == "Electricity"));
    }

    #[test]
    fn date_range_is_inclusive_and_needs_both_ends() {
        let mut filter = ExpenseFilter {
            start: NaiveDate::from_ymd_opt(2024, 1, 12),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sample()).len(), 4);

        filter.end = NaiveDate::from_ymd_opt(2024, 2, 10);
        let rows = filter.apply(&sample());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].expense_type_name, "Gas");
    }

    #[test]
    fn search_matches_type_quantity_and_cost() {
        let by_name = ExpenseFilter {
            search: "WAT".into(),
            ..Default::default()
        };
        assert_eq!(by_name.apply(&sample()).len(), 1);

        let by_quantity = ExpenseFilter {
            search: "12.5".into(),
            ..Default::default()
        };
        assert_eq!(by_quantity.apply(&sample())[0].expense_type_name, "Water");

        let by_cost = ExpenseFilter {
            search: "37.5".into(),
            ..Default::default()
        };
        assert_eq!(by_cost.apply(&sample())[0].quantity, 150.0);
    }

    #[test]
    fn sort_toggles_direction_on_same_key() {
        let state = SortState::default().toggle(SortKey::Quantity);
        assert_eq!(state.direction, Some(SortDirection::Ascending));
        let state = state.toggle(SortKey::Quantity);
        assert_eq!(state.direction, Some(SortDirection::Descending));
        let state = state.toggle(SortKey::Quantity);
        assert_eq!(state.direction, Some(SortDirection::Ascending));
        let state = state.toggle(SortKey::TotalCost);
        assert_eq!(state.key, Some(SortKey::TotalCost));
        assert_eq!(state.direction, Some(SortDirection::Ascending));
        assert_eq!(state.indicator(SortKey::TotalCost), " ↑");
        assert_eq!(state.indicator(SortKey::Quantity), "");
    }

    #[test]
    fn sorts_rows() {
        let mut rows = sample();
        SortState::default().toggle(SortKey::TotalCost).apply(&mut rows);
        let costs: Vec<f64> = rows.iter().map(|e| e.total_cost).collect();
        assert_eq!(costs, vec![5.0, 20.0, 25.0, 37.5]);

        SortState {
            key: Some(SortKey::Date),
            direction: Some(SortDirection::Descending),
        }
        .apply(&mut rows);
        assert_eq!(rows[0].expense_for_date, "2024-02-11");
    }

    #[test]
    fn pagination() {
        let items: Vec<usize> = (0..23).collect();
        assert_eq!(page_count(items.len()), 3);
        assert_eq!(page_count(0), 0);
        assert_eq!(page_slice(&items, 1).len(), 10);
        assert_eq!(page_slice(&items, 3), &[20, 21, 22]);
        assert!(page_slice(&items, 4).is_empty());
        assert_eq!(showing_range(3, 23), (21, 23));
        assert_eq!(showing_range(1, 0), (0, 0));
    }
}
