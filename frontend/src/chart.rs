//! Data preparation and SVG geometry for the consumption and cost charts.

use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, PI};

use chrono::{Days, Months, NaiveDate};

use crate::format::format_day;
use crate::models::Expense;
use crate::stats::expense_type_names;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeriesColor {
    pub main: &'static str,
    pub light: &'static str,
}

const PALETTE: [SeriesColor; 15] = [
    SeriesColor { main: "rgb(45, 94, 255)", light: "rgba(45, 94, 255, 0.7)" },
    SeriesColor { main: "rgb(255, 77, 109)", light: "rgba(255, 77, 109, 0.7)" },
    SeriesColor { main: "rgb(0, 210, 122)", light: "rgba(0, 210, 122, 0.7)" },
    SeriesColor { main: "rgb(192, 70, 255)", light: "rgba(192, 70, 255, 0.7)" },
    SeriesColor { main: "rgb(255, 168, 0)", light: "rgba(255, 168, 0, 0.7)" },
    SeriesColor { main: "rgb(255, 64, 212)", light: "rgba(255, 64, 212, 0.7)" },
    SeriesColor { main: "rgb(0, 208, 206)", light: "rgba(0, 208, 206, 0.7)" },
    SeriesColor { main: "rgb(255, 126, 34)", light: "rgba(255, 126, 34, 0.7)" },
    SeriesColor { main: "rgb(99, 122, 255)", light: "rgba(99, 122, 255, 0.7)" },
    SeriesColor { main: "rgb(255, 45, 85)", light: "rgba(255, 45, 85, 0.7)" },
    SeriesColor { main: "rgb(141, 255, 96)", light: "rgba(141, 255, 96, 0.7)" },
    SeriesColor { main: "rgb(126, 87, 255)", light: "rgba(126, 87, 255, 0.7)" },
    SeriesColor { main: "rgb(255, 220, 0)", light: "rgba(255, 220, 0, 0.7)" },
    SeriesColor { main: "rgb(255, 0, 153)", light: "rgba(255, 0, 153, 0.7)" },
    SeriesColor { main: "rgb(0, 255, 179)", light: "rgba(0, 255, 179, 0.7)" },
];

pub fn color_for(index: usize) -> SeriesColor {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    SixMonths,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::SixMonths,
        TimeRange::Year,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Week => "7days",
            TimeRange::Month => "month",
            TimeRange::SixMonths => "6months",
            TimeRange::Year => "year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "Today",
            TimeRange::Week => "Last 7 days",
            TimeRange::Month => "Last 30 days",
            TimeRange::SixMonths => "Last 6 months",
            TimeRange::Year => "Last year",
        }
    }

    /// Unknown keys fall back to the 30 day window.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|range| range.key() == key)
            .unwrap_or(TimeRange::Month)
    }

    /// Inclusive day window ending today for the trend chart.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            TimeRange::Day => Some(today),
            TimeRange::Week => today.checked_sub_days(Days::new(6)),
            TimeRange::Month => today.checked_sub_days(Days::new(29)),
            TimeRange::SixMonths => today.checked_sub_months(Months::new(6)),
            TimeRange::Year => today.checked_sub_months(Months::new(12)),
        };
        (start.unwrap_or(today), today)
    }

    /// Earliest day kept by the cost distribution pie.
    pub fn cutoff(self, today: NaiveDate) -> NaiveDate {
        let cutoff = match self {
            TimeRange::Day => today.checked_sub_days(Days::new(1)),
            TimeRange::Week => today.checked_sub_days(Days::new(7)),
            TimeRange::Month => today.checked_sub_months(Months::new(1)),
            TimeRange::SixMonths => today.checked_sub_months(Months::new(6)),
            TimeRange::Year => today.checked_sub_months(Months::new(12)),
        };
        cutoff.unwrap_or(today)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Area,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Area, ChartKind::Bar];

    pub fn key(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Bar => "bar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Area => "Area",
            ChartKind::Bar => "Bar",
        }
    }

    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .unwrap_or(ChartKind::Line)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub color: SeriesColor,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConsumptionSeries {
    pub dates: Vec<NaiveDate>,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ConsumptionSeries {
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Summed quantity per distinct day and type inside the range.
/// `selected` narrows the datasets to a single type.
pub fn consumption_series(
    expenses: &[Expense],
    selected: Option<&str>,
    range: TimeRange,
    today: NaiveDate,
) -> ConsumptionSeries {
    let (start, end) = range.bounds(today);
    let in_range: Vec<(NaiveDate, &Expense)> = expenses
        .iter()
        .filter_map(|e| e.expense_day().map(|day| (day, e)))
        .filter(|(day, _)| *day >= start && *day <= end)
        .collect();

    let dates: Vec<NaiveDate> = in_range
        .iter()
        .map(|(day, _)| *day)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let datasets = expense_type_names(expenses)
        .into_iter()
        .filter(|name| selected.map(|s| s == name.as_str()).unwrap_or(true))
        .enumerate()
        .map(|(index, name)| {
            let values = dates
                .iter()
                .map(|date| {
                    in_range
                        .iter()
                        .filter(|(day, e)| day == date && e.expense_type_name == name)
                        .map(|(_, e)| e.quantity)
                        .sum::<f64>()
                })
                .collect();
            Dataset {
                label: name,
                values,
                color: color_for(index),
            }
        })
        .collect();

    ConsumptionSeries {
        labels: dates.iter().copied().map(format_day).collect(),
        dates,
        datasets,
    }
}

pub fn chart_title(selected: Option<&str>) -> String {
    match selected {
        Some(kind) => format!("{} Consumption Over Time", kind),
        None => "All Types Consumption Over Time".to_string(),
    }
}

pub fn chart_width(date_count: usize) -> usize {
    (date_count * 45).max(1200)
}

pub fn is_scrollable(date_count: usize) -> bool {
    date_count > 10
}

/// Total cost per type for expenses on or after `since`, first-seen order.
pub fn cost_by_type(expenses: &[Expense], since: NaiveDate) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for expense in expenses {
        match expense.expense_day() {
            Some(day) if day >= since => {}
            _ => continue,
        }
        match totals
            .iter_mut()
            .find(|(name, _)| name == &expense.expense_type_name)
        {
            Some((_, total)) => *total += expense.total_cost,
            None => totals.push((expense.expense_type_name.clone(), expense.total_cost)),
        }
    }
    totals
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    pub start: f64,
    pub end: f64,
    pub share: f64,
}

/// Angles in radians, clockwise from twelve o'clock.
pub fn pie_slices(values: &[f64]) -> Vec<PieSlice> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = -FRAC_PI_2;
    values
        .iter()
        .map(|value| {
            let share = value.max(0.0) / total;
            let start = angle;
            angle += share * 2.0 * PI;
            PieSlice {
                start,
                end: angle,
                share,
            }
        })
        .collect()
}

/// SVG path for one wedge. A full circle cannot be drawn as a single arc,
/// so callers render a `<circle>` when `share` is 1.
pub fn arc_path(cx: f64, cy: f64, radius: f64, slice: &PieSlice) -> String {
    let (x1, y1) = (cx + radius * slice.start.cos(), cy + radius * slice.start.sin());
    let (x2, y2) = (cx + radius * slice.end.cos(), cy + radius * slice.end.sin());
    let large_arc = if slice.end - slice.start > PI { 1 } else { 0 };
    format!(
        "M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
    )
}

/// Maps a value onto the plot height, 0 at the bottom edge.
pub fn scale_y(value: f64, max: f64, height: f64) -> f64 {
    if max <= 0.0 {
        return height;
    }
    height - (value / max) * height
}

/// x position of the `index`-th of `count` evenly spaced points.
pub fn scale_x(index: usize, count: usize, width: f64) -> f64 {
    if count <= 1 {
        return width / 2.0;
    }
    index as f64 * width / (count - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::expense;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_are_inclusive_windows() {
        let today = day(2024, 3, 31);
        assert_eq!(TimeRange::Day.bounds(today), (today, today));
        assert_eq!(TimeRange::Week.bounds(today).0, day(2024, 3, 25));
        assert_eq!(TimeRange::Month.bounds(today).0, day(2024, 3, 2));
        assert_eq!(TimeRange::SixMonths.bounds(today).0, day(2023, 9, 30));
        assert_eq!(TimeRange::Year.bounds(today).0, day(2023, 3, 31));
    }

    #[test]
    fn pie_cutoff_steps_back_calendar_units() {
        let today = day(2024, 3, 31);
        assert_eq!(TimeRange::Day.cutoff(today), day(2024, 3, 30));
        assert_eq!(TimeRange::Week.cutoff(today), day(2024, 3, 24));
        assert_eq!(TimeRange::Month.cutoff(today), day(2024, 2, 29));
    }

    #[test]
    fn keys_round_trip_with_fallback() {
        for range in TimeRange::ALL {
            assert_eq!(TimeRange::from_key(range.key()), range);
        }
        assert_eq!(TimeRange::from_key("decade"), TimeRange::Month);
        assert_eq!(ChartKind::from_key("area"), ChartKind::Area);
        assert_eq!(ChartKind::from_key("radar"), ChartKind::Line);
    }

    #[test]
    fn series_sums_per_day_and_type() {
        let today = day(2024, 3, 10);
        let expenses = vec![
            expense("Electricity", 10.0, 3.0, "2024-03-01"),
            expense("Electricity", 5.0, 1.5, "2024-03-01T18:30:00"),
            expense("Gas", 7.0, 4.0, "2024-03-05"),
            expense("Gas", 99.0, 40.0, "2023-12-01"),
        ];
        let series = consumption_series(&expenses, None, TimeRange::Month, today);
        assert_eq!(series.labels, vec!["03/01/2024", "03/05/2024"]);
        assert_eq!(series.datasets.len(), 2);
        assert_eq!(series.datasets[0].label, "Electricity");
        assert_eq!(series.datasets[0].values, vec![15.0, 0.0]);
        assert_eq!(series.datasets[1].values, vec![0.0, 7.0]);
        assert_eq!(series.datasets[1].color, color_for(1));
        assert_eq!(series.max_value(), 15.0);
    }

    #[test]
    fn series_for_one_type() {
        let today = day(2024, 3, 10);
        let expenses = vec![
            expense("Electricity", 10.0, 3.0, "2024-03-01"),
            expense("Gas", 7.0, 4.0, "2024-03-05"),
        ];
        let series = consumption_series(&expenses, Some("Gas"), TimeRange::Month, today);
        assert_eq!(series.datasets.len(), 1);
        assert_eq!(series.datasets[0].color, color_for(0));
        assert_eq!(chart_title(Some("Gas")), "Gas Consumption Over Time");
        assert_eq!(chart_title(None), "All Types Consumption Over Time");
    }

    #[test]
    fn width_and_scroll() {
        assert_eq!(chart_width(3), 1200);
        assert_eq!(chart_width(40), 1800);
        assert!(!is_scrollable(10));
        assert!(is_scrollable(11));
    }

    #[test]
    fn cost_distribution_since_cutoff() {
        let expenses = vec![
            expense("Electricity", 10.0, 3.0, "2024-03-01"),
            expense("Gas", 7.0, 4.0, "2024-02-01"),
            expense("Electricity", 10.0, 2.0, "2024-03-02"),
        ];
        let totals = cost_by_type(&expenses, day(2024, 2, 15));
        assert_eq!(totals, vec![("Electricity".to_string(), 5.0)]);
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(color_for(15), color_for(0));
    }

    #[test]
    fn slices_cover_the_circle() {
        let slices = pie_slices(&[1.0, 3.0]);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].share - 0.25).abs() < 1e-9);
        assert!((slices[1].end - (-FRAC_PI_2 + 2.0 * PI)).abs() < 1e-9);
        assert!(pie_slices(&[0.0]).is_empty());
        let path = arc_path(50.0, 50.0, 40.0, &slices[1]);
        assert!(path.starts_with("M 50.00 50.00 L"));
        assert!(path.contains(" 0 1 1 "));
    }

    #[test]
    fn scaling() {
        assert_eq!(scale_y(5.0, 10.0, 200.0), 100.0);
        assert_eq!(scale_y(5.0, 0.0, 200.0), 200.0);
        assert_eq!(scale_x(0, 1, 100.0), 50.0);
        assert_eq!(scale_x(2, 3, 100.0), 100.0);
    }
}
