//! Spending summaries over a period

use super::model::Expense;
use chrono::{Datelike, Duration, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How many expenses a summary lists
pub const RECENT_LIMIT: usize = 5;

/// Reporting window, relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The last seven days
    Week,
    /// The calendar month
    #[default]
    Month,
    /// The calendar year
    Year,
    All,
}

impl Period {
    /// Whether `day` falls within the period ending on `today`
    pub fn contains(&self, day: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::Week => day >= today - Duration::days(7),
            Period::Month => day.year() == today.year() && day.month() == today.month(),
            Period::Year => day.year() == today.year(),
            Period::All => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "This Week",
            Period::Month => "This Month",
            Period::Year => "This Year",
            Period::All => "All Time",
        }
    }
}

/// Totals of the expenses within one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub period: Period,
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// The newest expenses of the period, at most [`RECENT_LIMIT`]
    pub recent: Vec<Expense>,
}

impl ExpenseSummary {
    /// Summarize `expenses` for `period` ending on `today`
    ///
    /// Expenses whose date does not parse only count toward [`Period::All`].
    pub fn compute(expenses: &[Expense], period: Period, today: NaiveDate) -> Self {
        let mut matching: Vec<&Expense> = expenses
            .iter()
            .filter(|e| match e.day() {
                Some(day) => period.contains(day, today),
                None => period == Period::All,
            })
            .collect();
        matching.sort_by(|a, b| b.day().cmp(&a.day()));

        let count = matching.len();
        let total: f64 = matching.iter().map(|e| e.amount).sum();
        let average = if count == 0 { 0.0 } else { total / count as f64 };

        Self {
            period,
            count,
            total,
            average,
            recent: matching.into_iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

/// Sum of amounts per category, in order of first appearance
pub fn totals_by_category(expenses: &[Expense]) -> IndexMap<String, f64> {
    let mut totals = IndexMap::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}
