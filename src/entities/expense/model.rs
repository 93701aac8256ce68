//! Expense entity

use crate::core::validation::DraftRules;
use crate::core::{FieldValue, Listable};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Categories offered by the expense form
pub const CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Health",
    "Other",
];

/// Date format of [`Expense::date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One spending record of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_title: Option<String>,
    /// Day of the expense, `YYYY-MM-DD`
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl_entity!(Expense, "expense", "expenses", owner: user_id);

impl Expense {
    /// Parsed [`date`](Expense::date); None when the source sent garbage
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Payload of the add-expense form
///
/// `amount` is the raw text the user typed. The owner is stamped by the
/// store from the session, never taken from the draft.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub amount: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_title: Option<String>,
    pub date: String,
}

impl ExpenseDraft {
    /// Draft dated today
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
            expense_title: None,
            date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date.format(DATE_FORMAT).to_string();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.expense_title = Some(title.into());
        self
    }
}

impl Listable for Expense {
    type Draft = ExpenseDraft;

    fn searchable_values(&self) -> Vec<&str> {
        let mut values = vec![self.description.as_str(), self.category.as_str()];
        if let Some(title) = &self.expense_title {
            values.push(title);
        }
        values
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::from(self.id.as_str())),
            "userId" => Some(FieldValue::from(self.user_id.as_str())),
            "amount" => Some(FieldValue::Float(self.amount)),
            "category" => Some(FieldValue::from(self.category.as_str())),
            "description" => Some(FieldValue::from(self.description.as_str())),
            "expenseTitle" => self.expense_title.as_deref().map(FieldValue::from),
            "date" => self.day().map(FieldValue::Date),
            "createdAt" => self.created_at.map(FieldValue::DateTime),
            _ => None,
        }
    }

    fn draft_rules() -> DraftRules {
        draft_rules!("expense",
            validate: {
                "amount": [required, numeric, positive],
                "category": [required, one_of(CATEGORIES)],
                "description": [required],
                "date": [required, date_format(DATE_FORMAT)],
            },
            filters: {
                "amount": [to_number],
                "category": [trim],
                "description": [trim],
            }
        )
    }

    fn owner_field() -> Option<&'static str> {
        Some("userId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreError;
    use serde_json::json;

    fn check(draft: &ExpenseDraft) -> Result<serde_json::Value, StoreError> {
        Expense::draft_rules().check(serde_json::to_value(draft).unwrap())
    }

    #[test]
    fn test_json_shape() {
        let expense: Expense = serde_json::from_value(json!({
            "id": "1",
            "userId": "u1",
            "amount": 10,
            "category": "Food",
            "description": "Lunch",
            "date": "2024-03-02"
        }))
        .unwrap();
        assert_eq!(expense.amount, 10.0);
        assert_eq!(expense.day(), NaiveDate::from_ymd_opt(2024, 3, 2));
        assert!(expense.created_at.is_none());

        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["userId"], "u1");
        assert!(value.get("expenseTitle").is_none());
    }

    #[test]
    fn test_new_draft_is_dated_today() {
        let draft = ExpenseDraft::new("12.50", "Food", "Lunch");
        assert_eq!(draft.date, Local::now().date_naive().format(DATE_FORMAT).to_string());
        assert!(check(&draft).is_ok());
    }

    #[test]
    fn test_amount_rules() {
        let err = check(&ExpenseDraft::new("-5", "Food", "Lunch")).unwrap_err();
        assert_eq!(err, StoreError::validation("amount", "amount must be positive"));

        let err = check(&ExpenseDraft::new("abc", "Food", "Lunch")).unwrap_err();
        assert_eq!(err.to_string(), "amount must be a valid number");

        let err = check(&ExpenseDraft::new("", "Food", "Lunch")).unwrap_err();
        assert_eq!(err.to_string(), "amount is required");

        let checked = check(&ExpenseDraft::new(" 12.50 ", "Food", "Lunch")).unwrap();
        assert_eq!(checked["amount"].as_f64(), Some(12.5));
    }

    #[test]
    fn test_category_and_date_rules() {
        let err = check(&ExpenseDraft::new("5", "Gadgets", "Cable")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "category"));

        let err = check(&ExpenseDraft::new("5", "Food", "   ")).unwrap_err();
        assert_eq!(err.to_string(), "description is required");

        let mut draft = ExpenseDraft::new("5", "Food", "Lunch");
        draft.date = "02/03/2024".to_string();
        let err = check(&draft).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "date"));
    }

    #[test]
    fn test_date_field_value_is_a_date() {
        let expense = Expense {
            id: "1".to_string(),
            user_id: "u1".to_string(),
            amount: 3.0,
            category: "Food".to_string(),
            description: "Tea".to_string(),
            expense_title: None,
            date: "2024-03-02".to_string(),
            created_at: None,
        };
        assert_eq!(
            expense.field_value("date"),
            Some(FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()))
        );
        assert_eq!(expense.field_value("expenseTitle"), None);
    }
}
