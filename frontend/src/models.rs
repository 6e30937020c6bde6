use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One consumption/cost entry as returned by `/user-expenses/{userId}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub user_expense_id: Option<String>,
    pub expense_type_name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub rate_per_unit: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub expense_for_date: String,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl Expense {
    /// Calendar day the expense is for, with any time component dropped.
    pub fn expense_day(&self) -> Option<NaiveDate> {
        parse_day(&self.expense_for_date)
    }

    /// When the record was created; falls back to the expense day.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_date
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.expense_day().and_then(|d| d.and_hms_opt(0, 0, 0)))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseType {
    pub expense_type_id: String,
    #[serde(rename = "expenseName")]
    pub name: String,
    #[serde(default)]
    pub expense_category_id: Option<String>,
    #[serde(default)]
    pub unit_of_measurement: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub user_id: String,
    pub expense_type_id: String,
    pub quantity: f64,
    pub rate_per_unit: f64,
    pub status: u8,
    pub expense_for_date: String,
}

pub const PREMIUM_EXPENSE_CATEGORY_ID: &str = "da7693ec-a4ee-40ad-bdcd-ab6fc2267f60";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseType {
    pub expense_name: String,
    pub description: String,
    pub expense_category_id: String,
    pub unit_of_measurement: String,
}

impl NewExpenseType {
    pub fn custom(name: &str) -> Self {
        Self {
            expense_name: name.trim().to_string(),
            description: "Premium User Expense".to_string(),
            expense_category_id: PREMIUM_EXPENSE_CATEGORY_ID.to_string(),
            unit_of_measurement: "unit".to_string(),
        }
    }
}

/// Raw body of the bill OCR endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    #[serde(default)]
    pub units_consumed: Option<f64>,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
    #[serde(default)]
    pub total_bill: Option<f64>,
}

/// OCR values mapped onto the entry form.
#[derive(Clone, Debug, PartialEq)]
pub struct OcrReading {
    pub units_consumed: Option<f64>,
    pub rate_per_unit: Option<f64>,
    pub total_bill: Option<f64>,
    pub date: NaiveDate,
    pub notes: String,
}

impl OcrReading {
    pub fn from_response(response: OcrResponse, today: NaiveDate) -> Self {
        let notes = match response.total_bill {
            Some(total) => format!("OCR extracted bill amount: {}", total),
            None => "OCR extracted bill amount: unknown".to_string(),
        };
        Self {
            units_consumed: response.units_consumed,
            rate_per_unit: response.price_per_unit,
            total_bill: response.total_bill,
            date: today,
            notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub interval: Option<String>,
}

fn default_currency() -> String {
    "eur".to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prices: Vec<Price>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub is_successfull: bool,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: String,
    pub address_name: String,
    #[serde(default)]
    pub complete_address: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address_type: i32,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl Address {
    pub fn type_label(&self) -> &'static str {
        address_type_label(self.address_type)
    }
}

pub fn address_type_label(kind: i32) -> &'static str {
    match kind {
        0 => "Office",
        1 => "Residential",
        2 => "Warehouse",
        3 => "Manufacturing",
        4 => "Retail",
        _ => "Other",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub address_name: String,
    pub complete_address: String,
    pub description: String,
    pub address_type: i32,
    pub status: u8,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAddress {
    #[serde(default)]
    pub address_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressExpense {
    #[serde(default)]
    pub user_address_expense_id: Option<String>,
    #[serde(default)]
    pub address_name: Option<String>,
    #[serde(default)]
    pub expense_type_name: Option<String>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub expense_for_date: Option<String>,
}

impl AddressExpense {
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .map(|value| value.to_lowercase().contains(&query))
                .unwrap_or(false)
        };
        contains(&self.address_name) || contains(&self.expense_type_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddressExpense {
    pub expense_type_id: String,
    pub address_id: String,
    pub status: u8,
    pub quantity: f64,
    pub rate_per_unit: f64,
    pub expense_for_date: String,
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    parse_day(raw).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses a form field that must hold a non-negative number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_deserializes_from_backend_shape() {
        let raw = r#"{
            "userExpenseId": "e1",
            "expenseTypeName": "Electricity",
            "quantity": 120,
            "ratePerUnit": 0.25,
            "totalCost": 30.0,
            "expenseForDate": "2024-03-05T00:00:00",
            "createdDate": "2024-03-06T10:15:30.123"
        }"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.quantity, 120.0);
        assert_eq!(expense.expense_day(), NaiveDate::from_ymd_opt(2024, 3, 5));
        let created = expense.created_at().unwrap();
        assert_eq!(created.date(), NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn created_at_falls_back_to_expense_day() {
        let raw = r#"{"expenseTypeName": "Gas", "expenseForDate": "2024-01-02"}"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.total_cost, 0.0);
        assert_eq!(
            expense.created_at(),
            NaiveDate::from_ymd_opt(2024, 1, 2).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn timestamps_with_offsets_are_normalised() {
        let ts = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01 10:00:00");
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_day("2024-13-01").is_none());
    }

    #[test]
    fn expense_type_reads_expense_name() {
        let raw = r#"{"expenseTypeId": "t1", "expenseName": "Water", "unitOfMeasurement": "m3"}"#;
        let kind: ExpenseType = serde_json::from_str(raw).unwrap();
        assert_eq!(kind.name, "Water");
        assert_eq!(kind.unit_of_measurement.as_deref(), Some("m3"));
    }

    #[test]
    fn ocr_response_maps_onto_form() {
        let response: OcrResponse =
            serde_json::from_str(r#"{"unitsConsumed": 320, "pricePerUnit": 0.3, "totalBill": 96}"#)
                .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let reading = OcrReading::from_response(response, today);
        assert_eq!(reading.units_consumed, Some(320.0));
        assert_eq!(reading.rate_per_unit, Some(0.3));
        assert_eq!(reading.date, today);
        assert_eq!(reading.notes, "OCR extracted bill amount: 96");
    }

    #[test]
    fn new_expense_serializes_camel_case() {
        let body = NewExpense {
            user_id: "u1".into(),
            expense_type_id: "t1".into(),
            quantity: 10.0,
            rate_per_unit: 2.5,
            status: 1,
            expense_for_date: "2024-02-01".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["ratePerUnit"], 2.5);
        assert_eq!(json["expenseForDate"], "2024-02-01");
    }

    #[test]
    fn amounts_must_be_non_negative_numbers() {
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn address_expense_search_covers_name_and_type() {
        let item = AddressExpense {
            user_address_expense_id: Some("x".into()),
            address_name: Some("Main Office".into()),
            expense_type_name: Some("Electricity".into()),
            total_cost: Some(10.0),
            expense_for_date: None,
        };
        assert!(item.matches("office"));
        assert!(item.matches("ELEC"));
        assert!(item.matches(""));
        assert!(!item.matches("water"));
        assert_eq!(address_type_label(2), "Warehouse");
        assert_eq!(address_type_label(9), "Other");
    }
}
