//! Plan catalogue, price selection and checkout requests.

use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthSession;
use crate::format::format_fixed;
use crate::models::{Price, Product};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan {
    Free,
    Premium,
    Company,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Premium, Plan::Company];

    pub fn title(self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Premium => "Premium",
            Plan::Company => "Company",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Plan::Free => "Essential features for basic expense tracking",
            Plan::Premium => "Advanced features for personal finance management",
            Plan::Company => "Complete solution for business expense management",
        }
    }

    /// Catalogue amount that identifies this plan's price for a cycle.
    pub fn expected_amount(self, cycle: BillingCycle) -> Option<f64> {
        match (self, cycle) {
            (Plan::Free, _) => None,
            (Plan::Premium, BillingCycle::Annual) => Some(200.0),
            (Plan::Premium, BillingCycle::Monthly) => Some(16.67),
            (Plan::Company, BillingCycle::Annual) => Some(1200.0),
            (Plan::Company, BillingCycle::Monthly) => Some(100.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillingCycle {
    Annual,
    Monthly,
}

impl BillingCycle {
    pub fn interval(self) -> &'static str {
        match self {
            BillingCycle::Annual => "year",
            BillingCycle::Monthly => "month",
        }
    }

    pub fn per_label(self) -> &'static str {
        match self {
            BillingCycle::Annual => "/ year",
            BillingCycle::Monthly => "/ month",
        }
    }
}

pub fn purchase_type(recurring: bool, cycle: BillingCycle) -> &'static str {
    match (recurring, cycle) {
        (true, BillingCycle::Annual) => "recurring_annual",
        (true, BillingCycle::Monthly) => "recurring_monthly",
        (false, BillingCycle::Annual) => "one_time_annual",
        (false, BillingCycle::Monthly) => "one_time_monthly",
    }
}

pub fn find_price(products: &[Product], plan: Plan, cycle: BillingCycle) -> Option<Price> {
    let expected = plan.expected_amount(cycle)?;
    products
        .iter()
        .find(|p| p.name == plan.title())?
        .prices
        .iter()
        .find(|price| (price.amount - expected).abs() < 0.005)
        .cloned()
}

pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

pub fn format_price(amount: f64, currency: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}", symbol, format_fixed(amount)),
        None => format!("{} {}", currency.to_ascii_uppercase(), format_fixed(amount)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("Your account is not properly set up for payments. Please contact support.")]
    MissingCustomer,
    #[error("User ID not found. Please log out and log in again.")]
    MissingUser,
    #[error("This plan cannot be purchased.")]
    NotPurchasable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub user_id: String,
    pub stripe_customer_id: String,
    pub stripe_price_id: String,
    pub plan_name: String,
    pub price: f64,
    pub currency: String,
    pub interval: String,
    pub plan_purchase_type: String,
    pub success_url: String,
    pub cancel_url: String,
}

pub const SUCCESS_PATH: &str = "/account/billing/plans/success";
pub const FAILED_PATH: &str = "/account/billing/plans/failed";

pub fn purchase_request(
    session: &AuthSession,
    plan: Plan,
    price: &Price,
    recurring: bool,
    cycle: BillingCycle,
    origin: &str,
) -> Result<PurchaseRequest, BillingError> {
    if plan == Plan::Free {
        return Err(BillingError::NotPurchasable);
    }
    let stripe_customer_id = session
        .stripe_customer_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(BillingError::MissingCustomer)?;
    let user_id = session
        .user_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(BillingError::MissingUser)?;

    Ok(PurchaseRequest {
        user_id,
        stripe_customer_id,
        stripe_price_id: price.id.clone(),
        plan_name: plan.title().to_string(),
        price: price.amount,
        currency: price.currency.clone(),
        interval: cycle.interval().to_string(),
        plan_purchase_type: purchase_type(recurring, cycle).to_string(),
        success_url: format!("{}{}", origin, SUCCESS_PATH),
        cancel_url: format!("{}{}", origin, FAILED_PATH),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureCell {
    Text(&'static str),
    Unavailable,
}

pub struct FeatureRow {
    pub title: &'static str,
    pub free: FeatureCell,
    pub premium: FeatureCell,
    pub company: FeatureCell,
}

impl FeatureRow {
    pub fn cell(&self, plan: Plan) -> FeatureCell {
        match plan {
            Plan::Free => self.free,
            Plan::Premium => self.premium,
            Plan::Company => self.company,
        }
    }
}

pub const FEATURES: [FeatureRow; 5] = [
    FeatureRow {
        title: "Expense tracking",
        free: FeatureCell::Text("Up to 5 per month"),
        premium: FeatureCell::Text("Unlimited"),
        company: FeatureCell::Text("Unlimited"),
    },
    FeatureRow {
        title: "Basic categories",
        free: FeatureCell::Text("Electricity, Gas, Water"),
        premium: FeatureCell::Text("All basic plus Fuel"),
        company: FeatureCell::Text("All categories"),
    },
    FeatureRow {
        title: "Advanced categories",
        free: FeatureCell::Unavailable,
        premium: FeatureCell::Text("Internet, Phone, Heating"),
        company: FeatureCell::Text("Company specific categories"),
    },
    FeatureRow {
        title: "Bill OCR scanning",
        free: FeatureCell::Text("Unlimited scans"),
        premium: FeatureCell::Text("Unlimited scans"),
        company: FeatureCell::Text("Unlimited scans"),
    },
    FeatureRow {
        title: "Custom categories",
        free: FeatureCell::Unavailable,
        premium: FeatureCell::Text("Up to 3 categories"),
        company: FeatureCell::Text("Unlimited categories"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn price(id: &str, amount: f64) -> Price {
        Price {
            id: id.to_string(),
            amount,
            currency: "eur".to_string(),
            interval: None,
        }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            Product {
                id: Some("p1".into()),
                name: "Premium".into(),
                description: None,
                prices: vec![price("pm", 16.67), price("pa", 200.0)],
            },
            Product {
                id: Some("p2".into()),
                name: "Company".into(),
                description: None,
                prices: vec![price("ca", 1200.0), price("cm", 100.0)],
            },
        ]
    }

    fn session() -> AuthSession {
        AuthSession {
            token: "t".into(),
            user_id: Some("u1".into()),
            stripe_customer_id: Some("cus_1".into()),
            roles: vec!["Free".into()],
            user_name: None,
            email: None,
            expires_at: None,
        }
    }

    #[test]
    fn picks_price_by_cycle() {
        let products = catalogue();
        assert_eq!(
            find_price(&products, Plan::Premium, BillingCycle::Monthly).map(|p| p.id),
            Some("pm".to_string())
        );
        assert_eq!(
            find_price(&products, Plan::Company, BillingCycle::Annual).map(|p| p.id),
            Some("ca".to_string())
        );
        assert!(find_price(&products, Plan::Free, BillingCycle::Annual).is_none());
        assert!(find_price(&[], Plan::Premium, BillingCycle::Annual).is_none());
    }

    #[test]
    fn purchase_types() {
        assert_eq!(purchase_type(true, BillingCycle::Annual), "recurring_annual");
        assert_eq!(purchase_type(true, BillingCycle::Monthly), "recurring_monthly");
        assert_eq!(purchase_type(false, BillingCycle::Annual), "one_time_annual");
        assert_eq!(purchase_type(false, BillingCycle::Monthly), "one_time_monthly");
    }

    #[test]
    fn prices_format_with_symbol() {
        assert_eq!(format_price(1200.0, "eur"), "€1,200.00");
        assert_eq!(format_price(16.67, "usd"), "$16.67");
        assert_eq!(format_price(5.0, "chf"), "CHF 5.00");
    }

    #[test]
    fn builds_purchase_request() {
        let request = purchase_request(
            &session(),
            Plan::Premium,
            &price("pa", 200.0),
            false,
            BillingCycle::Annual,
            "https://app.example.com",
        )
        .unwrap();
        assert_eq!(request.plan_name, "Premium");
        assert_eq!(request.interval, "year");
        assert_eq!(request.plan_purchase_type, "one_time_annual");
        assert_eq!(
            request.success_url,
            "https://app.example.com/account/billing/plans/success"
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stripeCustomerId"], "cus_1");
        assert_eq!(json["stripePriceId"], "pa");
    }

    #[test]
    fn purchase_needs_customer_and_user() {
        let mut session = session();
        session.stripe_customer_id = None;
        let err = purchase_request(
            &session,
            Plan::Company,
            &price("ca", 1200.0),
            true,
            BillingCycle::Annual,
            "",
        )
        .unwrap_err();
        assert_eq!(err, BillingError::MissingCustomer);

        let mut session = self::session();
        session.user_id = None;
        let err = purchase_request(
            &session,
            Plan::Company,
            &price("ca", 1200.0),
            true,
            BillingCycle::Annual,
            "",
        )
        .unwrap_err();
        assert_eq!(err, BillingError::MissingUser);
    }

    #[test]
    fn feature_matrix_has_unavailable_cells_for_free() {
        assert_eq!(FEATURES[2].cell(Plan::Free), FeatureCell::Unavailable);
        assert_eq!(FEATURES[0].cell(Plan::Premium), FeatureCell::Text("Unlimited"));
    }
}
