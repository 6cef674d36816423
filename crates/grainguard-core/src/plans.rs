//! Storage subscription plans and their tax-inclusive quotes.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Goods and services tax applied on top of the plan price.
const GST_RATE_PERCENT: i64 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: u8,
    pub months: u8,
    /// Rupees, before tax.
    pub price: Decimal,
    pub storage_kg: u32,
    pub features: Vec<&'static str>,
    pub popular: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
}

impl Plan {
    /// Price breakdown with GST rounded to the nearest rupee.
    #[must_use]
    pub fn quote(&self) -> Quote {
        let gst = (self.price * Decimal::from(GST_RATE_PERCENT) / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Quote {
            subtotal: self.price,
            gst,
            total: self.price + gst,
        }
    }
}

/// The plans offered on the subscriptions screen, shortest first.
#[must_use]
pub fn plans() -> Vec<Plan> {
    const BASE: [&str; 2] = ["Temperature control", "24/7 monitoring"];

    let plan = |id: u8, months: u8, price: i64, storage_kg: u32, extras: &[&'static str]| Plan {
        id,
        months,
        price: Decimal::from(price),
        storage_kg,
        features: BASE.iter().chain(extras).copied().collect(),
        popular: months == 3,
    };

    vec![
        plan(1, 1, 1999, 100, &[]),
        plan(2, 3, 4999, 300, &["Pickup service"]),
        plan(3, 6, 8999, 600, &["Pickup & Drop", "Priority support"]),
        plan(
            4,
            12,
            14999,
            1200,
            &["Pickup & Drop", "Priority support", "Insurance"],
        ),
    ]
}

#[must_use]
pub fn find_plan(months: u8) -> Option<Plan> {
    plans().into_iter().find(|p| p.months == months)
}
