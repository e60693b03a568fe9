//! Admin analytics over medicines and orders.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use crate::domain::aggregates::{Medicine, Order, StockLevel};
use crate::domain::value_objects::Money;

pub const SALES_WINDOW_DAYS: u64 = 7;
pub const TOP_MEDICINES_LIMIT: usize = 5;
pub const TOP_USERS_LIMIT: usize = 5;
pub const HOME_TOP_SELLERS: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_medicines: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_sales: i64,
    pub total_users: i64,
    pub total_revenue: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StockStatus {
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalesSeries {
    pub dates: Vec<String>,
    pub amounts: Vec<Money>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TopMedicines {
    pub names: Vec<String>,
    pub sold: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub email: String,
    pub spent: Money,
    pub orders: usize,
}

pub fn stock_status(medicines: &[Medicine]) -> StockStatus {
    medicines.iter().fold(StockStatus::default(), |mut acc, m| {
        match m.stock_level() {
            StockLevel::InStock => acc.in_stock += 1,
            StockLevel::LowStock => acc.low_stock += 1,
            StockLevel::OutOfStock => acc.out_of_stock += 1,
        }
        acc
    })
}

pub fn total_revenue(orders: &[Order]) -> Money {
    orders.iter().map(|o| o.total).sum::<Money>().rounded()
}

pub fn inventory_summary(medicines: &[Medicine], orders: &[Order], total_users: i64) -> InventorySummary {
    let stock = stock_status(medicines);
    InventorySummary {
        total_medicines: medicines.len(),
        low_stock: stock.low_stock,
        out_of_stock: stock.out_of_stock,
        total_sales: medicines.iter().map(|m| i64::from(m.sold)).sum(),
        total_users,
        total_revenue: total_revenue(orders),
    }
}

/// Best sellers by units sold; ties keep catalog order.
pub fn top_sellers(medicines: &[Medicine], limit: usize) -> Vec<Medicine> {
    let mut ranked = medicines.to_vec();
    ranked.sort_by(|a, b| b.sold.cmp(&a.sold));
    ranked.truncate(limit);
    ranked
}

pub fn top_medicines(medicines: &[Medicine], limit: usize) -> TopMedicines {
    top_sellers(medicines, limit).into_iter().fold(TopMedicines::default(), |mut acc, m| {
        acc.names.push(m.name);
        acc.sold.push(m.sold);
        acc
    })
}

/// Daily order totals for the `days` calendar days ending with `today`,
/// oldest first. Labels look like `"07 Mar"`.
pub fn sales_over_time(orders: &[Order], today: NaiveDate, days: u64) -> SalesSeries {
    let mut by_day: HashMap<NaiveDate, Money> = HashMap::new();
    for order in orders {
        let entry = by_day.entry(order.date.date_naive()).or_insert(Money::ZERO);
        *entry = *entry + order.total;
    }

    let mut series = SalesSeries::default();
    for offset in (0..days).rev() {
        let Some(day) = today.checked_sub_days(Days::new(offset)) else { continue };
        series.dates.push(day.format("%d %b").to_string());
        series.amounts.push(by_day.get(&day).copied().unwrap_or(Money::ZERO).rounded());
    }
    series
}

/// Orders grouped by customer email, biggest spenders first.
pub fn top_customers(orders: &[Order], limit: usize) -> Vec<CustomerSpend> {
    let mut grouped: HashMap<&str, CustomerSpend> = HashMap::new();
    for order in orders {
        let entry = grouped.entry(order.user_email.as_str()).or_insert_with(|| CustomerSpend {
            email: order.user_email.clone(), spent: Money::ZERO, orders: 0,
        });
        entry.spent = entry.spent + order.total;
        entry.orders += 1;
    }

    let mut ranked: Vec<CustomerSpend> = grouped.into_values().collect();
    ranked.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.email.cmp(&b.email)));
    ranked.truncate(limit);
    for c in &mut ranked { c.spent = c.spent.rounded(); }
    ranked
}

/// Sorted, de-duplicated medicine categories.
pub fn categories(medicines: &[Medicine]) -> Vec<String> {
    let mut cats: Vec<String> = medicines.iter().map(|m| m.category.clone()).collect();
    cats.sort();
    cats.dedup();
    cats
}
