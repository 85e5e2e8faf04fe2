//! Aggregator service for computing dashboard spend statistics
//!
//! Everything here is a pure function of the subscription snapshot.
//! Callers recompute on every change instead of keeping running totals.

use crate::types::{BillingCycle, CategorySpend, ChartSlice, DashboardSummary, Subscription};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Chart palette, cycled by category position
pub const CHART_PALETTE: [&str; 9] = [
    "#3b82f6", // blue
    "#10b981", // emerald
    "#f59e0b", // amber
    "#ef4444", // red
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#06b6d4", // cyan
    "#84cc16", // lime
    "#f97316", // orange
];

/// Aggregator for computing spend statistics
pub struct Aggregator;

impl Aggregator {
    /// Cost expressed as an equivalent monthly charge
    pub fn normalized_monthly_cost(sub: &Subscription) -> f64 {
        match sub.billing_cycle {
            BillingCycle::Monthly => sub.cost,
            BillingCycle::Yearly => sub.cost / 12.0,
        }
    }

    /// Sum of normalized monthly costs, accumulated in input order
    pub fn total_monthly(subs: &[Subscription]) -> f64 {
        subs.iter()
            .fold(0.0, |acc, sub| acc + Self::normalized_monthly_cost(sub))
    }

    /// Projection of the monthly total, not a separate sum over yearly records
    pub fn total_yearly(subs: &[Subscription]) -> f64 {
        Self::total_monthly(subs) * 12.0
    }

    /// Monthly spend per category, in order of first appearance
    pub fn category_breakdown(subs: &[Subscription]) -> Vec<CategorySpend> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut result: Vec<CategorySpend> = Vec::new();

        for sub in subs {
            let cost = Self::normalized_monthly_cost(sub);
            match index.get(sub.category.as_str()) {
                Some(&i) => result[i].monthly_cost += cost,
                None => {
                    index.insert(sub.category.as_str(), result.len());
                    result.push(CategorySpend {
                        name: sub.category.clone(),
                        monthly_cost: cost,
                    });
                }
            }
        }

        result
    }

    /// Earliest renewal; ties keep the first in input order
    pub fn next_renewal(subs: &[Subscription]) -> Option<&Subscription> {
        // min_by_key returns the first of equal minima
        subs.iter().min_by_key(|s| s.renewal_date)
    }

    /// Chart color for the category at `index` in the breakdown
    pub fn chart_color(index: usize) -> &'static str {
        CHART_PALETTE[index % CHART_PALETTE.len()]
    }

    /// Signed days from `today` until the renewal (negative when overdue)
    pub fn days_until(sub: &Subscription, today: NaiveDate) -> i64 {
        (sub.renewal_date - today).num_days()
    }

    /// Everything the dashboard shows, derived from one snapshot
    pub fn summary(subs: &[Subscription]) -> DashboardSummary {
        let categories = Self::category_breakdown(subs)
            .into_iter()
            .enumerate()
            .map(|(i, spend)| ChartSlice {
                name: spend.name,
                monthly_cost: spend.monthly_cost,
                color: Self::chart_color(i),
            })
            .collect();

        DashboardSummary {
            subscription_count: subs.len(),
            total_monthly: Self::total_monthly(subs),
            total_yearly: Self::total_yearly(subs),
            categories,
            next_renewal: Self::next_renewal(subs).cloned(),
        }
    }
}
