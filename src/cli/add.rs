//! `subsleuth add` subcommand

use std::str::FromStr;

use chrono::NaiveDate;
use clap::Args;

use crate::types::{parse_renewal_date, BillingCycle, NewSubscription, Result};

/// Track a new subscription
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Service name (e.g. Netflix)
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Amount charged per billing cycle
    #[arg(value_name = "COST")]
    pub cost: f64,

    /// monthly or yearly
    #[arg(long, default_value = "monthly", value_parser = BillingCycle::from_str)]
    pub cycle: BillingCycle,

    /// Default or custom category
    #[arg(long, default_value = "Streaming")]
    pub category: String,

    /// Next charge date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub renewal: Option<String>,
}

impl AddArgs {
    /// Parse the raw arguments; validation against categories happens later
    pub fn to_new_subscription(&self, today: NaiveDate) -> Result<NewSubscription> {
        let renewal_date = match &self.renewal {
            Some(s) => parse_renewal_date(s)?,
            None => today,
        };

        Ok(NewSubscription {
            name: self.name.clone(),
            cost: self.cost,
            billing_cycle: self.cycle,
            category: self.category.clone(),
            renewal_date,
        })
    }
}
