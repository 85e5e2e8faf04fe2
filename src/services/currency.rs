//! Display currencies
//!
//! Amounts are never converted; the currency only changes the symbol shown
//! and the currency the advisor is asked to quote prices in.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
}

pub const CURRENCIES: [Currency; 9] = [
    Currency { code: "USD", symbol: "$", label: "United States Dollar" },
    Currency { code: "EUR", symbol: "€", label: "Euro" },
    Currency { code: "GBP", symbol: "£", label: "British Pound" },
    Currency { code: "JPY", symbol: "¥", label: "Japanese Yen" },
    Currency { code: "CAD", symbol: "C$", label: "Canadian Dollar" },
    Currency { code: "AUD", symbol: "A$", label: "Australian Dollar" },
    Currency { code: "INR", symbol: "₹", label: "Indian Rupee" },
    Currency { code: "ZAR", symbol: "R", label: "South African Rand" },
    Currency { code: "CNY", symbol: "¥", label: "Chinese Yuan" },
];

impl Currency {
    /// Look up by ISO code (case-insensitive)
    pub fn find(code: &str) -> Option<Currency> {
        CURRENCIES
            .iter()
            .copied()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Look up by code, falling back to USD
    pub fn find_or_default(code: &str) -> Currency {
        Self::find(code).unwrap_or(CURRENCIES[0])
    }

    /// e.g. "$110.98"
    pub fn format(&self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol, amount)
    }
}
