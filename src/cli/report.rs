//! Plain-text rendering for CLI output

use chrono::NaiveDate;
use std::fmt::Write;

use crate::services::session::Session;
use crate::services::{Aggregator, Currency};
use crate::types::{
    AlternativeService, Category, DashboardSummary, Notice, NoticeKind, Profile, Subscription,
};

/// Dashboard: totals, cost distribution and next renewal
pub fn render_summary(summary: &DashboardSummary, currency: &Currency, today: NaiveDate) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Subscriptions   {}", summary.subscription_count);
    let _ = writeln!(out, "Total monthly   {}", currency.format(summary.total_monthly));
    let _ = writeln!(out, "Total yearly    {}", currency.format(summary.total_yearly));

    out.push_str("\nCost distribution\n");
    if summary.categories.is_empty() {
        out.push_str("  No data to display\n");
    }
    for slice in &summary.categories {
        let _ = writeln!(
            out,
            "  {} {:<14} {:>12}",
            slice.color,
            slice.name,
            currency.format(slice.monthly_cost)
        );
    }

    if let Some(next) = &summary.next_renewal {
        let days = Aggregator::days_until(next, today);
        let when = match days {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            d if d < 0 => format!("{} days ago", -d),
            d => format!("in {} days", d),
        };
        let _ = writeln!(
            out,
            "\nNext renewal    {} on {} ({})",
            next.name, next.renewal_date, when
        );
    }

    out
}

/// One line per subscription, in stored order
pub fn render_list(subs: &[Subscription], currency: &Currency) -> String {
    if subs.is_empty() {
        return "No subscriptions tracked. Add your first subscription to start saving money.\n"
            .to_string();
    }

    let mut out = format!("{} Active\n", subs.len());
    for sub in subs {
        let _ = writeln!(
            out,
            "{}  {:<24} {:<10} {:<8} {:>10}  renews {}",
            sub.id,
            sub.name,
            sub.category,
            sub.billing_cycle,
            currency.format(sub.cost),
            sub.renewal_date
        );
    }
    out
}

/// Default names first, then custom categories with their ids
pub fn render_categories(defaults: &[&str], custom: &[Category]) -> String {
    let mut out = String::from("Default\n");
    for name in defaults {
        let _ = writeln!(out, "  {}", name);
    }
    out.push_str("Custom\n");
    if custom.is_empty() {
        out.push_str("  (none)\n");
    }
    for cat in custom {
        let _ = writeln!(out, "  {}  {}", cat.id, cat.name);
    }
    out
}

pub fn render_alternatives(service: &str, alternatives: &[AlternativeService]) -> String {
    if alternatives.is_empty() {
        return format!("No alternatives found for {}.\n", service);
    }

    let mut out = format!("Alternatives to {}\n", service);
    for alt in alternatives {
        let _ = writeln!(out, "\n{} ({})", alt.name, alt.price_description);
        let _ = writeln!(out, "  {}", alt.savings_description);
        for feature in &alt.key_features {
            let _ = writeln!(out, "  - {}", feature);
        }
        if let Some(link) = &alt.affiliate_link {
            let _ = writeln!(out, "  {}", link);
        }
    }
    out
}

pub fn render_profile(session: &Session, profile: Option<&Profile>) -> String {
    let name = profile
        .map(|p| p.full_name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("(not set)");
    let mut out = String::new();
    let _ = writeln!(out, "Name      {}", name);
    let _ = writeln!(out, "Email     {}", session.email);
    let _ = writeln!(out, "User id   {}", session.user_id);
    if let Some(p) = profile {
        let _ = writeln!(out, "Updated   {}", p.updated_at.format("%Y-%m-%d %H:%M UTC"));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Error => "error",
        NoticeKind::Info => "info",
    };
    format!("[{}] {}", tag, notice.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillingCycle;

    fn make_sub(id: &str, name: &str, cost: f64, category: &str, renewal: &str) -> Subscription {
        Subscription {
            id: id.into(),
            name: name.into(),
            cost,
            billing_cycle: BillingCycle::Monthly,
            category: category.into(),
            renewal_date: renewal.parse().unwrap(),
        }
    }

    fn usd() -> Currency {
        Currency::find_or_default("USD")
    }

    #[test]
    fn test_render_summary_sample() {
        let subs = vec![
            make_sub("1", "Netflix", 15.99, "Streaming", "2023-11-15"),
            make_sub("2", "Adobe", 54.99, "Software", "2023-11-20"),
            make_sub("3", "Gym", 40.00, "Fitness", "2023-11-01"),
        ];
        let summary = Aggregator::summary(&subs);
        let today = NaiveDate::from_ymd_opt(2023, 10, 30).unwrap();

        let text = render_summary(&summary, &usd(), today);

        assert!(text.contains("$110.98"));
        assert!(text.contains("$1331.76"));
        assert!(text.contains("#3b82f6"));
        assert!(text.contains("Gym on 2023-11-01 (in 2 days)"));
    }

    #[test]
    fn test_render_summary_empty() {
        let text = render_summary(
            &DashboardSummary::default(),
            &usd(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(text.contains("$0.00"));
        assert!(text.contains("No data to display"));
        assert!(!text.contains("Next renewal"));
    }

    #[test]
    fn test_render_summary_overdue() {
        let subs = vec![make_sub("1", "Netflix", 1.0, "Streaming", "2024-01-01")];
        let today = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let text = render_summary(&Aggregator::summary(&subs), &usd(), today);
        assert!(text.contains("(3 days ago)"));
    }

    #[test]
    fn test_render_list() {
        assert!(render_list(&[], &usd()).starts_with("No subscriptions tracked"));

        let subs = vec![make_sub("abc", "Netflix", 15.99, "Streaming", "2023-11-15")];
        let text = render_list(&subs, &Currency::find_or_default("EUR"));
        assert!(text.starts_with("1 Active"));
        assert!(text.contains("€15.99"));
        assert!(text.contains("renews 2023-11-15"));
    }

    #[test]
    fn test_render_profile() {
        let session = Session {
            user_id: "u-1".into(),
            email: "ada@example.com".into(),
            signed_in_at: chrono::Utc::now(),
        };
        let text = render_profile(&session, None);
        assert!(text.contains("(not set)"));
        assert!(!text.contains("Updated"));

        let text = render_profile(&session, Some(&Profile::new("Ada")));
        assert!(text.contains("Name      Ada"));
        assert!(text.contains("Updated"));
    }

    #[test]
    fn test_render_categories() {
        let text = render_categories(&["Streaming"], &[]);
        assert!(text.contains("(none)"));
    }

    #[test]
    fn test_render_alternatives() {
        let alts = vec![AlternativeService {
            name: "Tubi".into(),
            price_description: "Free".into(),
            savings_description: "Ad-supported".into(),
            key_features: vec!["Large catalog".into()],
            affiliate_link: None,
        }];
        let text = render_alternatives("Netflix", &alts);
        assert!(text.contains("Tubi (Free)"));
        assert!(text.contains("- Large catalog"));
        assert!(render_alternatives("Netflix", &[]).contains("No alternatives"));
    }

    #[test]
    fn test_render_notice() {
        assert_eq!(render_notice(&Notice::error("nope")), "[error] nope");
        assert_eq!(render_notice(&Notice::success("Added A")), "[ok] Added A");
    }
}
