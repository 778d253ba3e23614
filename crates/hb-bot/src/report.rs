//! Server Report Builder: one inventory fetch rendered as operator-facing text.

use std::str::FromStr;

use hb_infra::types::{ServerListing, ServerRecord, Truncation};
use hb_infra::{Inventory, Project};

use crate::error::BotError;

const NOT_AVAILABLE: &str = "N/A";

/// Which fields each server block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Name, status, IPv4 and monthly price.
    #[default]
    Minimal,
    /// Minimal plus IPv6, plan, location and creation date.
    Extended,
}

impl FromStr for ReportFormat {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, BotError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "extended" => Ok(Self::Extended),
            other => Err(BotError::Config(format!(
                "HB_REPORT_FORMAT must be minimal or extended, got {other}"
            ))),
        }
    }
}

/// Conversion from the provider's billing currency (EUR) to the display currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDisplay {
    pub exchange_rate: f64,
    pub currency_symbol: String,
}

impl Default for PriceDisplay {
    fn default() -> Self {
        Self {
            exchange_rate: 90.0,
            currency_symbol: "₹".into(),
        }
    }
}

impl PriceDisplay {
    pub fn format(&self, amount: Option<f64>) -> String {
        match amount {
            Some(amount) => format!("{}{:.2}", self.currency_symbol, amount * self.exchange_rate),
            None => NOT_AVAILABLE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub price: PriceDisplay,
}

/// Fetch the project's servers once and render them.
pub async fn server_report(
    inventory: &dyn Inventory,
    project: &Project,
    options: &ReportOptions,
) -> hb_infra::Result<String> {
    let listing = inventory.list_servers(project).await?;
    Ok(build_report(&project.name, &listing, options))
}

/// Render servers as one blank-line separated block each, in the order given.
/// A truncated listing ends with a paragraph saying how much is shown.
pub fn build_report(project_name: &str, listing: &ServerListing, options: &ReportOptions) -> String {
    let servers = &listing.servers;
    if servers.is_empty() {
        return format!("No servers found for project {project_name}.");
    }

    let mut report = format!("Server Details for project {project_name}:");
    for server in servers {
        report.push_str("\n\n");
        report.push_str(&server_block(server, options));
    }
    if let Some(truncation) = &listing.truncated {
        report.push_str("\n\n");
        report.push_str(&truncation_notice(servers.len(), truncation));
    }
    report
}

fn truncation_notice(shown: usize, truncation: &Truncation) -> String {
    match truncation.total {
        Some(total) => format!("Showing the first {shown} of {total} servers."),
        None => format!("Showing the first {shown} servers; the project has more."),
    }
}

fn server_block(server: &ServerRecord, options: &ReportOptions) -> String {
    let mut lines = vec![
        format!("Name: {}", server.name),
        format!("Status: {}", server.status),
        format!("IPv4: {}", server.ipv4.as_deref().unwrap_or(NOT_AVAILABLE)),
    ];

    if options.format == ReportFormat::Extended {
        lines.push(format!("IPv6: {}", server.ipv6.as_deref().unwrap_or(NOT_AVAILABLE)));
        lines.push(format!("Plan: {}", server.plan));
        lines.push(format!(
            "Location: {}",
            server.location.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        lines.push(format!(
            "Created: {}",
            server
                .created
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.into())
        ));
    }

    lines.push(format!("Monthly Price: {}", options.price.format(server.monthly_price)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use hb_infra::types::PowerStatus;

    use super::*;

    fn record(name: &str, ipv4: Option<&str>, price: Option<f64>) -> ServerRecord {
        ServerRecord {
            id: 1,
            name: name.into(),
            status: PowerStatus::Running,
            ipv4: ipv4.map(Into::into),
            ipv6: None,
            plan: "cx22".into(),
            location: Some("fsn1".into()),
            created: None,
            monthly_price: price,
        }
    }

    #[test]
    fn empty_inventory_is_a_notice() {
        let report = build_report("PROJECT1", &ServerListing::default(), &ReportOptions::default());
        assert_eq!(report, "No servers found for project PROJECT1.");
    }

    #[test]
    fn one_block_per_server_in_order() {
        let servers = vec![
            record("web-1", Some("203.0.113.1"), Some(4.51)),
            record("web-2", Some("203.0.113.2"), Some(4.51)),
            record("db-1", None, Some(10.0)),
        ];
        let report = build_report(
            "PROJECT1",
            &ServerListing::complete(servers.clone()),
            &ReportOptions::default(),
        );

        let blocks: Vec<&str> = report.split("\n\n").collect();
        assert_eq!(blocks.len(), servers.len() + 1);
        assert_eq!(blocks[0], "Server Details for project PROJECT1:");
        for (block, server) in blocks[1..].iter().zip(&servers) {
            assert!(block.starts_with(&format!("Name: {}\n", server.name)));
        }
    }

    #[test]
    fn minimal_block_layout() {
        let report = build_report(
            "PROJECT1",
            &ServerListing::complete(vec![record("web-1", Some("203.0.113.1"), Some(10.0))]),
            &ReportOptions::default(),
        );
        assert_eq!(
            report,
            "Server Details for project PROJECT1:\n\n\
             Name: web-1\n\
             Status: running\n\
             IPv4: 203.0.113.1\n\
             Monthly Price: ₹900.00"
        );
    }

    #[test]
    fn truncated_listing_ends_with_count_notice() {
        let listing = ServerListing {
            servers: (0..25)
                .map(|i| record(&format!("web-{i}"), Some("203.0.113.1"), Some(1.0)))
                .collect(),
            truncated: Some(Truncation { total: Some(40) }),
        };
        let report = build_report("PROJECT1", &listing, &ReportOptions::default());

        let blocks: Vec<&str> = report.split("\n\n").collect();
        assert_eq!(blocks.len(), 1 + 25 + 1);
        assert_eq!(blocks[25], "Name: web-24\nStatus: running\nIPv4: 203.0.113.1\nMonthly Price: ₹90.00");
        assert_eq!(blocks[26], "Showing the first 25 of 40 servers.");
    }

    #[test]
    fn truncated_listing_without_total() {
        let listing = ServerListing {
            servers: vec![record("web-1", None, None)],
            truncated: Some(Truncation { total: None }),
        };
        let report = build_report("p", &listing, &ReportOptions::default());
        assert!(report.ends_with("\n\nShowing the first 1 servers; the project has more."));
    }

    #[test]
    fn complete_listing_has_no_notice() {
        let listing = ServerListing::complete(vec![record("web-1", None, None)]);
        let report = build_report("p", &listing, &ReportOptions::default());
        assert!(!report.contains("Showing"));
    }

    #[test]
    fn converts_price_with_exchange_rate() {
        let price = PriceDisplay::default();
        assert_eq!(price.format(Some(10.00)), "₹900.00");
        assert_eq!(price.format(Some(4.51)), "₹405.90");
        assert_eq!(price.format(None), "N/A");

        let dollars = PriceDisplay {
            exchange_rate: 1.1,
            currency_symbol: "$".into(),
        };
        assert_eq!(dollars.format(Some(3.0)), "$3.30");
    }

    #[test]
    fn missing_ipv4_renders_placeholder() {
        let report = build_report(
            "p",
            &ServerListing::complete(vec![record("private", None, None)]),
            &ReportOptions::default(),
        );
        assert!(report.contains("\nIPv4: N/A\n"));
        assert!(report.ends_with("Monthly Price: N/A"));
    }

    #[test]
    fn extended_format_adds_ipv6_plan_location_and_date() {
        let mut server = record("web-1", Some("203.0.113.1"), Some(1.0));
        server.ipv6 = Some("2001:db8::/64".into());
        server.status = PowerStatus::Other("migrating".into());
        server.created = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());

        let options = ReportOptions {
            format: ReportFormat::Extended,
            ..ReportOptions::default()
        };
        let report = build_report("p", &ServerListing::complete(vec![server]), &options);
        assert!(report.contains("Status: migrating\n"));
        assert!(report.contains("\nIPv6: 2001:db8::/64\n"));
        assert!(report.contains("\nPlan: cx22\n"));
        assert!(report.contains("\nLocation: fsn1\n"));
        assert!(report.contains("\nCreated: 2024-03-01\n"));
        assert!(report.ends_with("Monthly Price: ₹90.00"));
    }

    #[test]
    fn minimal_format_omits_ipv6() {
        let mut server = record("web-1", Some("203.0.113.1"), Some(1.0));
        server.ipv6 = Some("2001:db8::/64".into());
        let report = build_report("p", &ServerListing::complete(vec![server]), &ReportOptions::default());
        assert!(!report.contains("IPv6"));
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("Extended".parse::<ReportFormat>().unwrap(), ReportFormat::Extended);
        assert_eq!(" minimal ".parse::<ReportFormat>().unwrap(), ReportFormat::Minimal);
        assert!("full".parse::<ReportFormat>().is_err());
    }
}
