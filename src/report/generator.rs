//! Dashboard report generation.
//!
//! This module renders a [`Dashboard`] as Markdown or JSON.

use crate::analysis::top_performers;
use crate::models::{AggregateMetrics, Dashboard, DashboardMetadata, Deal, RepSummary, StatusTotal};
use anyhow::Result;

/// Number of representatives listed under "Top Performers".
const TOP_PERFORMER_COUNT: usize = 3;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str("# Sales Dashboard\n\n");
    output.push_str("Track sales performance and team metrics.\n\n");

    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_metrics_section(&dashboard.metrics));
    output.push_str(&generate_status_section(&dashboard.status_breakdown));
    output.push_str(&generate_reps_section(&dashboard.reps, &dashboard.regions));
    output.push_str(&generate_deals_section(&dashboard.deals));

    output
}

fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Sales Reps:** {}\n", metadata.rep_count));
    section.push_str(&format!("- **Deals:** {}\n\n", metadata.deal_count));

    section
}

fn generate_metrics_section(metrics: &AggregateMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Pipeline Value | Closed Won Value | Win Rate |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        format_currency(metrics.total_pipeline_value),
        format_currency(metrics.closed_won_value),
        format_percentage(metrics.win_rate_percentage)
    ));

    section
}

fn generate_status_section(breakdown: &[StatusTotal]) -> String {
    let mut section = String::new();

    section.push_str("### Deals by Status\n\n");
    section.push_str("| Status | Deals | Value |\n");
    section.push_str("|:---|:---:|---:|\n");
    for total in breakdown {
        section.push_str(&format!(
            "| {} {} | {} | {} |\n",
            total.status.emoji(),
            total.status,
            total.count,
            format_currency(total.value)
        ));
    }
    section.push('\n');

    section
}

fn generate_reps_section(reps: &[RepSummary], regions: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## Sales Representatives\n\n");

    if reps.is_empty() {
        section.push_str("No sales representatives found.\n\n");
        return section;
    }

    if !regions.is_empty() {
        section.push_str(&format!("*Regions: {}*\n\n", regions.join(", ")));
    }

    let top = top_performers(reps, TOP_PERFORMER_COUNT);
    if !top.is_empty() {
        section.push_str("### Top Performers\n\n");
        for (i, rep) in top.iter().enumerate() {
            section.push_str(&format!(
                "{}. {} ({})\n",
                i + 1,
                rep.name,
                format_currency(rep.metrics.closed_won_value)
            ));
        }
        section.push('\n');
    }

    for rep in reps {
        section.push_str(&generate_rep_block(rep));
    }

    section
}

fn generate_rep_block(rep: &RepSummary) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {} `{}`\n\n", rep.name, rep.role));
    block.push_str(&format!("*{}*\n\n", rep.region));

    if !rep.skills.is_empty() {
        block.push_str(&format!("**Skills:** {}\n\n", rep.skills.join(", ")));
    }

    block.push_str(&format!(
        "- Total Pipeline: {}\n- Closed Won: {}\n- Win Rate: {}\n- Deals: {} | Clients: {}\n\n",
        format_currency(rep.metrics.total_pipeline_value),
        format_currency(rep.metrics.closed_won_value),
        format_percentage(rep.metrics.win_rate_percentage),
        rep.deal_count,
        rep.client_count
    ));

    block
}

fn generate_deals_section(deals: &[Deal]) -> String {
    let mut section = String::new();

    section.push_str("## All Deals\n\n");

    if deals.is_empty() {
        section.push_str("No deals found.\n\n");
        return section;
    }

    section.push_str("| Client | Sales Rep | Value | Status |\n");
    section.push_str("|:---|:---|---:|:---|\n");
    for deal in deals {
        section.push_str(&format!(
            "| {} | {} | {} | {} {} |\n",
            deal.client,
            deal.sales_rep.as_deref().unwrap_or("-"),
            format_currency(deal.value),
            deal.status.emoji(),
            deal.status
        ));
    }
    section.push('\n');

    section
}

/// Generate a JSON dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Format an amount as dollars with thousands separators.
///
/// Cents are shown only when the amount is not a whole number.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    match cents % 100 {
        0 => format!("{}${}", sign, whole),
        frac => format!("{}${}.{:02}", sign, whole, frac),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Format a percentage with one decimal place.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
