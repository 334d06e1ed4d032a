//! Plain-text rendering of backend data.

use quotapath_core::api::CommissionsOverview;
use quotapath_core::models::{CommissionSummary, DashboardStats, Deal, PipelineData, Role, User};
use quotapath_core::nav;
use quotapath_core::utils::{format_currency, format_date, format_percentage, truncate_string};

/// Column widths for the deals table
const NAME_WIDTH: usize = 28;
const ACCOUNT_WIDTH: usize = 20;

pub fn print_profile(user: &User) {
    println!("{} ({})", user.display_name(), user.username);
    println!("  Role:  {}", user.role.label());
    if !user.email.is_empty() {
        println!("  Email: {}", user.email);
    }
    if let Some(ref employee_id) = user.employee_id {
        println!("  Employee ID: {}", employee_id);
    }
}

pub fn print_deals(deals: &[Deal]) {
    if deals.is_empty() {
        println!("No deals found.");
        return;
    }
    println!(
        "{:<6} {:<NAME_WIDTH$} {:<ACCOUNT_WIDTH$} {:>14} {:<6} {:<13} {:>5} {:<12}",
        "ID", "Deal", "Account", "Amount", "Status", "Stage", "Prob", "Close"
    );
    for deal in deals {
        println!(
            "{:<6} {:<NAME_WIDTH$} {:<ACCOUNT_WIDTH$} {:>14} {:<6} {:<13} {:>4}% {:<12}",
            deal.id,
            truncate_string(&deal.name, NAME_WIDTH),
            truncate_string(&deal.account_name, ACCOUNT_WIDTH),
            format_currency(&deal.amount),
            deal.status.label(),
            deal.stage.label(),
            deal.probability,
            deal.close_date.as_deref().map(format_date).unwrap_or_default(),
        );
    }
}

fn print_summary(summary: &CommissionSummary) {
    println!("Total commissions:   {}", format_currency(&summary.total_commissions));
    println!("Pending:             {}", format_currency(&summary.pending_commissions));
    println!("Paid:                {}", format_currency(&summary.paid_commissions));
    println!("Average commission:  {}", format_currency(&summary.average_commission));
    println!("Count:               {}", summary.commission_count);
}

pub fn print_commissions(overview: &CommissionsOverview) {
    print_summary(&overview.summary);
    println!();
    if overview.commissions.is_empty() {
        println!("No commissions found.");
        return;
    }
    println!(
        "{:<20} {:<24} {:<16} {:>14} {:>8} {:>12} {:<10}",
        "Sales Rep", "Deal", "Plan", "Deal Amount", "Rate", "Commission", "Status"
    );
    for c in &overview.commissions {
        // Rates are stored as fractions
        let rate = c
            .commission_rate
            .trim()
            .parse::<f64>()
            .map(|r| format_percentage(&(r * 100.0).to_string()))
            .unwrap_or_else(|_| c.commission_rate.clone());
        println!(
            "{:<20} {:<24} {:<16} {:>14} {:>8} {:>12} {:<10}",
            truncate_string(&c.user_name, 20),
            truncate_string(&c.deal_name, 24),
            truncate_string(&c.plan_name, 16),
            format_currency(&c.deal_amount),
            rate,
            format_currency(&c.commission_amount),
            c.status.label(),
        );
    }
}

pub fn print_dashboard(
    stats: &DashboardStats,
    summary: &CommissionSummary,
    pipeline: &[PipelineData],
) {
    println!("Total deals:        {}", stats.total_deals);
    println!("Pipeline value:     {}", format_currency(&stats.total_value));
    println!(
        "Won:                {} ({})",
        stats.won_deals,
        format_currency(&stats.won_value)
    );
    println!("Lost:               {}", stats.lost_deals);
    println!("Open:               {}", stats.open_deals);
    println!("Average deal size:  {}", format_currency(&stats.average_deal_size));
    println!("Win rate:           {}", format_percentage(&stats.win_rate));
    println!();
    print_summary(summary);

    if !pipeline.is_empty() {
        println!();
        println!("{:<16} {:>6} {:>16} {:>10}", "Stage", "Deals", "Value", "Avg Prob");
        for stage in pipeline {
            println!(
                "{:<16} {:>6} {:>16} {:>9.0}%",
                stage.stage,
                stage.count,
                format_currency(&stage.total_value),
                stage.avg_probability,
            );
        }
    }
}

pub fn print_nav(role: &Role) {
    println!("Sections for {}:", role.label());
    for item in nav::visible_items(role) {
        println!("  {:<12} {}", item.title, item.path);
    }
}
