//! Terminal output for command results.
//!
//! Every renderer returns a `String` so commands stay easy to test; colors
//! come from `colored` and are switched off in tests.

use colored::Colorize;
use maconomy_core::{DailyTotal, LoginInfo, Period, PeriodSummary, SearchResult};

pub fn login_summary(info: &LoginInfo) -> String {
    format!(
        "Got session for #{} {} {}",
        info.employee_number.yellow(),
        info.employee_name,
        info.company
    )
}

pub fn period(period: &Period) -> String {
    let mut out = format!("Period {} - {}", period.start_date.bold(), period.end_date.bold());
    if period.submitted {
        out.push_str(&format!(" {}", "(submitted)".green()));
    }
    out.push('\n');

    if period.lines.is_empty() {
        out.push_str("No timesheet lines\n");
    }

    for line in &period.lines {
        out.push_str(&format!(
            "\n{} {} / {} {}\n",
            line.key.blue(),
            line.project_id,
            line.task,
            line.task_description
        ));
        let details: Vec<&str> = [line.customer.as_str(), line.entry_text.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !details.is_empty() {
            out.push_str(&format!("  {}\n", details.join(" | ")));
        }
        for day in line.daily_entries.iter().filter(|d| !d.hours.is_empty()) {
            out.push_str(&format!("  {}  {:>6}", day.date, day.hours));
            if !day.description.is_empty() {
                out.push_str(&format!("  {}", day.description));
            }
            out.push('\n');
        }
    }

    if !period.daily_totals.is_empty() {
        out.push_str(&format!("\n{}\n", "Totals".bold()));
        out.push_str(&totals(&period.daily_totals));
    }
    out
}

pub fn search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results\n".to_string();
    }
    results
        .iter()
        .map(|r| format!("{:<12} {}\n", r.key.yellow(), r.display_name))
        .collect()
}

pub fn periods(periods: &[PeriodSummary]) -> String {
    if periods.is_empty() {
        return "No periods\n".to_string();
    }
    periods
        .iter()
        .map(|p| {
            let state = if p.submitted {
                "submitted".green()
            } else {
                "open".yellow()
            };
            format!("{} - {}  {}\n", p.start_date, p.end_date, state)
        })
        .collect()
}

pub fn totals(totals: &[DailyTotal]) -> String {
    totals
        .iter()
        .map(|t| format!("  {}  {:>6}\n", t.date, t.hours))
        .collect()
}
