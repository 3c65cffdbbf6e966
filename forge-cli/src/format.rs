//! Text rendering for the terminal: currency, percentages and the
//! tables printed by each subcommand.

use std::fmt::Write;

use forge_core::calculations::common::{round_half_up, round_whole};
use forge_core::reference::{ContributionLimit, Deadline};
use forge_core::{BracketTable, ProjectionSeries, TaxBracket, TaxEstimate};
use rust_decimal::Decimal;

/// Whole-dollar currency in the `en-CA` style: `$85,000`, `-$1,250`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_whole(amount);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// A percentage value (already ×100) with a fixed number of decimals.
pub fn format_percent(
    percent: Decimal,
    dp: u32,
) -> String {
    let rounded = round_half_up(percent, dp);
    format!("{:.*}%", dp as usize, rounded)
}

/// A fractional rate such as `0.0505` as `5.05%`, without trailing zeros.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// `$0 – $57,375`, or `$220,000+` for the top bracket.
pub fn bracket_range(bracket: &TaxBracket) -> String {
    match bracket.upper_bound {
        Some(upper) => format!(
            "{} – {}",
            format_currency(bracket.lower_bound),
            format_currency(upper)
        ),
        None => format!("{}+", format_currency(bracket.lower_bound)),
    }
}

pub fn render_estimate(
    estimate: &TaxEstimate,
    marginal_rate: Option<Decimal>,
) -> String {
    let mut rows = vec![
        ("Province", estimate.province.label().to_string()),
        ("Income", format_currency(estimate.income)),
        ("Federal Tax", format_currency(estimate.federal_tax)),
        ("Provincial Tax", format_currency(estimate.provincial_tax)),
        ("Total Tax", format_currency(estimate.total_tax)),
        ("Effective Tax Rate", format_percent(estimate.effective_rate_percent, 1)),
        ("After-Tax Income", format_currency(estimate.after_tax_income)),
    ];
    if let Some(rate) = marginal_rate {
        rows.push(("Marginal Rate", format_rate(rate)));
    }
    render_pairs(&rows)
}

pub fn render_projection(series: &ProjectionSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:>14} {:>18}", "Year", "TFSA", "RRSP (after tax)");
    for point in series {
        let _ = writeln!(
            out,
            "{:<10} {:>14} {:>18}",
            point.label,
            format_currency(point.tfsa),
            format_currency(point.rrsp_after_tax)
        );
    }
    if let Some(last) = series.last() {
        let advantage = last.rrsp_advantage();
        let summary = if advantage.is_zero() {
            "RRSP and TFSA finish level.".to_string()
        } else if advantage.is_sign_positive() {
            format!("RRSP finishes ahead by {}.", format_currency(advantage))
        } else {
            format!("TFSA finishes ahead by {}.", format_currency(-advantage))
        };
        let _ = writeln!(out, "\n{summary}");
    }
    out.push_str(
        "RRSP contribution is grossed up to reflect the tax deduction benefit. \
         Results are estimates only.\n",
    );
    out
}

pub fn render_brackets(
    title: &str,
    table: &BracketTable,
) -> String {
    let mut out = format!("{title}\n");
    for bracket in table.brackets() {
        let _ = writeln!(out, "  {:<26} {:>8}", bracket_range(bracket), format_rate(bracket.rate));
    }
    out
}

pub fn render_limits(
    title: &str,
    limits: &[ContributionLimit],
    note: Option<&str>,
) -> String {
    let mut out = format!("{title}\n");
    for limit in limits {
        let _ = writeln!(out, "  {:<12} {:>10}", limit.year_label(), format_currency(limit.limit));
    }
    if let Some(note) = note {
        let _ = writeln!(out, "  {note}");
    }
    out
}

pub fn render_deadlines(deadlines: &[Deadline]) -> String {
    let rows: Vec<_> = deadlines.iter().map(|d| (d.date, d.event.to_string())).collect();
    render_pairs(&rows)
}

fn render_pairs(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<width$}  {value}");
    }
    out
}
