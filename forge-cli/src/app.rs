//! Command handlers behind the `forge` binary.
//!
//! Each handler renders its output to a `String` so the binary only has
//! to print it and choose the exit code.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use forge_core::reference::{
    RRSP_LIMIT_NOTE, TAX_YEAR, cumulative_tfsa_room, deadlines, rrsp_limits, tfsa_limits,
};
use forge_core::{
    BracketTable, Province, RateTables, TableSourceRegistry, TaxEstimate, TaxEstimator,
};
use forge_data::CsvTableFactory;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::batch::{self, BatchOutcome};
use crate::config::{ForgeConfig, ProjectionDefaults};
use crate::format;
use crate::state::{ProjectionState, TaxEstimatorState};

/// Output flavour selected by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What a calculator command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Rendered(String),
    /// The input did not yield a result; carries a one-line reason.
    NoResult(String),
}

/// Every table source the binary knows about.
pub fn build_registry() -> TableSourceRegistry {
    let mut registry = TableSourceRegistry::with_builtin();
    registry.register(Box::new(CsvTableFactory));
    registry
}

pub fn load_tables(config: &ForgeConfig) -> Result<RateTables> {
    debug!(source = %config.tables.source, "loading rate tables");
    build_registry()
        .load(&config.tables)
        .with_context(|| format!("failed to load '{}' rate tables", config.tables.source))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

// --- estimate ---

#[derive(Serialize)]
struct EstimateReport<'a> {
    #[serde(flatten)]
    estimate: &'a TaxEstimate,
    marginal_rate: Option<Decimal>,
}

pub fn run_estimate(
    tables: &RateTables,
    province: Province,
    income: &str,
    output: OutputFormat,
) -> Result<Report> {
    let mut state = TaxEstimatorState::new(tables, province);
    state.set_income(income);

    state.calculate();
    let Some(estimate) = state.result() else {
        return Ok(Report::NoResult(no_result_reason(state.rejection())));
    };
    let marginal_rate = TaxEstimator::new(tables).marginal_rate(estimate.income, province);

    let rendered = match output {
        OutputFormat::Text => format::render_estimate(estimate, marginal_rate),
        OutputFormat::Json => to_json(&EstimateReport {
            estimate,
            marginal_rate,
        })?,
    };
    Ok(Report::Rendered(rendered))
}

fn no_result_reason(rejection: Option<&str>) -> String {
    rejection.unwrap_or("no result produced").to_string()
}

pub fn run_batch(
    tables: &RateTables,
    path: &Path,
    output: OutputFormat,
) -> Result<String> {
    let rows = batch::load_from_file(path)
        .with_context(|| format!("failed to load batch file {}", path.display()))?;
    let outcomes = batch::estimate_rows(tables, &rows);
    let rejected = outcomes
        .iter()
        .filter(|o| matches!(o, BatchOutcome::Rejected { .. }))
        .count();
    info!(rows = outcomes.len(), rejected, "batch estimated");

    match output {
        OutputFormat::Json => to_json(&outcomes),
        OutputFormat::Text => {
            let estimator = TaxEstimator::new(tables);
            let mut out = String::new();
            for outcome in &outcomes {
                match outcome {
                    BatchOutcome::Estimated { row, estimate } => {
                        let marginal = estimator.marginal_rate(estimate.income, estimate.province);
                        out.push_str(&format!("Row {row}\n"));
                        out.push_str(&format::render_estimate(estimate, marginal));
                        out.push('\n');
                    }
                    BatchOutcome::Rejected { row, reason } => {
                        out.push_str(&format!("Row {row}: skipped ({reason})\n\n"));
                    }
                }
            }
            out.push_str(&format!(
                "{} row(s) estimated, {} skipped\n",
                outcomes.len() - rejected,
                rejected
            ));
            Ok(out)
        }
    }
}

// --- project ---

/// Text overrides for the projection form; `None` keeps the configured default.
#[derive(Debug, Clone, Default)]
pub struct ProjectionArgs {
    pub annual_contribution: Option<String>,
    pub years: Option<String>,
    pub annual_return_rate: Option<String>,
    pub current_tax_rate: Option<String>,
    pub retirement_tax_rate: Option<String>,
}

pub fn run_projection(
    defaults: &ProjectionDefaults,
    args: ProjectionArgs,
    output: OutputFormat,
) -> Result<Report> {
    let state = ProjectionState::from_fields(
        args.annual_contribution
            .unwrap_or_else(|| defaults.annual_contribution.to_string()),
        args.years.unwrap_or_else(|| defaults.years.to_string()),
        args.annual_return_rate
            .unwrap_or_else(|| defaults.annual_return_rate.to_string()),
        args.current_tax_rate
            .unwrap_or_else(|| defaults.current_tax_rate.to_string()),
        args.retirement_tax_rate
            .unwrap_or_else(|| defaults.retirement_tax_rate.to_string()),
    );

    let Some(series) = state.series() else {
        return Ok(Report::NoResult(no_result_reason(state.rejection())));
    };

    let rendered = match output {
        OutputFormat::Text => format::render_projection(series),
        OutputFormat::Json => to_json(series)?,
    };
    Ok(Report::Rendered(rendered))
}

// --- reference tables ---

pub fn run_brackets(
    tables: &RateTables,
    province: Option<Province>,
    output: OutputFormat,
) -> Result<String> {
    let provinces = match province {
        Some(p) => vec![p],
        None => tables.provinces(),
    };
    let selected: Vec<(Province, &BracketTable)> = provinces
        .into_iter()
        .filter_map(|p| tables.provincial(p).map(|t| (p, t)))
        .collect();
    if let Some(p) = province {
        if selected.is_empty() {
            anyhow::bail!("no tax brackets loaded for {p}");
        }
    }

    match output {
        OutputFormat::Json => {
            let provinces: BTreeMap<&str, &BracketTable> =
                selected.iter().map(|(p, t)| (p.as_str(), *t)).collect();
            to_json(&serde_json::json!({
                "tax_year": TAX_YEAR,
                "federal": tables.federal(),
                "provinces": provinces,
            }))
        }
        OutputFormat::Text => {
            let mut out = format::render_brackets(
                &format!("Federal Tax Brackets ({TAX_YEAR})"),
                tables.federal(),
            );
            for (p, table) in selected {
                out.push('\n');
                out.push_str(&format::render_brackets(
                    &format!("{} Tax Brackets ({TAX_YEAR})", p.label()),
                    table,
                ));
            }
            Ok(out)
        }
    }
}

pub fn run_limits(output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => to_json(&serde_json::json!({
            "tfsa": tfsa_limits(),
            "tfsa_cumulative_room": cumulative_tfsa_room(TAX_YEAR),
            "rrsp": rrsp_limits(),
            "rrsp_note": RRSP_LIMIT_NOTE,
        })),
        OutputFormat::Text => {
            let mut out = format::render_limits("TFSA Annual Limits", tfsa_limits(), None);
            out.push_str(&format!(
                "  Cumulative room since 2009 ({TAX_YEAR}): {}\n\n",
                format::format_currency(cumulative_tfsa_room(TAX_YEAR))
            ));
            out.push_str(&format::render_limits(
                "RRSP Maximum Contributions",
                rrsp_limits(),
                Some(RRSP_LIMIT_NOTE),
            ));
            Ok(out)
        }
    }
}

pub fn run_deadlines(output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => to_json(deadlines()),
        OutputFormat::Text => Ok(format::render_deadlines(deadlines())),
    }
}
