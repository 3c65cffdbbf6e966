use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forge_core::Province;
use tracing::debug;

use forge_cli::app::{self, OutputFormat, ProjectionArgs, Report};
use forge_cli::config::ForgeConfig;
use forge_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Canadian income tax estimates and RRSP vs TFSA projections.
#[derive(Debug, Parser)]
#[command(name = "forge", version, about)]
struct Cli {
    /// Configuration file. Defaults to `./forge.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Federal + provincial tax on one income, or on every row of a CSV file.
    Estimate {
        /// Two-letter province code; defaults to the configured province.
        #[arg(short, long, value_parser = parse_province)]
        province: Option<Province>,

        /// Annual income, e.g. `85000` or `$85,000`.
        #[arg(short, long, required_unless_present = "batch", conflicts_with = "batch")]
        income: Option<String>,

        /// CSV file with `province,income` rows.
        #[arg(long)]
        batch: Option<PathBuf>,
    },

    /// RRSP vs TFSA growth over time.
    Project {
        /// Annual after-tax contribution.
        #[arg(long)]
        contribution: Option<String>,

        /// Years to invest.
        #[arg(long)]
        years: Option<String>,

        /// Annual return, in percent.
        #[arg(long)]
        return_rate: Option<String>,

        /// Marginal tax rate today, in percent.
        #[arg(long)]
        current_rate: Option<String>,

        /// Expected tax rate in retirement, in percent.
        #[arg(long)]
        retirement_rate: Option<String>,
    },

    /// Federal and provincial bracket tables.
    Brackets {
        /// Only this province (the federal table is always shown).
        #[arg(short, long, value_parser = parse_province)]
        province: Option<Province>,
    },

    /// TFSA and RRSP contribution limits by year.
    Limits,

    /// Key filing and contribution deadlines.
    Deadlines,
}

fn parse_province(s: &str) -> Result<Province, String> {
    Province::parse(s).ok_or_else(|| {
        let codes: Vec<_> = Province::all().iter().map(Province::as_str).collect();
        format!("unknown province '{s}'; expected one of {}", codes.join(", "))
    })
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = ForgeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_logging(&config.logging, logging::verbosity(cli.verbose, cli.quiet))?;
    debug!(?cli, "starting");

    let output = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let report = match cli.command {
        Command::Estimate {
            province,
            income,
            batch,
        } => {
            let tables = app::load_tables(&config)?;
            match (batch, income) {
                (Some(path), _) => Report::Rendered(app::run_batch(&tables, &path, output)?),
                (None, Some(income)) => app::run_estimate(
                    &tables,
                    province.unwrap_or(config.estimator.province),
                    &income,
                    output,
                )?,
                (None, None) => anyhow::bail!("either --income or --batch is required"),
            }
        }
        Command::Project {
            contribution,
            years,
            return_rate,
            current_rate,
            retirement_rate,
        } => app::run_projection(
            &config.projection,
            ProjectionArgs {
                annual_contribution: contribution,
                years,
                annual_return_rate: return_rate,
                current_tax_rate: current_rate,
                retirement_tax_rate: retirement_rate,
            },
            output,
        )?,
        Command::Brackets { province } => {
            let tables = app::load_tables(&config)?;
            Report::Rendered(app::run_brackets(&tables, province, output)?)
        }
        Command::Limits => Report::Rendered(app::run_limits(output)?),
        Command::Deadlines => Report::Rendered(app::run_deadlines(output)?),
    };

    match report {
        Report::Rendered(text) => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
            Ok(ExitCode::SUCCESS)
        }
        Report::NoResult(reason) => {
            eprintln!("forge: {reason}");
            Ok(ExitCode::from(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn province_flag_is_case_insensitive() {
        let cli = Cli::try_parse_from(["forge", "estimate", "-p", "bc", "-i", "85000"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::Estimate {
                province: Some(Province::BritishColumbia),
                ..
            }
        ));
    }

    #[test]
    fn estimate_needs_income_or_batch() {
        assert!(Cli::try_parse_from(["forge", "estimate"]).is_err());
        assert!(Cli::try_parse_from(["forge", "estimate", "--batch", "in.csv"]).is_ok());
    }

    #[test]
    fn unknown_province_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["forge", "brackets", "--province", "YT"]).is_err());
    }
}
