use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use forge_core::Province;
use forge_data::RateTableLoader;

/// Validate a rate table CSV file and summarise what it contains.
///
/// The CSV file should have the following columns:
/// - jurisdiction: `FED` or a province code (ON, BC, AB, ...)
/// - min_income: the lower bound of the bracket
/// - max_income: the upper bound (empty for the top bracket)
/// - rate: the marginal rate as a fraction (e.g. 0.205)
#[derive(Parser, Debug)]
#[command(name = "rate-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing rate tables
    #[arg(short, long)]
    file: PathBuf,

    /// Fail if any province is missing a table
    #[arg(long, default_value_t = false)]
    require_all: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tables = RateTableLoader::load_file(&args.file)
        .with_context(|| format!("Invalid rate tables in: {}", args.file.display()))?;

    println!("Federal: {} brackets", tables.federal().len());
    for province in tables.provinces() {
        if let Some(table) = tables.provincial(province) {
            println!("{} ({}): {} brackets", province, province.label(), table.len());
        }
    }

    let missing: Vec<_> = Province::all()
        .iter()
        .filter(|p| tables.provincial(**p).is_none())
        .map(|p| p.as_str())
        .collect();

    if !missing.is_empty() {
        println!("Missing provinces: {}", missing.join(", "));
        if args.require_all {
            anyhow::bail!("{} province(s) have no table", missing.len());
        }
    }

    println!("{} is valid.", args.file.display());
    Ok(())
}
