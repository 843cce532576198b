use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fee_core::{CalculationInput, CalculationResult, FeeEngine, RateSchedule, ServiceCategory};
use fee_data::{RateScheduleLoader, default_schedule};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive service fee calculator.
///
/// Splits the base amount across the rate brackets of the chosen service
/// category, sums the marginal fees, and applies the discount percent.
///
/// The rate schedule CSV (when given) has the columns:
/// - category: service category code (goods, services, works)
/// - upper_bound: exclusive upper edge of the bracket (empty for unbounded)
/// - label: display label for the bracket
/// - rate: marginal rate in percent (e.g. 1.50)
#[derive(Parser, Debug)]
#[command(name = "fee-calc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Service category code (goods, services, works)
    #[arg(short, long, required_unless_present = "list_categories")]
    category: Option<String>,

    /// Base amount in the schedule's monetary unit
    #[arg(short, long, required_unless_present = "list_categories", allow_hyphen_values = true)]
    amount: Option<String>,

    /// Payable share of the fee in percent; invalid or negative values mean no discount
    #[arg(short, long, default_value = "100", allow_hyphen_values = true)]
    discount: String,

    /// Rate schedule CSV file (defaults to the bundled schedule)
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Print the categories the active schedule defines and exit
    #[arg(long, default_value_t = false)]
    list_categories: bool,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── schedule ────────────────────────────────────────────────────────────────

fn load_schedule(path: Option<&PathBuf>) -> Result<RateSchedule> {
    match path {
        Some(path) => {
            debug!("loading rate schedule from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            RateScheduleLoader::load(file)
                .with_context(|| format!("Failed to load rate schedule: {}", path.display()))
        }
        None => default_schedule().context("Failed to load bundled rate schedule"),
    }
}

// ─── output ──────────────────────────────────────────────────────────────────

fn print_result(result: &CalculationResult) {
    println!("Category:       {}", result.category.label());
    println!("Base amount:    {}", result.base_amount.normalize());
    println!();
    println!("{:<14} {:>8} {:>20} {:>16}", "Bracket", "Rate %", "Amount", "Fee");
    for line in &result.breakdown {
        println!(
            "{:<14} {:>8} {:>20} {:>16}",
            line.bracket_label,
            line.rate_applied.normalize(),
            line.amount_in_bracket.normalize(),
            line.fee_for_bracket.normalize(),
        );
    }
    println!();
    println!("Original fee:   {}", result.original_fee.normalize());
    println!("Discount:       {}%", result.discount_percent.normalize());
    println!("Discounted fee: {}", result.discounted_fee.normalize());
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let schedule = load_schedule(args.schedule.as_ref())?;

    if args.list_categories {
        for category in schedule.categories() {
            println!("{}\t{}", category.as_str(), category.label());
        }
        return Ok(());
    }

    let category: ServiceCategory = args
        .category
        .as_deref()
        .unwrap_or_default()
        .parse()
        .context("Failed to read --category")?;
    let input =
        CalculationInput::from_text(category, args.amount.as_deref().unwrap_or_default(), &args.discount);

    let result = FeeEngine::new(&schedule)
        .calculate(&input)
        .context("Failed to calculate fee")?;

    debug!(brackets = result.breakdown.len(), "calculated {} fee", result.category);
    print_result(&result);

    Ok(())
}
