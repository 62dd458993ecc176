//! ebb-cli — Consensus cursor and yield previews from the command line.
//!
//! Loads a [`PreviewConfig`](config::PreviewConfig) standing in for the remote
//! service, runs one preview, and prints the result as JSON on stdout. Logs
//! go to stderr.

mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ebb_core::constants::{nanos_to_secs, TOKEN_UNIT};
use ebb_core::traits::{ConsensusCurve, ParameterProvider, SnapshotProvider};
use ebb_core::types::{Choice, CursorState, PositionIntent, UtilizationState};
use ebb_decay::{cursor_state_at, ConsensusEngine};
use ebb_yield::utilization::{pool_rates, preview_utilization};
use ebb_yield::{apr_to_apy, apy_to_apr, per_token_rate, preview_per_token_rate, EmissionSchedule};
use serde_json::json;
use tracing::{debug, info};

use crate::config::{ConfigProvider, PreviewConfig};

/// Ebb preview engine command-line interface.
#[derive(Parser)]
#[command(name = "ebb-cli")]
#[command(version, about = "Decay-weighted consensus and yield previews")]
struct Cli {
    /// Config file (default: <config dir>/ebb/preview.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current consensus cursor from the configured snapshot.
    Cursor,
    /// Project the cursor under a hypothetical position.
    Impact(ImpactArgs),
    /// Find the position that moves the cursor to a target.
    Solve(SolveArgs),
    /// Borrow and supply rates at the configured (or previewed) utilization.
    Rate(RateArgs),
    /// Reward-mining emission rates.
    Emission(EmissionArgs),
    /// Convert between APR and APY.
    Apy(ApyArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChoiceArg {
    Yes,
    No,
}

impl From<ChoiceArg> for Choice {
    fn from(c: ChoiceArg) -> Self {
        match c {
            ChoiceArg::Yes => Choice::Yes,
            ChoiceArg::No => Choice::No,
        }
    }
}

#[derive(Args)]
struct ImpactArgs {
    /// Side of the position.
    #[arg(long, value_enum)]
    choice: ChoiceArg,

    /// Amount in whole tokens.
    #[arg(long)]
    amount: f64,
}

#[derive(Args)]
struct SolveArgs {
    /// Target cursor; clamped to [0.001, 0.999].
    #[arg(long)]
    target: f64,
}

#[derive(Args)]
struct RateArgs {
    /// Read the curve at this utilization instead of the configured pool.
    #[arg(long, conflicts_with_all = ["supply_delta", "borrow_delta"])]
    utilization: Option<f64>,

    /// Preview an extra supply, in sub-units (negative to withdraw).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    supply_delta: f64,

    /// Preview an extra borrow, in sub-units (negative to repay).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    borrow_delta: f64,
}

#[derive(Args)]
struct EmissionArgs {
    /// Seconds since emission start (default: now).
    #[arg(long)]
    elapsed: Option<f64>,

    /// Preview an extra supply position, in sub-units.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    supply_delta: i64,

    /// Preview an extra borrow position, in sub-units.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    borrow_delta: i64,
}

#[derive(Args)]
struct ApyArgs {
    /// Nominal annual rate, e.g. 0.05 for 5%.
    #[arg(long, conflicts_with = "apy", required_unless_present = "apy")]
    apr: Option<f64>,

    /// Effective annual yield to convert back to APR.
    #[arg(long)]
    apy: Option<f64>,

    /// Compounding periods per year (default: from config).
    #[arg(long)]
    periods: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let path = cli.config.unwrap_or_else(PreviewConfig::default_path);
    let cfg = PreviewConfig::load(&path)?;
    debug!(path = %path.display(), "config loaded");

    let now_ns = now_nanos()?;
    let provider = ConfigProvider::new(&cfg, now_ns);

    let output = match cli.command {
        Commands::Cursor => cmd_cursor(&cfg, &provider)?,
        Commands::Impact(args) => cmd_impact(&cfg, &provider, args)?,
        Commands::Solve(args) => cmd_solve(&cfg, &provider, args)?,
        Commands::Rate(args) => cmd_rate(&cfg, &provider, args)?,
        Commands::Emission(args) => cmd_emission(&cfg, &provider, args)?,
        Commands::Apy(args) => cmd_apy(&provider, args)?,
        Commands::Config => serde_json::to_value(&cfg)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Current wall-clock time in nanoseconds since the epoch.
fn now_nanos() -> Result<u64> {
    let ns = chrono::Utc::now()
        .timestamp_nanos_opt()
        .context("System clock out of range")?;
    u64::try_from(ns).context("System clock before the epoch")
}

fn current_state(
    cfg: &PreviewConfig,
    provider: &ConfigProvider<'_>,
) -> Result<CursorState> {
    let snapshot = provider
        .consensus_snapshot()
        .context("Failed to read consensus snapshot")?;
    let state = cursor_state_at(&snapshot, provider.now_nanos(), cfg.max_snapshot_age())
        .context("Failed to compute cursor state")?;
    Ok(state)
}

fn cmd_cursor(cfg: &PreviewConfig, provider: &ConfigProvider<'_>) -> Result<serde_json::Value> {
    let snapshot = provider.consensus_snapshot()?;
    let state = current_state(cfg, provider)?;
    info!(cursor = ?state.cursor, total = state.total, "consensus cursor");
    Ok(json!({
        "state": state,
        "total_locked": snapshot.aggregate.total_locked().to_string(),
    }))
}

// Sub-unit amounts can exceed u64, which serde_json numbers cannot hold.
fn intent_json(intent: &PositionIntent) -> serde_json::Value {
    json!({ "choice": intent.choice, "amount": intent.amount.to_string() })
}

fn cmd_impact(
    cfg: &PreviewConfig,
    provider: &ConfigProvider<'_>,
    args: ImpactArgs,
) -> Result<serde_json::Value> {
    let intent = PositionIntent::from_float(args.choice.into(), args.amount * TOKEN_UNIT as f64)
        .context("Invalid amount")?;
    let state = current_state(cfg, provider)?;
    let projected = ConsensusEngine::new().simulate_impact(&state, &intent);
    Ok(json!({
        "intent": intent_json(&intent),
        "before": state,
        "after": projected,
    }))
}

fn cmd_solve(
    cfg: &PreviewConfig,
    provider: &ConfigProvider<'_>,
    args: SolveArgs,
) -> Result<serde_json::Value> {
    let state = current_state(cfg, provider)?;
    let (intent, projected) = ConsensusEngine::new()
        .preview_target(&state, args.target)
        .context("Failed to solve for target cursor")?;
    Ok(json!({
        "intent": intent_json(&intent),
        "amount_tokens": intent.amount as f64 / TOKEN_UNIT as f64,
        "projected": projected,
    }))
}

fn cmd_rate(
    cfg: &PreviewConfig,
    provider: &ConfigProvider<'_>,
    args: RateArgs,
) -> Result<serde_json::Value> {
    let curve = cfg.curve().context("Invalid rate curve")?;
    let periods = provider.compounding_periods();

    let pool = cfg.pool.utilization();
    let state = match args.utilization {
        Some(ratio) => UtilizationState { ratio, ..pool },
        None => preview_utilization(&pool, args.supply_delta, args.borrow_delta),
    };
    let rates = pool_rates(&state, &curve, cfg.reserve_factor);

    Ok(json!({
        "pool": state,
        "rates": rates,
        "borrow_apy": apr_to_apy(rates.borrow_rate, periods)?,
        "supply_apy": apr_to_apy(rates.supply_rate, periods)?,
    }))
}

fn cmd_emission(
    cfg: &PreviewConfig,
    provider: &ConfigProvider<'_>,
    args: EmissionArgs,
) -> Result<serde_json::Value> {
    let schedule = EmissionSchedule::new(provider.emission_parameters()?)
        .context("Invalid emission parameters")?;
    let t = args
        .elapsed
        .unwrap_or_else(|| nanos_to_secs(provider.now_nanos()) - cfg.emission.start_time_secs);
    if t < 0.0 {
        bail!("Emission has not started yet ({t:.0}s to go)");
    }

    let split = schedule.daily_split(t);
    let supplied = u128::from(cfg.pool.raw_supplied);
    let borrowed = u128::from(cfg.pool.raw_borrowed);

    Ok(json!({
        "elapsed_secs": t,
        "rate_per_day": schedule.rate_per_day(t),
        "split": split,
        "cumulative_emitted": schedule.cumulative_emitted(t),
        "per_token": {
            "supply": per_token_rate(split.supply, supplied),
            "borrow": per_token_rate(split.borrow, borrowed),
        },
        "preview_per_token": {
            "supply": preview_per_token_rate(split.supply, supplied, i128::from(args.supply_delta)),
            "borrow": preview_per_token_rate(split.borrow, borrowed, i128::from(args.borrow_delta)),
        },
    }))
}

fn cmd_apy(provider: &ConfigProvider<'_>, args: ApyArgs) -> Result<serde_json::Value> {
    let periods = args.periods.unwrap_or_else(|| provider.compounding_periods());
    match (args.apr, args.apy) {
        (Some(apr), _) => Ok(json!({ "apr": apr, "apy": apr_to_apy(apr, periods)?, "periods": periods })),
        (None, Some(apy)) => Ok(json!({ "apr": apy_to_apr(apy, periods)?, "apy": apy, "periods": periods })),
        (None, None) => bail!("Pass --apr or --apy"),
    }
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Both write to stderr so stdout stays
/// machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_deltas() {
        let cli = Cli::try_parse_from(["ebb-cli", "emission", "--supply-delta", "-500"]).unwrap();
        match cli.command {
            Commands::Emission(args) => assert_eq!(args.supply_delta, -500),
            _ => panic!("expected emission"),
        }
    }

    #[test]
    fn apy_requires_one_rate() {
        assert!(Cli::try_parse_from(["ebb-cli", "apy"]).is_err());
        assert!(Cli::try_parse_from(["ebb-cli", "apy", "--apr", "0.1", "--apy", "0.1"]).is_err());
    }

    fn seeded() -> PreviewConfig {
        let mut cfg = PreviewConfig::default();
        cfg.snapshot.yes_accumulator = 300.0 * TOKEN_UNIT as f64;
        cfg.snapshot.no_accumulator = 700.0 * TOKEN_UNIT as f64;
        cfg.pool.raw_supplied = 1_000 * TOKEN_UNIT as u64;
        cfg.pool.raw_borrowed = 400 * TOKEN_UNIT as u64;
        cfg
    }

    #[test]
    fn solve_reaches_target() {
        let cfg = seeded();
        let provider = ConfigProvider::new(&cfg, 0);
        let out = cmd_solve(&cfg, &provider, SolveArgs { target: 0.5 }).unwrap();
        assert_eq!(out["intent"]["choice"], "YES");
        let cursor = out["projected"]["cursor"].as_f64().unwrap();
        assert!((cursor - 0.5).abs() < 1e-6);
    }

    #[test]
    fn impact_moves_cursor() {
        let cfg = seeded();
        let provider = ConfigProvider::new(&cfg, 0);
        let args = ImpactArgs { choice: ChoiceArg::No, amount: 500.0 };
        let out = cmd_impact(&cfg, &provider, args).unwrap();
        let cursor = out["after"]["cursor"].as_f64().unwrap();
        assert!((cursor - 0.2).abs() < 1e-12);
    }

    #[test]
    fn impact_amount_beyond_u64_is_a_string() {
        let cfg = seeded();
        let provider = ConfigProvider::new(&cfg, 0);
        let args = ImpactArgs { choice: ChoiceArg::Yes, amount: 1.0e12 };
        let out = cmd_impact(&cfg, &provider, args).unwrap();
        assert_eq!(out["intent"]["amount"], "100000000000000000000");
        assert_eq!(out["intent"]["choice"], "YES");
    }

    #[test]
    fn solve_amount_beyond_u64_is_a_string() {
        let mut cfg = seeded();
        cfg.snapshot.yes_accumulator = 1.0e9 * TOKEN_UNIT as f64;
        cfg.snapshot.no_accumulator = 1.0e9 * TOKEN_UNIT as f64;
        let provider = ConfigProvider::new(&cfg, 0);
        let out = cmd_solve(&cfg, &provider, SolveArgs { target: 0.999 }).unwrap();
        let amount: u128 = out["intent"]["amount"].as_str().unwrap().parse().unwrap();
        assert!(amount > u64::MAX as u128, "amount {amount}");
        assert!(out["amount_tokens"].as_f64().unwrap() > 9.0e11);
    }

    #[test]
    fn stale_snapshot_is_reported() {
        let mut cfg = seeded();
        cfg.snapshot.taken_at_ns = Some(0);
        cfg.max_snapshot_age_secs = Some(10);
        let provider = ConfigProvider::new(&cfg, 60 * 1_000_000_000);
        assert!(cmd_cursor(&cfg, &provider).is_err());
    }

    #[test]
    fn emission_before_start_fails() {
        let mut cfg = seeded();
        cfg.emission.start_time_secs = 100.0;
        let provider = ConfigProvider::new(&cfg, 0);
        let args = EmissionArgs { elapsed: None, supply_delta: 0, borrow_delta: 0 };
        assert!(cmd_emission(&cfg, &provider, args).is_err());
    }

    #[test]
    fn rate_at_configured_pool() {
        let cfg = seeded();
        let provider = ConfigProvider::new(&cfg, 0);
        let args = RateArgs { utilization: None, supply_delta: 0.0, borrow_delta: 0.0 };
        let out = cmd_rate(&cfg, &provider, args).unwrap();
        let borrow = out["rates"]["borrow_rate"].as_f64().unwrap();
        assert!((borrow - 0.03).abs() < 1e-12);

        let args = RateArgs { utilization: Some(0.9), supply_delta: 0.0, borrow_delta: 0.0 };
        let out = cmd_rate(&cfg, &provider, args).unwrap();
        assert!((out["rates"]["borrow_rate"].as_f64().unwrap() - 0.17).abs() < 1e-12);
    }

    #[test]
    fn apy_converts_both_ways() {
        let cfg = PreviewConfig::default();
        let provider = ConfigProvider::new(&cfg, 0);
        let out = cmd_apy(&provider, ApyArgs { apr: Some(0.0), apy: None, periods: None }).unwrap();
        assert_eq!(out["apy"].as_f64().unwrap(), 0.0);
        let out = cmd_apy(&provider, ApyArgs { apr: None, apy: Some(0.0), periods: Some(12.0) }).unwrap();
        assert_eq!(out["apr"].as_f64().unwrap(), 0.0);
    }
}
