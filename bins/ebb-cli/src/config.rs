//! Preview configuration for the Ebb CLI.
//!
//! [`PreviewConfig`] carries everything the engine would otherwise pull from
//! the remote service: the consensus snapshot, the rate curve, the emission
//! schedule and the pool balances. It is read from a TOML or JSON file and
//! layered with `EBB_*` environment overrides (nested keys use `__`, e.g.
//! `EBB_EMISSION__BORROWERS_SHARE=0.4`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use ebb_core::constants::{
    nanos_to_secs, DEFAULT_BORROWERS_SHARE, DEFAULT_COMPOUNDING_PERIODS,
    DEFAULT_CONSENSUS_HALF_LIFE_SECS, DEFAULT_EMISSION_HALF_LIFE_SECS, DEFAULT_EMISSION_TOTAL,
};
use ebb_core::error::EbbError;
use ebb_core::traits::{ParameterProvider, SnapshotProvider};
use ebb_core::types::{
    ConsensusSnapshot, DecayedAggregate, EmissionParameters, RateCurvePoint, UtilizationState,
};
use ebb_yield::rate_curve::{BelowRangePolicy, RateCurve};
use serde::{Deserialize, Serialize};

/// Consensus inputs as they appear in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Decay clock genesis, in seconds since the epoch; `None` starts the
    /// clock at the snapshot instant.
    pub genesis_time_secs: Option<f64>,
    pub half_life_secs: f64,
    pub yes_accumulator: f64,
    pub no_accumulator: f64,
    /// Raw locked amounts, in sub-units.
    pub total_yes: u64,
    pub total_no: u64,
    /// When the snapshot was taken; `None` means "now".
    pub taken_at_ns: Option<u64>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            genesis_time_secs: None,
            half_life_secs: DEFAULT_CONSENSUS_HALF_LIFE_SECS,
            yes_accumulator: 0.0,
            no_accumulator: 0.0,
            total_yes: 0,
            total_no: 0,
            taken_at_ns: None,
        }
    }
}

/// Reward-mining schedule as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    /// Total amount ever emitted, in sub-units.
    pub total_amount: u64,
    pub half_life_secs: f64,
    pub borrowers_share: f64,
    /// Emission start, in seconds since the epoch.
    pub start_time_secs: f64,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            total_amount: u64::try_from(DEFAULT_EMISSION_TOTAL).unwrap_or(u64::MAX),
            half_life_secs: DEFAULT_EMISSION_HALF_LIFE_SECS,
            borrowers_share: DEFAULT_BORROWERS_SHARE,
            start_time_secs: 0.0,
        }
    }
}

/// Raw pool balances, in sub-units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub raw_supplied: u64,
    pub raw_borrowed: u64,
}

impl PoolConfig {
    pub fn utilization(&self) -> UtilizationState {
        UtilizationState::from_raw(self.raw_supplied as f64, self.raw_borrowed as f64)
    }
}

/// Everything a preview run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub snapshot: SnapshotConfig,
    /// Refuse snapshots older than this many seconds; unset disables the check.
    pub max_snapshot_age_secs: Option<u64>,
    pub rate_curve: Vec<RateCurvePoint>,
    pub below_range: BelowRangePolicy,
    /// Share of borrower interest kept by the protocol.
    pub reserve_factor: f64,
    pub pool: PoolConfig,
    pub emission: EmissionConfig,
    pub compounding_periods: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            snapshot: SnapshotConfig::default(),
            max_snapshot_age_secs: None,
            rate_curve: vec![
                RateCurvePoint::new(0.0, 0.02),
                RateCurvePoint::new(0.8, 0.04),
                RateCurvePoint::new(1.0, 0.30),
            ],
            below_range: BelowRangePolicy::default(),
            reserve_factor: 0.1,
            pool: PoolConfig::default(),
            emission: EmissionConfig::default(),
            compounding_periods: DEFAULT_COMPOUNDING_PERIODS,
        }
    }
}

impl PreviewConfig {
    /// Default config location: `<config dir>/ebb/preview.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ebb")
            .join("preview.toml")
    }

    /// Load `path` (if it exists) layered under `EBB_*` environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("EBB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Validated rate curve with the configured below-range policy.
    pub fn curve(&self) -> Result<RateCurve, EbbError> {
        Ok(RateCurve::new(self.rate_curve.clone())?.with_below_range(self.below_range))
    }

    pub fn max_snapshot_age(&self) -> Option<std::time::Duration> {
        self.max_snapshot_age_secs.map(std::time::Duration::from_secs)
    }
}

/// Serves a [`PreviewConfig`] through the engine's provider traits.
pub struct ConfigProvider<'a> {
    config: &'a PreviewConfig,
    now_ns: u64,
}

impl<'a> ConfigProvider<'a> {
    pub fn new(config: &'a PreviewConfig, now_ns: u64) -> Self {
        Self { config, now_ns }
    }
}

impl SnapshotProvider for ConfigProvider<'_> {
    fn consensus_snapshot(&self) -> Result<ConsensusSnapshot, EbbError> {
        let s = &self.config.snapshot;
        let taken_at = s.taken_at_ns.unwrap_or(self.now_ns);
        Ok(ConsensusSnapshot {
            aggregate: DecayedAggregate {
                total_yes: u128::from(s.total_yes),
                total_no: u128::from(s.total_no),
                current_yes: s.yes_accumulator,
                current_no: s.no_accumulator,
            },
            genesis_time: s
                .genesis_time_secs
                .unwrap_or_else(|| nanos_to_secs(taken_at)),
            half_life: s.half_life_secs,
            taken_at,
        })
    }

    fn now_nanos(&self) -> u64 {
        self.now_ns
    }
}

impl ParameterProvider for ConfigProvider<'_> {
    fn rate_curve(&self) -> Result<Vec<RateCurvePoint>, EbbError> {
        Ok(self.config.rate_curve.clone())
    }

    fn emission_parameters(&self) -> Result<EmissionParameters, EbbError> {
        let e = &self.config.emission;
        Ok(EmissionParameters {
            total_amount: u128::from(e.total_amount),
            half_life_seconds: e.half_life_secs,
            borrowers_share: e.borrowers_share,
        })
    }

    fn compounding_periods(&self) -> f64 {
        self.config.compounding_periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(ext: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(ext)
            .tempfile()
            .unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_uses_protocol_constants() {
        let cfg = PreviewConfig::default();
        assert_eq!(cfg.snapshot.half_life_secs, DEFAULT_CONSENSUS_HALF_LIFE_SECS);
        assert_eq!(cfg.emission.half_life_secs, DEFAULT_EMISSION_HALF_LIFE_SECS);
        assert_eq!(cfg.compounding_periods, DEFAULT_COMPOUNDING_PERIODS);
        assert_eq!(cfg.below_range, BelowRangePolicy::Zero);
        assert!(cfg.curve().is_ok());
    }

    #[test]
    fn default_path_ends_with_preview_toml() {
        let path = PreviewConfig::default_path();
        assert!(path.ends_with("ebb/preview.toml"), "{path:?}");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PreviewConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.rate_curve, PreviewConfig::default().rate_curve);
        assert_eq!(cfg.emission, EmissionConfig::default());
    }

    #[test]
    fn loads_toml_with_partial_sections() {
        let file = write_config(
            ".toml",
            r#"
reserve_factor = 0.2
below_range = "clamp"
max_snapshot_age_secs = 30

[snapshot]
yes_accumulator = 300.0
no_accumulator = 700.0
total_yes = 300
total_no = 700

[emission]
borrowers_share = 0.25

[[rate_curve]]
utilization = 0.1
rate = 0.01

[[rate_curve]]
utilization = 0.9
rate = 0.2
"#,
        );

        let cfg = PreviewConfig::load(file.path()).unwrap();
        assert_eq!(cfg.reserve_factor, 0.2);
        assert_eq!(cfg.below_range, BelowRangePolicy::Clamp);
        assert_eq!(cfg.max_snapshot_age(), Some(std::time::Duration::from_secs(30)));
        assert_eq!(cfg.snapshot.total_no, 700);
        assert_eq!(cfg.snapshot.half_life_secs, DEFAULT_CONSENSUS_HALF_LIFE_SECS);
        assert_eq!(cfg.emission.borrowers_share, 0.25);
        assert_eq!(cfg.emission.half_life_secs, DEFAULT_EMISSION_HALF_LIFE_SECS);
        assert_eq!(cfg.rate_curve.len(), 2);
        assert_eq!(cfg.curve().unwrap().rate_at(0.05), 0.01);
    }

    #[test]
    fn loads_json() {
        let file = write_config(".json", r#"{ "pool": { "raw_supplied": 1000, "raw_borrowed": 400 } }"#);
        let cfg = PreviewConfig::load(file.path()).unwrap();
        assert_eq!(cfg.pool.utilization().ratio, 0.4);
    }

    #[test]
    fn unsorted_curve_fails_validation() {
        let cfg = PreviewConfig {
            rate_curve: vec![RateCurvePoint::new(0.9, 0.2), RateCurvePoint::new(0.1, 0.01)],
            ..PreviewConfig::default()
        };
        assert!(cfg.curve().is_err());
    }

    #[test]
    fn provider_fills_snapshot_time_with_now() {
        let cfg = PreviewConfig::default();
        let provider = ConfigProvider::new(&cfg, 1_234);
        assert_eq!(provider.now_nanos(), 1_234);
        assert_eq!(provider.consensus_snapshot().unwrap().taken_at, 1_234);

        let cfg = PreviewConfig {
            snapshot: SnapshotConfig {
                taken_at_ns: Some(1_000),
                ..SnapshotConfig::default()
            },
            ..PreviewConfig::default()
        };
        let provider = ConfigProvider::new(&cfg, 1_234);
        assert_eq!(provider.consensus_snapshot().unwrap().taken_at, 1_000);
    }

    #[test]
    fn genesis_defaults_to_snapshot_instant() {
        let cfg = PreviewConfig::default();
        let provider = ConfigProvider::new(&cfg, 30 * 1_000_000_000);
        assert_eq!(provider.consensus_snapshot().unwrap().genesis_time, 30.0);

        let cfg = PreviewConfig {
            snapshot: SnapshotConfig {
                genesis_time_secs: Some(5.0),
                ..SnapshotConfig::default()
            },
            ..PreviewConfig::default()
        };
        let provider = ConfigProvider::new(&cfg, 30 * 1_000_000_000);
        assert_eq!(provider.consensus_snapshot().unwrap().genesis_time, 5.0);
    }

    #[test]
    fn provider_widens_amounts() {
        let cfg = PreviewConfig::default();
        let provider = ConfigProvider::new(&cfg, 0);
        let params = provider.emission_parameters().unwrap();
        assert_eq!(params.total_amount, DEFAULT_EMISSION_TOTAL);
        assert_eq!(provider.compounding_periods(), DEFAULT_COMPOUNDING_PERIODS);
    }
}
