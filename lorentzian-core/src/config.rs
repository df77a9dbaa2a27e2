//! Serializable engine configuration.
//!
//! Every recognized option is an explicit field with a default matching the
//! reference indicator settings. Configuration is immutable once an engine is
//! built from it; loading it from disk is the caller's job.

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most feature slots the classifier supports.
pub const MAX_FEATURES: usize = 5;
/// Upper bound for every length-like setting (periods, lookbacks, counts).
pub const MAX_PERIOD: usize = 10_000;
/// Fewest feature slots the classifier supports.
pub const MIN_FEATURES: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Price used as the kernel source and for training labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    Hl2,
    Hlc3,
    Ohlc4,
}

impl PriceSource {
    pub fn value(self, bar: &Bar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
            Self::Hl2 => bar.hl2(),
            Self::Hlc3 => bar.hlc3(),
            Self::Ohlc4 => bar.ohlc4(),
        }
    }
}

/// Indicator family behind a feature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureKind {
    Rsi,
    Wt,
    Cci,
    Adx,
}

/// One feature slot: indicator kind plus its two parameters.
///
/// `param_a` is the indicator period; `param_b` is the smoothing period
/// (RSI, CCI) or the WaveTrend average period. ADX ignores `param_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub kind: FeatureKind,
    pub param_a: usize,
    pub param_b: usize,
}

impl FeatureSpec {
    pub const fn new(kind: FeatureKind, param_a: usize, param_b: usize) -> Self {
        Self {
            kind,
            param_a,
            param_b,
        }
    }
}

/// Reference feature set: RSI(14,1), WT(10,11), CCI(20,1), ADX(20,2), RSI(9,1).
pub fn default_features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new(FeatureKind::Rsi, 14, 1),
        FeatureSpec::new(FeatureKind::Wt, 10, 11),
        FeatureSpec::new(FeatureKind::Cci, 20, 1),
        FeatureSpec::new(FeatureKind::Adx, 20, 2),
        FeatureSpec::new(FeatureKind::Rsi, 9, 1),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityFilterConfig {
    pub enabled: bool,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for VolatilityFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_length: 1,
            max_length: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeFilterConfig {
    pub enabled: bool,
    pub threshold: f64,
}

impl Default for RegimeFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: -0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxFilterConfig {
    pub enabled: bool,
    pub period: usize,
    pub threshold: f64,
}

impl Default for AdxFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 14,
            threshold: 20.0,
        }
    }
}

/// Moving-average trend confirmation for entries (close vs MA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendFilterConfig {
    pub enabled: bool,
    pub period: usize,
}

impl Default for TrendFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 200,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub volatility: VolatilityFilterConfig,
    pub regime: RegimeFilterConfig,
    pub adx: AdxFilterConfig,
    pub ema: TrendFilterConfig,
    pub sma: TrendFilterConfig,
}

/// How the kernel estimator reports trend and exit alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelMode {
    /// Trend = slope of the rational quadratic estimate.
    #[default]
    Rate,
    /// Trend = position of the gaussian line relative to the estimate,
    /// alerts on their crossovers.
    Crossover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub enabled: bool,
    pub mode: KernelMode,
    /// Bandwidth `h` of the rational quadratic kernel.
    pub lookback: usize,
    /// Relative weighting `r` of time frames.
    pub relative_weight: f64,
    /// Bar offset where the regression window ends.
    pub regression_level: usize,
    /// Bandwidth reduction for the gaussian companion line.
    pub lag: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: KernelMode::Rate,
            lookback: 8,
            relative_weight: 8.0,
            regression_level: 25,
            lag: 2,
        }
    }
}

/// Exit rule used by the signal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitMode {
    /// Fixed holding period, or an early flip into the opposite signal.
    #[default]
    Strict,
    /// Kernel slope reversal against the held direction.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorentzianConfig {
    pub source: PriceSource,
    pub neighbors_count: usize,
    pub max_bars_back: usize,
    pub hold_bars: usize,
    pub exit_mode: ExitMode,
    pub features: Vec<FeatureSpec>,
    pub filters: FilterConfig,
    pub kernel: KernelConfig,
}

impl Default for LorentzianConfig {
    fn default() -> Self {
        Self {
            source: PriceSource::Close,
            neighbors_count: 8,
            max_bars_back: 2000,
            hold_bars: 4,
            exit_mode: ExitMode::Strict,
            features: default_features(),
            filters: FilterConfig::default(),
            kernel: KernelConfig::default(),
        }
    }
}

impl LorentzianConfig {
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Dynamic exits only apply when no MA filter gates entries and the
    /// kernel runs in rate mode; otherwise strict exits are used.
    pub fn dynamic_exits_active(&self) -> bool {
        self.exit_mode == ExitMode::Dynamic
            && !self.filters.ema.enabled
            && !self.filters.sma.enabled
            && self.kernel.mode == KernelMode::Rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(MIN_FEATURES..=MAX_FEATURES).contains(&self.features.len()) {
            return invalid(format!(
                "feature count must be in {MIN_FEATURES}..={MAX_FEATURES}, got {}",
                self.features.len()
            ));
        }
        for (slot, spec) in self.features.iter().enumerate() {
            if spec.param_a == 0 {
                return invalid(format!("feature {} param_a must be >= 1", slot + 1));
            }
            if spec.param_b == 0 && spec.kind != FeatureKind::Adx {
                return invalid(format!("feature {} param_b must be >= 1", slot + 1));
            }
            if spec.param_a > MAX_PERIOD || spec.param_b > MAX_PERIOD {
                return invalid(format!(
                    "feature {} params must be <= {MAX_PERIOD}",
                    slot + 1
                ));
            }
        }
        if self.neighbors_count == 0 {
            return invalid("neighbors_count must be >= 1".into());
        }
        if self.max_bars_back == 0 {
            return invalid("max_bars_back must be >= 1".into());
        }
        if self.hold_bars == 0 {
            return invalid("hold_bars must be >= 1".into());
        }

        let f = &self.filters;
        if f.volatility.min_length == 0 || f.volatility.max_length == 0 {
            return invalid("volatility filter lengths must be >= 1".into());
        }
        if !f.regime.threshold.is_finite() || !f.adx.threshold.is_finite() {
            return invalid("filter thresholds must be finite".into());
        }
        if f.adx.period == 0 || f.ema.period == 0 || f.sma.period == 0 {
            return invalid("filter periods must be >= 1".into());
        }

        let k = &self.kernel;
        let lengths = [
            ("neighbors_count", self.neighbors_count),
            ("hold_bars", self.hold_bars),
            ("filters.volatility.min_length", f.volatility.min_length),
            ("filters.volatility.max_length", f.volatility.max_length),
            ("filters.adx.period", f.adx.period),
            ("filters.ema.period", f.ema.period),
            ("filters.sma.period", f.sma.period),
            ("kernel.lookback", k.lookback),
            ("kernel.regression_level", k.regression_level),
        ];
        if let Some((name, value)) = lengths.iter().find(|(_, v)| *v > MAX_PERIOD) {
            return invalid(format!("{name} must be <= {MAX_PERIOD}, got {value}"));
        }

        if k.lookback <= k.lag {
            return invalid(format!(
                "kernel lookback ({}) must exceed lag ({})",
                k.lookback, k.lag
            ));
        }
        if !(k.relative_weight.is_finite() && k.relative_weight > 0.0) {
            return invalid("kernel relative_weight must be a positive number".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LorentzianConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.feature_count(), 5);
        assert_eq!(config.neighbors_count, 8);
        assert_eq!(config.max_bars_back, 2000);
    }

    #[test]
    fn toml_roundtrip() {
        let config = LorentzianConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = LorentzianConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_toml_takes_defaults() {
        let parsed = LorentzianConfig::from_toml_str(
            r#"
            neighbors_count = 4
            max_bars_back = 100

            [filters.adx]
            enabled = true

            [kernel]
            mode = "crossover"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.neighbors_count, 4);
        assert!(parsed.filters.adx.enabled);
        assert_eq!(parsed.filters.adx.threshold, 20.0);
        assert_eq!(parsed.kernel.mode, KernelMode::Crossover);
        assert_eq!(parsed.kernel.lookback, 8);
        assert_eq!(parsed.features, default_features());
    }

    #[test]
    fn explicit_features_parse() {
        let parsed = LorentzianConfig::from_toml_str(
            r#"
            [[features]]
            kind = "RSI"
            param_a = 14
            param_b = 1

            [[features]]
            kind = "ADX"
            param_a = 20
            param_b = 0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.feature_count(), 2);
        assert_eq!(parsed.features[1].kind, FeatureKind::Adx);
    }

    #[test]
    fn rejects_oversized_lengths() {
        let mut config = LorentzianConfig::default();
        config.filters.sma.period = 1 << 60;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("filters.sma.period"));

        let mut config = LorentzianConfig::default();
        config.kernel.regression_level = usize::MAX;
        assert!(config.validate().is_err());

        let mut config = LorentzianConfig::default();
        config.features[0].param_a = MAX_PERIOD + 1;
        assert!(config.validate().is_err());

        let mut config = LorentzianConfig::default();
        config.hold_bars = MAX_PERIOD;
        config.filters.ema.period = MAX_PERIOD;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_feature_count() {
        let mut config = LorentzianConfig::default();
        config.features.truncate(1);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = LorentzianConfig::default();
        config.features.push(FeatureSpec::new(FeatureKind::Cci, 5, 1));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_neighbors_and_bad_kernel() {
        let mut config = LorentzianConfig::default();
        config.neighbors_count = 0;
        assert!(config.validate().is_err());

        let mut config = LorentzianConfig::default();
        config.kernel.lag = 8;
        assert!(config.validate().is_err());

        let mut config = LorentzianConfig::default();
        config.kernel.relative_weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unparseable_toml() {
        let err = LorentzianConfig::from_toml_str("neighbors_count = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn dynamic_exits_require_plain_kernel() {
        let mut config = LorentzianConfig::default();
        config.exit_mode = ExitMode::Dynamic;
        assert!(config.dynamic_exits_active());
        config.filters.ema.enabled = true;
        assert!(!config.dynamic_exits_active());
        config.filters.ema.enabled = false;
        config.kernel.mode = KernelMode::Crossover;
        assert!(!config.dynamic_exits_active());
    }

    #[test]
    fn price_source_values() {
        let bar = Bar::new(10.0, 14.0, 8.0, 12.0, 0.0);
        assert_eq!(PriceSource::Close.value(&bar), 12.0);
        assert_eq!(PriceSource::Ohlc4.value(&bar), 11.0);
        assert_eq!(PriceSource::Hl2.value(&bar), 11.0);
    }
}
