//! Bar orchestrator: one engine per (symbol, timeframe) stream.
//!
//! Per accepted bar, in order:
//! 1. features computed from the bar
//! 2. classifier evaluated against matured history (warm bars only)
//! 3. the entry from `LABEL_HORIZON` bars ago matures into history
//! 4. filters, kernel, and the signal state machine advance
//!
//! A bar that fails validation is rejected before any state changes.

pub mod result;
pub mod set;
pub mod warmup;

pub use result::BarResult;
pub use set::{EngineSet, StreamKey};
pub use warmup::WarmupState;

use thiserror::Error;
use tracing::{debug, trace};

use crate::classifier::LorentzianClassifier;
use crate::components::{FilterPipeline, SignalInputs, SignalStateMachine};
use crate::config::{ConfigError, LorentzianConfig};
use crate::domain::{Bar, BarError, PositionState};
use crate::features::{FeaturePipeline, TrainingSet};
use crate::kernel::KernelEstimator;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid bar at index {bar_index}: {source}")]
    InvalidBar {
        bar_index: usize,
        #[source]
        source: BarError,
    },
}

#[derive(Debug)]
pub struct Engine {
    config: LorentzianConfig,
    features: FeaturePipeline,
    training: TrainingSet,
    classifier: LorentzianClassifier,
    filters: FilterPipeline,
    kernel: KernelEstimator,
    signal: SignalStateMachine,
    warmup: WarmupState,
}

impl Engine {
    pub fn new(config: LorentzianConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Build from a configuration that already passed `validate`.
    pub(crate) fn from_validated(config: LorentzianConfig) -> Self {
        Self {
            features: FeaturePipeline::new(config.features.clone()),
            training: TrainingSet::new(config.feature_count(), config.max_bars_back),
            classifier: LorentzianClassifier::new(config.neighbors_count, config.max_bars_back),
            filters: FilterPipeline::new(&config.filters),
            kernel: KernelEstimator::new(config.kernel.clone()),
            signal: SignalStateMachine::new(config.hold_bars, config.dynamic_exits_active()),
            warmup: WarmupState::new(config.max_bars_back),
            config,
        }
    }

    pub fn config(&self) -> &LorentzianConfig {
        &self.config
    }

    pub fn bars_processed(&self) -> usize {
        self.warmup.bars_processed()
    }

    /// Whether the next bar is past warmup.
    pub fn is_warm(&self) -> bool {
        self.warmup.is_warm()
    }

    /// Matured feature arrays and labels.
    pub fn training(&self) -> &TrainingSet {
        &self.training
    }

    pub fn kernel(&self) -> &KernelEstimator {
        &self.kernel
    }

    pub fn process_bar(
        &mut self,
        bar: &Bar,
        position: PositionState,
    ) -> Result<BarResult, EngineError> {
        let bar_index = self.warmup.bars_processed();
        bar.validate()
            .map_err(|source| EngineError::InvalidBar { bar_index, source })?;

        let warm = self.warmup.is_warm();
        let price = self.config.source.value(bar);

        let features = self.features.compute(bar);
        let prediction = if warm {
            self.classifier
                .predict(&features, self.training.arrays(), self.training.labels())
                .value
        } else {
            0
        };
        self.training.record(features.clone(), price);

        let filters = self.filters.update(bar);
        self.kernel.update(price);
        let kernel = self.kernel.snapshot();
        let kernel_bullish = self.kernel.is_bullish();
        let kernel_bearish = self.kernel.is_bearish();

        let events = self.signal.update(&SignalInputs {
            prediction,
            filters_pass: filters.report.all,
            trend: filters.trend(),
            kernel_bullish,
            kernel_bearish,
            bullish_alert: self.kernel.bullish_alert(),
            bearish_alert: self.kernel.bearish_alert(),
            position,
            warm,
        });

        if self.warmup.process_bar() {
            debug!(
                bars = self.warmup.bars_processed(),
                history = self.training.len(),
                "warmup complete"
            );
        }
        trace!(
            bar_index,
            prediction,
            signal = %events.signal,
            filters = filters.report.all,
            "bar processed"
        );

        Ok(BarResult {
            bar_index,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            features,
            prediction,
            signal: events.signal,
            start_long: events.start_long,
            start_short: events.start_short,
            end_long: events.end_long,
            end_short: events.end_short,
            filters: filters.report,
            early_signal_flip: events.early_signal_flip,
            prediction_strength: f64::from(prediction) / self.config.neighbors_count as f64,
            kernel_estimate: kernel.estimate,
            kernel_bullish,
            kernel_bearish,
        })
    }

    /// Discard all state; the configuration is kept.
    pub fn reset(&mut self) {
        *self = Self::from_validated(self.config.clone());
    }
}
