//! Independent engines keyed by (symbol, timeframe).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigError, LorentzianConfig};
use crate::domain::{Bar, PositionState, Symbol};

use super::{BarResult, Engine, EngineError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamKey {
    pub symbol: Symbol,
    pub timeframe: String,
}

impl StreamKey {
    pub fn new(symbol: impl Into<Symbol>, timeframe: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
        }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.timeframe)
    }
}

/// One engine per stream, created on first use from a shared configuration.
///
/// No state crosses streams. A set has a single owner; run separate sets (or
/// engines) on separate threads for parallelism.
#[derive(Debug)]
pub struct EngineSet {
    config: LorentzianConfig,
    engines: HashMap<StreamKey, Engine>,
}

impl EngineSet {
    pub fn new(config: LorentzianConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            engines: HashMap::new(),
        })
    }

    pub fn config(&self) -> &LorentzianConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn get(&self, key: &StreamKey) -> Option<&Engine> {
        self.engines.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StreamKey> {
        self.engines.keys()
    }

    /// Feed one bar to the stream's engine, creating it if absent.
    pub fn process(
        &mut self,
        key: &StreamKey,
        bar: &Bar,
        position: PositionState,
    ) -> Result<BarResult, EngineError> {
        let config = &self.config;
        let engine = self.engines.entry(key.clone()).or_insert_with(|| {
            debug!(stream = %key, "creating engine");
            Engine::from_validated(config.clone())
        });
        engine.process_bar(bar, position).map_err(|e| {
            warn!(stream = %key, error = %e, "bar rejected");
            e
        })
    }

    /// Discard one stream's state. Returns false if the stream was unknown.
    pub fn reset(&mut self, key: &StreamKey) -> bool {
        match self.engines.get_mut(key) {
            Some(engine) => {
                engine.reset();
                true
            }
            None => false,
        }
    }

    /// Drop one stream's engine entirely.
    pub fn remove(&mut self, key: &StreamKey) -> Option<Engine> {
        self.engines.remove(key)
    }
}
