//! Drive one engine per stream and collect output records.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use lorentzian_core::{BarResult, ConfigError, Engine, LorentzianConfig, PositionState, StreamKey};

use crate::bars::Stream;

/// One JSONL line.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    pub symbol: String,
    pub timeframe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub result: BarResult,
}

#[derive(Debug, Clone)]
pub struct StreamReport {
    pub key: StreamKey,
    pub records: Vec<OutputRecord>,
    pub rejected: usize,
    pub entries: usize,
    pub exits: usize,
}

/// Position flag fed back to the engine, following its own entry/exit events.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionTracker {
    state: PositionState,
}

impl PositionTracker {
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Exits apply before entries, so an exit and a reversal on one bar end in the new side.
    pub fn apply(&mut self, result: &BarResult) {
        match self.state {
            PositionState::Long if result.end_long => self.state = PositionState::Flat,
            PositionState::Short if result.end_short => self.state = PositionState::Flat,
            _ => {}
        }
        if result.start_long {
            self.state = PositionState::Long;
        } else if result.start_short {
            self.state = PositionState::Short;
        }
    }
}

pub fn run_stream(config: &LorentzianConfig, stream: &Stream) -> Result<StreamReport, ConfigError> {
    let mut engine = Engine::new(config.clone())?;
    let mut position = PositionTracker::default();
    let mut report = StreamReport {
        key: stream.key.clone(),
        records: Vec::with_capacity(stream.bars.len()),
        rejected: 0,
        entries: 0,
        exits: 0,
    };

    for dated in &stream.bars {
        let result = match engine.process_bar(&dated.bar, position.state()) {
            Ok(result) => result,
            Err(e) => {
                warn!(stream = %stream.key, date = ?dated.date, error = %e, "skipping bar");
                report.rejected += 1;
                continue;
            }
        };
        if result.start_long || result.start_short {
            report.entries += 1;
        }
        if result.end_long || result.end_short {
            report.exits += 1;
        }
        position.apply(&result);
        report.records.push(OutputRecord {
            symbol: stream.key.symbol.clone(),
            timeframe: stream.key.timeframe.clone(),
            date: dated.date,
            result,
        });
    }

    debug!(
        stream = %stream.key,
        bars = report.records.len(),
        rejected = report.rejected,
        "stream finished"
    );
    Ok(report)
}

/// Run every stream on the rayon pool. Reports come back in input order.
pub fn run_all(
    config: &LorentzianConfig,
    streams: &[Stream],
) -> Result<Vec<StreamReport>, ConfigError> {
    info!(streams = streams.len(), "running");
    streams
        .par_iter()
        .map(|stream| run_stream(config, stream))
        .collect()
}
