//! Entry/exit state machine over the classifier output.
//!
//! The persistent signal moves to `Long`/`Short` only when the prediction has
//! that sign and the classification filters pass; otherwise it holds. Entries
//! fire on a change into a direction the kernel and trend filters agree with.
//! Exits follow either the fixed holding period, cut short by an opposite
//! entry signal (`strict`), or a kernel reversal after the last entry
//! (`dynamic`).

use std::collections::VecDeque;

use serde::Serialize;

use crate::components::filter::TrendVerdict;
use crate::domain::{Direction, PositionState};

/// How many past bars of `changed` feed the early-flip check.
const FLIP_LOOKBACK: usize = 3;

/// Everything the state machine reads for one bar.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs {
    pub prediction: i32,
    /// Aggregate classification filter verdict.
    pub filters_pass: bool,
    pub trend: TrendVerdict,
    pub kernel_bullish: bool,
    pub kernel_bearish: bool,
    pub bullish_alert: bool,
    pub bearish_alert: bool,
    pub position: PositionState,
    /// False during warmup; all events are then forced off.
    pub warm: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalEvents {
    pub signal: Direction,
    pub start_long: bool,
    pub start_short: bool,
    pub end_long: bool,
    pub end_short: bool,
    pub early_signal_flip: bool,
    pub bars_held: usize,
}

/// Fixed-length lookback of booleans, `back(0)` is the current bar.
#[derive(Debug, Clone)]
struct Lookback {
    values: VecDeque<bool>,
    depth: usize,
}

impl Lookback {
    fn new(depth: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(depth + 2),
            depth,
        }
    }

    fn push(&mut self, value: bool) {
        self.values.push_back(value);
        if self.values.len() > self.depth + 1 {
            self.values.pop_front();
        }
    }

    /// Value `n` bars ago; false before history exists.
    fn back(&self, n: usize) -> bool {
        self.values
            .len()
            .checked_sub(n + 1)
            .map_or(false, |i| self.values[i])
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Bars since an event last fired, `None` if it never has.
#[derive(Debug, Clone, Copy, Default)]
struct BarsSince(Option<usize>);

impl BarsSince {
    fn update(&mut self, fired: bool) {
        self.0 = if fired {
            Some(0)
        } else {
            self.0.map(|n| n + 1)
        };
    }
}

#[derive(Debug, Clone)]
pub struct SignalStateMachine {
    hold_bars: usize,
    dynamic_exits: bool,
    signal: Direction,
    bars_held: usize,
    changed: Lookback,
    buy_signal: Lookback,
    sell_signal: Lookback,
    start_long: Lookback,
    start_short: Lookback,
    since_start_long: BarsSince,
    since_start_short: BarsSince,
    /// Bars since the open strict-mode long began, cleared on exit.
    open_long: BarsSince,
    open_short: BarsSince,
    since_bullish_alert: BarsSince,
    since_bearish_alert: BarsSince,
    valid_long_exit: bool,
    valid_short_exit: bool,
}

impl SignalStateMachine {
    pub fn new(hold_bars: usize, dynamic_exits: bool) -> Self {
        assert!(hold_bars >= 1, "hold_bars must be >= 1");
        Self {
            hold_bars,
            dynamic_exits,
            signal: Direction::Neutral,
            bars_held: 0,
            changed: Lookback::new(FLIP_LOOKBACK),
            buy_signal: Lookback::new(hold_bars),
            sell_signal: Lookback::new(hold_bars),
            start_long: Lookback::new(hold_bars),
            start_short: Lookback::new(hold_bars),
            since_start_long: BarsSince::default(),
            since_start_short: BarsSince::default(),
            open_long: BarsSince::default(),
            open_short: BarsSince::default(),
            since_bullish_alert: BarsSince::default(),
            since_bearish_alert: BarsSince::default(),
            valid_long_exit: false,
            valid_short_exit: false,
        }
    }

    pub fn signal(&self) -> Direction {
        self.signal
    }

    pub fn bars_held(&self) -> usize {
        self.bars_held
    }

    pub fn update(&mut self, input: &SignalInputs) -> SignalEvents {
        let prev = self.signal;
        if input.filters_pass && input.prediction > 0 {
            self.signal = Direction::Long;
        } else if input.filters_pass && input.prediction < 0 {
            self.signal = Direction::Short;
        }
        let changed = self.signal != prev;
        self.bars_held = if changed { 0 } else { self.bars_held + 1 };

        let early_signal_flip = changed && (1..=FLIP_LOOKBACK).any(|n| self.changed.back(n - 1));
        self.changed.push(changed);

        let TrendVerdict {
            uptrend,
            downtrend,
        } = input.trend;
        let is_buy = self.signal == Direction::Long && uptrend;
        let is_sell = self.signal == Direction::Short && downtrend;
        self.buy_signal.push(is_buy);
        self.sell_signal.push(is_sell);
        let is_new_buy = is_buy && changed;
        let is_new_sell = is_sell && changed;

        let start_long = input.warm
            && is_new_buy
            && input.kernel_bullish
            && uptrend
            && input.position != PositionState::Long;
        let start_short = input.warm
            && is_new_sell
            && input.kernel_bearish
            && downtrend
            && input.position != PositionState::Short;
        self.start_long.push(start_long);
        self.start_short.push(start_short);

        let (end_long, end_short) = if self.dynamic_exits {
            self.dynamic_exit(input, start_long, start_short)
        } else {
            self.strict_exit(is_new_sell, is_new_buy, start_long, start_short)
        };

        SignalEvents {
            signal: self.signal,
            start_long,
            start_short,
            end_long: input.warm && end_long,
            end_short: input.warm && end_short,
            early_signal_flip,
            bars_held: self.bars_held,
        }
    }

    /// A trade closes after `hold_bars` bars, or earlier when the opposite
    /// signal fires while it is still open.
    fn strict_exit(
        &mut self,
        is_new_sell: bool,
        is_new_buy: bool,
        start_long: bool,
        start_short: bool,
    ) -> (bool, bool) {
        let hold = self.hold_bars;
        let held_full = self.bars_held == hold;

        let long_open = age_open_trade(&mut self.open_long, hold);
        let short_open = age_open_trade(&mut self.open_short, hold);

        let end_long = (held_full && self.buy_signal.back(hold) && self.start_long.back(hold))
            || (is_new_sell && long_open);
        let end_short = (held_full && self.sell_signal.back(hold) && self.start_short.back(hold))
            || (is_new_buy && short_open);

        track_open_trade(&mut self.open_long, start_long, end_long);
        track_open_trade(&mut self.open_short, start_short, end_short);
        (end_long, end_short)
    }

    fn dynamic_exit(
        &mut self,
        input: &SignalInputs,
        start_long: bool,
        start_short: bool,
    ) -> (bool, bool) {
        self.since_start_long.update(start_long);
        self.since_start_short.update(start_short);
        self.since_bullish_alert.update(input.bullish_alert);
        self.since_bearish_alert.update(input.bearish_alert);

        let end_long = input.bearish_alert && self.valid_long_exit;
        let end_short = input.bullish_alert && self.valid_short_exit;

        // An exit is valid once the opposing alert is older than the entry
        self.valid_long_exit = matches!(
            (self.since_bearish_alert.0, self.since_start_long.0),
            (Some(exit), Some(entry)) if exit > entry
        );
        self.valid_short_exit = matches!(
            (self.since_bullish_alert.0, self.since_start_short.0),
            (Some(exit), Some(entry)) if exit > entry
        );
        (end_long, end_short)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.hold_bars, self.dynamic_exits);
    }
}

/// Advance an open trade by one bar. Trades older than `hold` are closed by
/// the holding-period rule and stop being tracked.
fn age_open_trade(open: &mut BarsSince, hold: usize) -> bool {
    open.update(false);
    if open.0.map_or(false, |age| age > hold) {
        open.0 = None;
    }
    open.0.is_some()
}

fn track_open_trade(open: &mut BarsSince, started: bool, ended: bool) {
    if ended {
        open.0 = None;
    }
    if started {
        open.0 = Some(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(prediction: i32) -> SignalInputs {
        SignalInputs {
            prediction,
            filters_pass: true,
            trend: TrendVerdict::BOTH,
            kernel_bullish: true,
            kernel_bearish: true,
            bullish_alert: false,
            bearish_alert: false,
            position: PositionState::Flat,
            warm: true,
        }
    }

    #[test]
    fn signal_follows_prediction_sign() {
        let mut sm = SignalStateMachine::new(4, false);
        assert_eq!(sm.update(&inputs(3)).signal, Direction::Long);
        assert_eq!(sm.update(&inputs(-2)).signal, Direction::Short);
    }

    #[test]
    fn signal_holds_on_zero_or_failed_filters() {
        let mut sm = SignalStateMachine::new(4, false);
        sm.update(&inputs(5));
        assert_eq!(sm.update(&inputs(0)).signal, Direction::Long);
        let blocked = SignalInputs {
            filters_pass: false,
            ..inputs(-8)
        };
        assert_eq!(sm.update(&blocked).signal, Direction::Long);
    }

    #[test]
    fn start_long_on_change_only() {
        let mut sm = SignalStateMachine::new(4, false);
        let first = sm.update(&inputs(4));
        assert!(first.start_long);
        assert!(!first.start_short);
        assert_eq!(first.bars_held, 0);
        let second = sm.update(&inputs(4));
        assert!(!second.start_long);
        assert_eq!(second.bars_held, 1);
    }

    #[test]
    fn open_long_position_suppresses_entry() {
        let mut sm = SignalStateMachine::new(4, false);
        let held = SignalInputs {
            position: PositionState::Long,
            ..inputs(4)
        };
        assert!(!sm.update(&held).start_long);
    }

    #[test]
    fn kernel_disagreement_blocks_entry() {
        let mut sm = SignalStateMachine::new(4, false);
        let bearish_kernel = SignalInputs {
            kernel_bullish: false,
            ..inputs(4)
        };
        let events = sm.update(&bearish_kernel);
        assert_eq!(events.signal, Direction::Long);
        assert!(!events.start_long);
    }

    #[test]
    fn trend_filter_blocks_entry() {
        let mut sm = SignalStateMachine::new(4, false);
        let downtrend = SignalInputs {
            trend: TrendVerdict {
                uptrend: false,
                downtrend: true,
            },
            ..inputs(4)
        };
        assert!(!sm.update(&downtrend).start_long);
    }

    #[test]
    fn strict_exit_after_hold_period() {
        let mut sm = SignalStateMachine::new(4, false);
        let events: Vec<SignalEvents> = (0..6).map(|_| sm.update(&inputs(4))).collect();
        assert!(events[0].start_long);
        let exits: Vec<bool> = events.iter().map(|e| e.end_long).collect();
        assert_eq!(exits, [false, false, false, false, true, false]);
        assert_eq!(events[4].bars_held, 4);
    }

    #[test]
    fn opposite_signal_closes_open_long_early() {
        let mut sm = SignalStateMachine::new(4, false);
        let mut events = vec![sm.update(&inputs(3)), sm.update(&inputs(3))];
        events.extend((0..10).map(|_| sm.update(&inputs(-3))));

        assert!(events[0].start_long);
        assert!(events[2].start_short);
        assert!(events[2].early_signal_flip);
        let long_exits: Vec<usize> = (0..events.len()).filter(|&i| events[i].end_long).collect();
        assert_eq!(long_exits, [2]);
        // The short still runs its full holding period
        let short_exits: Vec<usize> = (0..events.len()).filter(|&i| events[i].end_short).collect();
        assert_eq!(short_exits, [6]);
    }

    #[test]
    fn flip_after_hold_period_does_not_close_again() {
        let mut sm = SignalStateMachine::new(4, false);
        let mut events: Vec<SignalEvents> = (0..6).map(|_| sm.update(&inputs(2))).collect();
        events.push(sm.update(&inputs(-2)));
        assert!(events[4].end_long);
        assert!(events[6].start_short);
        assert_eq!(events.iter().filter(|e| e.end_long).count(), 1);
    }

    #[test]
    fn flip_closes_short_early() {
        let mut sm = SignalStateMachine::new(4, false);
        assert!(sm.update(&inputs(-1)).start_short);
        sm.update(&inputs(-1));
        sm.update(&inputs(-1));
        let flip = sm.update(&inputs(1));
        assert!(flip.start_long);
        assert!(flip.end_short);
        assert!(!flip.end_long);
    }

    #[test]
    fn early_flip_detected() {
        let mut sm = SignalStateMachine::new(4, false);
        assert!(!sm.update(&inputs(1)).early_signal_flip);
        let flip = sm.update(&inputs(-1));
        assert!(flip.early_signal_flip);
        sm.update(&inputs(-1));
        sm.update(&inputs(-1));
        sm.update(&inputs(-1));
        sm.update(&inputs(-1));
        assert!(!sm.update(&inputs(1)).early_signal_flip);
    }

    #[test]
    fn warmup_forces_events_off_but_advances_state() {
        let mut sm = SignalStateMachine::new(4, false);
        let cold = SignalInputs {
            warm: false,
            ..inputs(6)
        };
        let events = sm.update(&cold);
        assert_eq!(events.signal, Direction::Long);
        assert!(!events.start_long && !events.end_long);
        assert!(!events.start_short && !events.end_short);
        assert_eq!(sm.signal(), Direction::Long);
    }

    #[test]
    fn dynamic_exit_on_kernel_reversal() {
        let mut sm = SignalStateMachine::new(4, true);
        // A bearish alert before the entry makes the later exit valid
        sm.update(&SignalInputs {
            bearish_alert: true,
            ..inputs(0)
        });
        sm.update(&inputs(0));
        let entry = sm.update(&inputs(3));
        assert!(entry.start_long);
        assert!(!sm.update(&inputs(3)).end_long);
        let exit = sm.update(&SignalInputs {
            bearish_alert: true,
            ..inputs(3)
        });
        assert!(exit.end_long);
        // Alert is now newer than the entry
        let again = sm.update(&SignalInputs {
            bearish_alert: true,
            ..inputs(3)
        });
        assert!(!again.end_long);
    }

    #[test]
    fn dynamic_exit_needs_prior_alert_history() {
        let mut sm = SignalStateMachine::new(4, true);
        assert!(sm.update(&inputs(3)).start_long);
        let exit = sm.update(&SignalInputs {
            bearish_alert: true,
            ..inputs(3)
        });
        assert!(!exit.end_long);
    }

    #[test]
    fn reset_restores_neutral() {
        let mut sm = SignalStateMachine::new(4, false);
        sm.update(&inputs(3));
        sm.reset();
        assert_eq!(sm.signal(), Direction::Neutral);
        assert_eq!(sm.bars_held(), 0);
    }
}
