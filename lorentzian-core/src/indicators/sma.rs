//! Simple Moving Average (SMA).
//!
//! Rolling mean of the `period` most recent inputs. Before `period` inputs
//! have arrived the mean is taken over however many are available.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period.min(1024)),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed the next input and return the mean of the current window.
    ///
    /// The sum is recomputed over the window so the result does not drift
    /// with the number of bars processed.
    pub fn update(&mut self, x: f64) -> f64 {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(x);
        self.mean()
    }

    fn mean(&self) -> f64 {
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    pub fn value(&self) -> Option<f64> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.mean())
        }
    }

    /// Inputs currently in the window, oldest first.
    pub fn window(&self) -> &VecDeque<f64> {
        &self.window
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.period
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
