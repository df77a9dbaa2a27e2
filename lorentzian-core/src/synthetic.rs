//! Deterministic synthetic bar series.
//!
//! Seeds are derived from a symbol name via BLAKE3, so the same symbol always
//! yields the same series regardless of processing order or thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

/// Deterministic seed for `(symbol, salt)`.
pub fn seed_for(symbol: &str, salt: u64) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(&salt.to_le_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Random walk with per-bar returns in `±max_return`, opening at the prior close.
pub fn random_walk(seed: u64, len: usize, start: f64, max_return: f64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(len);
    let mut prev_close = start;
    for _ in 0..len {
        let open = prev_close;
        let close = (open * (1.0 + rng.gen_range(-max_return..=max_return))).max(0.01);
        let wick = rng.gen_range(0.0..0.01);
        let high = open.max(close) * (1.0 + wick);
        let low = open.min(close) * (1.0 - wick);
        let volume = rng.gen_range(1_000.0..10_000.0_f64).round();
        bars.push(Bar::new(open, high, low, close, volume));
        prev_close = close;
    }
    bars
}

/// Random walk seeded from a symbol name, starting at 100.
pub fn for_symbol(symbol: &str, len: usize) -> Vec<Bar> {
    random_walk(seed_for(symbol, 0), len, 100.0, 0.02)
}

/// Strictly rising closes with a fixed step and a one-unit range around each bar.
pub fn linear_trend(len: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..len)
        .map(|i| {
            let open = start + step * i.saturating_sub(1) as f64;
            let close = start + step * i as f64;
            Bar::new(open, open.max(close) + 0.5, open.min(close) - 0.5, close, 1_000.0)
        })
        .collect()
}
