//! Row id generation: `<table initial>_<hex millis><hex digit><hex digit>`.

use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Issues ids whose timestamp part strictly increases across calls on the same generator.
/// Ids are not guaranteed unique; inserts still check for duplicates.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_millis: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, table: &str) -> String {
        let millis = self.advance(chrono::Utc::now().timestamp_millis());
        let mut rng = rand::thread_rng();
        let a: u8 = rng.gen_range(0..16);
        let b: u8 = rng.gen_range(0..16);
        format_id(table, millis, a, b)
    }

    /// Returns `now`, or one past the last issued value when the clock has not moved.
    fn advance(&self, now: i64) -> i64 {
        let mut prev = self.last_millis.load(Ordering::Relaxed);
        loop {
            let next = if now > prev { now } else { prev + 1 };
            match self
                .last_millis
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

fn format_id(table: &str, millis: i64, a: u8, b: u8) -> String {
    let initial: String = table.chars().take(1).flat_map(char::to_lowercase).collect();
    format!("{}_{:x}{:x}{:x}", initial, millis, a, b)
}
