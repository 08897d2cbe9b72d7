use std::sync::atomic::{AtomicU64, Ordering};

/// Produces strictly increasing nonces from wall-clock microseconds.
///
/// Two calls inside the same microsecond (or after the clock steps back)
/// still yield increasing values: the generator never returns less than
/// the previous nonce plus one.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_micros().max(0) as u64;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}
