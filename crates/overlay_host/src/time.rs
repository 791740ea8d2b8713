//! Time helpers shared across host contracts and adapters.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ENVELOPE_TIMESTAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Returns a monotonic unix millisecond timestamp for envelope updates.
///
/// Values are monotonic within the current thread even when the system clock does not advance,
/// which is the UI thread for every overlay host.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_ENVELOPE_TIMESTAMP_MS.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}

/// Folds a timestamp read back from storage into the monotonic clock.
///
/// Later calls to [`next_monotonic_timestamp_ms`] return values strictly greater than `stored`,
/// so a snapshot written under a faster clock cannot shadow later saves.
pub fn observe_timestamp_ms(stored: u64) {
    LAST_ENVELOPE_TIMESTAMP_MS.with(|last| last.set(last.get().max(stored)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_timestamps_strictly_increase() {
        let first = next_monotonic_timestamp_ms();
        let second = next_monotonic_timestamp_ms();
        let third = next_monotonic_timestamp_ms();
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn observed_future_timestamps_push_the_clock_forward() {
        let future = unix_time_ms_now() + 3_600_000;
        observe_timestamp_ms(future);
        assert_eq!(next_monotonic_timestamp_ms(), future + 1);

        observe_timestamp_ms(1);
        assert_eq!(next_monotonic_timestamp_ms(), future + 2);
    }
}
