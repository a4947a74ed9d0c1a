#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use solartrace::db::LocalRepository;
use solartrace::models::{NewReading, Reading, SpectralBand};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Panic-safe (restores variables on unwind) and serializes access to the
/// process-global environment so parallel tests do not interfere.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Fixed midday reference instant used by fixtures.
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap()
}

/// A full-spectrum reading as a sensor node would send it.
pub fn full_reading(station: &str, ppfd: f64, red: f64, far_red: f64) -> NewReading {
    let mut reading = NewReading::new(station).with_ppfd(ppfd);
    for (i, band) in SpectralBand::ALL.iter().enumerate() {
        reading = reading.with_band(*band, 10.0 * (i as f64 + 1.0));
    }
    reading
        .with_band(SpectralBand::Red680, red)
        .with_band(SpectralBand::FarRed730, far_red)
}

/// Seed `station` with one reading per entry of `ppfd`, `step` apart,
/// ending at `end`.
pub fn seed_series(
    repo: &LocalRepository,
    station: &str,
    end: DateTime<Utc>,
    step: Duration,
    ppfd: &[f64],
) -> Vec<Reading> {
    let n = ppfd.len() as i32;
    ppfd.iter()
        .enumerate()
        .map(|(i, value)| {
            let at = end - step * (n - 1 - i as i32);
            repo.insert_reading_at(&full_reading(station, *value, 5.0, 4.0), at)
                .unwrap()
        })
        .collect()
}
