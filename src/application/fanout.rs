//! Concurrent fan-out/fan-in with fail-fast cancellation.
//!
//! One rayon task per key. The first failing task wins: its error is kept,
//! a shared cancellation flag is raised, tasks not yet started are skipped and
//! in-flight tasks can poll the flag to stop early. Partial results are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use tracing::{debug, warn};

/// Run `work` for every key in parallel and concatenate the results.
///
/// `work` returns `Ok(None)` when it noticed the cancellation flag and gave up.
/// Runs on the current rayon pool; wrap in `ThreadPool::install` to pick another.
pub fn fan_out<K, T, E, F>(keys: &[K], work: F) -> Result<Vec<T>, E>
where
    K: Sync,
    T: Send,
    E: Send,
    F: Fn(&K, &AtomicBool) -> Result<Option<Vec<T>>, E> + Sync,
{
    let cancel = AtomicBool::new(false);
    let first_error: Mutex<Option<E>> = Mutex::new(None);

    let parts: Vec<Vec<T>> = keys
        .par_iter()
        .filter_map(|key| {
            if cancel.load(Ordering::Acquire) {
                return None;
            }
            match work(key, &cancel) {
                Ok(part) => part,
                Err(e) => {
                    let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    cancel.store(true, Ordering::Release);
                    None
                }
            }
        })
        .collect();

    if let Some(e) = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        warn!(
            "fan_out: aborted after error, discarding {} partial results",
            parts.len()
        );
        return Err(e);
    }

    debug!("fan_out: {} tasks completed", parts.len());
    Ok(parts.into_iter().flatten().collect())
}
