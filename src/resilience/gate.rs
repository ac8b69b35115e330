use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

/// Point-in-time view of the gate for observability.
#[derive(Debug, Clone)]
pub struct GateSnapshot {
    pub capacity: usize,
    pub available: usize,
    pub min_gap_ms: u64,
    /// Remaining pacing wait for the next grant (ms), if the gap has not
    /// elapsed yet.
    pub next_start_wait_ms: Option<u64>,
}

#[derive(Debug, Default)]
struct PacingState {
    last_grant: Option<Instant>,
}

/// RAII permit for one in-flight backend call.
///
/// Dropping the slot releases it; this is the only release path, so a slot
/// cannot leak on an error, timeout or cancellation exit.
pub struct GateSlot {
    _permit: OwnedSemaphorePermit,
}

/// Bounds concurrent backend calls and enforces a minimum gap between the
/// start times of consecutive granted calls.
///
/// Waiters queue FIFO on the semaphore. The pacing wait runs while holding
/// the pacing lock, which serializes grants; a caller cancelled mid-wait
/// drops its permit without advancing the pacing clock.
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
    capacity: usize,
    min_gap: Duration,
    pacing: Mutex<PacingState>,
}

impl ConcurrencyGate {
    pub fn new(capacity: usize, min_gap: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            min_gap,
            pacing: Mutex::new(PacingState::default()),
        }
    }

    /// Acquire a slot, waiting for both a free permit and the pacing gap.
    pub async fn acquire(&self) -> Result<GateSlot> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| {
                Error::runtime_with_context(
                    "concurrency gate closed",
                    ErrorContext::new().with_source("concurrency_gate"),
                )
            })?;

        let mut pacing = self.pacing.lock().await;
        if let Some(last) = pacing.last_grant {
            let since = last.elapsed();
            if since < self.min_gap {
                tokio::time::sleep(self.min_gap - since).await;
            }
        }
        pacing.last_grant = Some(Instant::now());
        drop(pacing);

        Ok(GateSlot { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn snapshot(&self) -> GateSnapshot {
        let pacing = self.pacing.lock().await;
        let next_start_wait_ms = pacing.last_grant.and_then(|last| {
            let since = last.elapsed();
            if since < self.min_gap {
                Some((self.min_gap - since).as_millis() as u64)
            } else {
                None
            }
        });
        GateSnapshot {
            capacity: self.capacity,
            available: self.permits.available_permits(),
            min_gap_ms: self.min_gap.as_millis() as u64,
            next_start_wait_ms,
        }
    }
}
