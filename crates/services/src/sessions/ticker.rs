use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, interval_at};

const PERIOD: Duration = Duration::from_secs(1);

/// One elapsed second, tagged with the session generation it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Emits one [`Tick`] per second for a given session generation.
///
/// Nothing runs unless the caller awaits [`CountdownTicker::next`] or
/// spawns the ticker; aborting or dropping it stops the ticks. Building one
/// needs no runtime; the timer starts on the first `next`.
pub struct CountdownTicker {
    generation: u64,
    interval: Option<Interval>,
}

impl CountdownTicker {
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            interval: None,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The first tick fires one period after the first call.
    pub async fn next(&mut self) -> Tick {
        self.interval
            .get_or_insert_with(|| interval_at(Instant::now() + PERIOD, PERIOD))
            .tick()
            .await;
        Tick {
            generation: self.generation,
        }
    }

    /// Forward ticks into `tx` on a background task until the receiver is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(mut self, tx: mpsc::Sender<Tick>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let tick = self.next().await;
                if tx.send(tick).await.is_err() {
                    tracing::debug!(generation = self.generation, "tick receiver gone");
                    break;
                }
            }
        })
    }
}
