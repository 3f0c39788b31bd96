//! PollHandle - periodic refresh driver
//!
//! Plays the role of the host scheduler: calls `refresh()` on a fixed interval
//! until the cancellation token fires. There is no backoff; every tick makes a
//! fresh attempt regardless of how the previous one went.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::adapters::traits::Refreshable;

pub struct PollHandle<T: Refreshable> {
    target: Arc<T>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl<T: Refreshable> PollHandle<T> {
    pub fn new(target: Arc<T>, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            target,
            interval,
            shutdown,
        }
    }

    /// Tick until shut down. A refresh in flight at shutdown is abandoned.
    pub async fn run(self) {
        let name = self.target.name().to_string();
        info!("{}: polling every {:?}", name, self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            debug!("{}: poll tick", name);
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.target.refresh() => {}
            }
        }

        info!("{}: polling stopped", name);
    }

    /// Run on a background task.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTarget {
        ticks: AtomicUsize,
    }

    #[async_trait]
    impl Refreshable for CountingTarget {
        fn name(&self) -> &str {
            "counting"
        }

        async fn refresh(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct HangingTarget;

    #[async_trait]
    impl Refreshable for HangingTarget {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn refresh(&self) {
            std::future::pending::<()>().await
        }
    }

    #[tokio::test]
    async fn ticks_until_cancelled() {
        let target = Arc::new(CountingTarget {
            ticks: AtomicUsize::new(0),
        });
        let shutdown = CancellationToken::new();
        let handle = PollHandle::new(target.clone(), Duration::from_millis(10), shutdown.clone())
            .spawn();

        tokio::time::sleep(Duration::from_millis(75)).await;
        shutdown.cancel();
        handle.await.unwrap();

        let ticks = target.ticks.load(Ordering::SeqCst);
        assert!(ticks >= 2, "expected several ticks, got {}", ticks);

        // No more ticks after shutdown
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(target.ticks.load(Ordering::SeqCst), ticks);
    }

    #[tokio::test]
    async fn shutdown_abandons_refresh_in_flight() {
        let shutdown = CancellationToken::new();
        let handle = PollHandle::new(
            Arc::new(HangingTarget),
            Duration::from_millis(5),
            shutdown.clone(),
        )
        .spawn();

        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("poller should stop promptly")
            .unwrap();
    }
}
