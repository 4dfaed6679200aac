// Refresh scheduler - cancellable periodic trigger for dashboard refreshes
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Background task that spawns a refresh every `period`, starting one period
/// from now. Missed ticks are skipped rather than queued. Dropping the
/// scheduler aborts the task.
pub struct RefreshScheduler {
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn start<F>(period: Duration, refresh: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + 'static,
    {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();

        let handle = tokio::spawn(async move {
            tracing::info!("Refresh scheduler started (every {:?})", period);

            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        tracing::info!("Refresh scheduler received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        tracing::debug!("Scheduled refresh tick");
                        // A hung collaborator must not hold up later ticks
                        tokio::spawn(refresh());
                    }
                }
            }

            tracing::info!("Refresh scheduler stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the task to stop and wait for it to exit.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh scheduler task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: Arc<AtomicUsize>) -> impl Fn() -> BoxFuture<'static, ()> + Send + 'static {
        move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = RefreshScheduler::start(Duration::from_secs(300), counting(counter.clone()));

        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(300)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = RefreshScheduler::start(Duration::from_secs(60), counting(counter.clone()));

        scheduler.stop().await;
        tokio::time::sleep(Duration::from_secs(600)).await;
        settle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = RefreshScheduler::start(Duration::from_secs(60), counting(counter.clone()));

        drop(scheduler);
        tokio::time::sleep(Duration::from_secs(600)).await;
        settle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
