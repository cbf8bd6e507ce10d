use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::error;

/// Drive one async pass per interval tick, forever.
///
/// The pass is awaited before the next tick can fire and missed ticks are
/// delayed, so at most one pass is ever in flight within this process. The
/// first pass runs immediately. Pass errors are logged and never end the loop.
pub async fn run_on_interval<F, Fut>(period: Duration, mut pass: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = pass().await {
            error!("Pass failed: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_pass_runs_immediately_then_once_per_tick() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let loop_fut = run_on_interval(Duration::from_secs(60), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        tokio::pin!(loop_fut);

        // Drive the loop across two and a half virtual minutes.
        tokio::select! {
            _ = &mut loop_fut => unreachable!("loop never ends"),
            _ = tokio::time::sleep(Duration::from_secs(150)) => {}
        }

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_stop_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let loop_fut = run_on_interval(Duration::from_secs(60), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("boom")
            }
        });
        tokio::pin!(loop_fut);

        tokio::select! {
            _ = &mut loop_fut => unreachable!("loop never ends"),
            _ = tokio::time::sleep(Duration::from_secs(90)) => {}
        }

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
