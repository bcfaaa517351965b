//! Poll interval timing

use std::future::Future;
use std::time::Duration;

/// Waits between poll cycles
pub trait Sleeper {
    /// Wait out `interval`. Returning `false` stops the poll loop.
    fn sleep(&mut self, interval: Duration) -> impl Future<Output = bool> + Send;
}

/// Sleeps on the tokio timer, forever
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&mut self, interval: Duration) -> bool {
        tokio::time::sleep(interval).await;
        true
    }
}
