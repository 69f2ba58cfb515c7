use std::time::Duration;

use axum::body::Bytes;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

use super::frame;

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic `:` comment writer bound to one push stream.
///
/// The first comment is written synchronously by [`Heartbeat::start`], so it
/// always precedes any event queued afterwards. Later ticks come from a spawned
/// task that holds only a weak sender: once the stream's owner drops the
/// channel, the next tick finds nothing to write to and the task exits.
#[derive(Debug)]
pub struct Heartbeat {
    token: CancellationToken,
}

impl Heartbeat {
    pub fn start(tx: &mpsc::UnboundedSender<Bytes>, period: Duration) -> Self {
        let _ = tx.send(frame::heartbeat());

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let weak = tx.downgrade();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(tx) = weak.upgrade() else { break };
                        if tx.send(frame::heartbeat()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
