//! Periodic resync trigger.
//!
//! Emits one [`ResyncTick`] per interval into a bounded channel so NetBox
//! edits made outside any ClusterSync change still get corrected. The first
//! tick fires one full interval after spawn; the controller already runs a
//! pass for every object when it starts.
//!
//! Sending `true` on the shutdown channel (or dropping its sender) stops the
//! task. No tick is delivered after that, and the sender half is dropped so
//! consumers see end-of-stream.

use futures::Stream;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// One synthetic reconcile request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncTick {
    /// 1-based tick counter
    pub sequence: u64,
    pub at: Instant,
}

/// Background task producing [`ResyncTick`]s
#[derive(Debug)]
pub struct PeriodicTrigger;

impl PeriodicTrigger {
    /// Spawn the trigger task and return the receiving end of its channel
    pub fn spawn(interval: Duration, capacity: usize, shutdown: watch::Receiver<bool>) -> mpsc::Receiver<ResyncTick> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(run(interval, tx, shutdown));
        rx
    }
}

async fn run(period: Duration, tx: mpsc::Sender<ResyncTick>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence = 0u64;

    info!("Periodic resync every {:?}", period);
    while !*shutdown.borrow_and_update() {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                sequence += 1;
                let tick = ResyncTick { sequence, at: Instant::now() };
                // A full channel blocks here; shutdown still wins
                tokio::select! {
                    biased;
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    sent = tx.send(tick) => {
                        if sent.is_err() {
                            debug!("Resync receiver dropped");
                            break;
                        }
                        debug!("Sent resync tick {}", sequence);
                    }
                }
            }
        }
    }
    debug!("Periodic resync stopped after {} ticks", sequence);
}

/// Adapts the trigger channel for `Controller::reconcile_all_on`
pub fn resync_stream(mut rx: mpsc::Receiver<ResyncTick>) -> impl Stream<Item = ()> + Send + Sync + 'static {
    futures::stream::poll_fn(move |cx| rx.poll_recv(cx).map(|tick| tick.map(|_| ())))
}
