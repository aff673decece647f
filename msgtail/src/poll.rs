use std::{future::Future, io::Write, time::Duration};

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::{MessageResolver, NotificationSource, SubscriptionChannel};

/// The observation window of one run, fixed when the loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    started_at: Instant,
    duration: Duration,
    interval: Duration,
}

impl PollWindow {
    pub fn new(started_at: Instant, duration: Duration, interval: Duration) -> Self {
        Self {
            started_at,
            duration,
            interval,
        }
    }

    pub fn start_now(duration: Duration, interval: Duration) -> Self {
        Self::new(Instant::now(), duration, interval)
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.duration
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.deadline()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Subscribed,
    Polling,
    Sleeping,
    Unsubscribing,
    Terminated,
}

/// What a run did, logged when it ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub delivered: u64,
    pub not_found: u64,
    pub skipped: u64,
}

/// Watches one channel for a fixed window: drain, resolve and print every
/// pending notification, sleep, repeat until the deadline has passed.
#[derive(Debug)]
pub struct BoundedPollLoop {
    channel: String,
    duration: Duration,
    interval: Duration,
    state: LoopState,
    stats: PollStats,
}

impl BoundedPollLoop {
    pub fn new(channel: impl Into<String>, duration: Duration, interval: Duration) -> Self {
        Self {
            channel: channel.into(),
            duration,
            interval,
            state: LoopState::Idle,
            stats: PollStats::default(),
        }
    }

    pub fn from_config(channel: impl Into<String>, config: &abi::ListenConfig) -> Self {
        Self::new(channel, config.duration(), config.interval())
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run the loop to completion, writing one `sender:body` line per message
    /// to `out`. Per-notification failures are reported and skipped; anything
    /// else ends the run with an error. `shutdown` firing during the wait
    /// between polls aborts with `abi::Error::InterruptedWait`.
    pub async fn run<C, W, F>(
        &mut self,
        conn: &mut C,
        out: &mut W,
        shutdown: F,
    ) -> Result<PollStats, abi::Error>
    where
        C: SubscriptionChannel + NotificationSource + MessageResolver + Send,
        W: Write,
        F: Future<Output = ()>,
    {
        let ret = self.run_window(conn, out, shutdown).await;
        self.state = LoopState::Terminated;
        ret
    }

    async fn run_window<C, W, F>(
        &mut self,
        conn: &mut C,
        out: &mut W,
        shutdown: F,
    ) -> Result<PollStats, abi::Error>
    where
        C: SubscriptionChannel + NotificationSource + MessageResolver + Send,
        W: Write,
        F: Future<Output = ()>,
    {
        let subscription = conn.open(&self.channel).await?;
        self.state = LoopState::Subscribed;
        info!("waiting for messages on `{}`", self.channel);

        let window = PollWindow::start_now(self.duration, self.interval);
        tokio::pin!(shutdown);

        loop {
            self.state = LoopState::Polling;
            self.poll_once(conn, out).await?;

            self.state = LoopState::Sleeping;
            tokio::select! {
                _ = sleep(window.interval()) => {}
                _ = &mut shutdown => return Err(abi::Error::InterruptedWait),
            }

            if window.is_expired() {
                break;
            }
        }

        self.state = LoopState::Unsubscribing;
        if let Err(e) = conn.close(subscription).await {
            warn!("{}", e);
        }

        info!(
            cycles = self.stats.cycles,
            delivered = self.stats.delivered,
            not_found = self.stats.not_found,
            skipped = self.stats.skipped,
            "stopped listening on `{}`",
            self.channel
        );
        Ok(self.stats)
    }

    async fn poll_once<C, W>(&mut self, conn: &mut C, out: &mut W) -> Result<(), abi::Error>
    where
        C: NotificationSource + MessageResolver + Send,
        W: Write,
    {
        self.stats.cycles += 1;
        let notifications = conn.drain().await?;
        if !notifications.is_empty() {
            debug!(count = notifications.len(), "drained notifications");
        }

        for notification in notifications {
            let id = match notification.message_id() {
                Ok(id) => id,
                Err(e) => {
                    warn!(channel = %notification.channel, "skipping notification: {}", e);
                    self.stats.skipped += 1;
                    continue;
                }
            };

            match conn.resolve(id).await {
                Ok(message) => {
                    writeln!(out, "{}", message)?;
                    self.stats.delivered += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!(id, "could not resolve message: {}", e);
                    self.stats.not_found += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
