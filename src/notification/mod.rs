//! # Notification Service
//!
//! This module is responsible for delivering status updates and alerts to the
//! configured chat destinations. It acts as the single exit point for
//! everything the monitor says.
//!
//! ## Core Components
//!
//! - **`ChatService` Trait**: Abstracts the chat platform behind two
//!   operations, plain messages and chart-bearing reports, so the dispatch
//!   logic can be exercised without network access.
//! - **`DiscordClient`**: The production `ChatService`, speaking the Discord
//!   REST API through the retrying HTTP client.
//! - **`Notifier`**: Fans a finished polling tick out to every destination,
//!   suppressing repeats and keeping per-destination bookkeeping.
//!
//! ## Workflow
//!
//! 1. The poller finishes a tick and hands the summary to `Notifier::dispatch`.
//! 2. For each destination, the notifier checks whether the identical status
//!    line was already delivered there within the dedup window and skips the
//!    destination entirely if so.
//! 3. Otherwise it sends the status update (unless the count is zero) and any
//!    alerts the tick raised, logging failures per destination.
//! 4. Delivery bookkeeping is only updated for destinations that received at
//!    least one message, so failed destinations are retried next tick.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
#[cfg(test)]
use mockall::automock;

use crate::models::{Destination, StatusReport};

mod discord;
pub mod error;
pub mod payload;

pub use discord::DiscordClient;
use error::NotificationError;

/// Seconds within which an identical status line is not re-sent to a
/// destination.
const DEDUP_WINDOW_SECS: i64 = 60;

/// A trait for the chat platform the monitor talks to.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Sends a plain text message to a channel.
    async fn send_message(&self, channel_id: u64, content: &str)
    -> Result<(), NotificationError>;

    /// Sends a status report with the rendered chart attached.
    async fn send_report(
        &self,
        channel_id: u64,
        report: &StatusReport,
        chart_png: Vec<u8>,
    ) -> Result<(), NotificationError>;
}

/// Everything the notifier needs to fan a finished polling tick out to the
/// configured destinations.
#[derive(Debug, Clone)]
pub struct TickDispatch {
    /// Timestamped status line, e.g. `"[12:30:15] 5,123 (+40) online players"`.
    pub final_string: String,

    /// Player count observed this tick.
    pub count: u64,

    /// Percentage change against the previous tick.
    pub drop_rate: f64,

    /// The count fell by more than the severe-drop threshold.
    pub severe_drop: bool,

    /// The count crossed the resurrection threshold from below.
    pub resurrected: bool,

    /// Unix timestamp rendered into alert mentions.
    pub now_unix: i64,
}

/// Fans finished ticks out to all destinations, suppressing repeats.
///
/// A destination is skipped when the status line matches the previously
/// delivered one and the destination was served within the dedup window.
pub struct Notifier<C: ChatService + ?Sized> {
    /// The chat service messages are delivered through.
    chat: Arc<C>,

    /// Fan-out targets.
    destinations: Vec<Destination>,

    /// Most recently delivered status line, across all destinations.
    last_message: Option<String>,

    /// Per-status-channel time of the last successful delivery.
    last_dispatch: HashMap<u64, DateTime<Utc>>,
}

impl<C: ChatService + ?Sized> Notifier<C> {
    /// Creates a new notifier over the given destinations.
    pub fn new(chat: Arc<C>, destinations: Vec<Destination>) -> Self {
        Self { chat, destinations, last_message: None, last_dispatch: HashMap::new() }
    }

    /// Dispatches one tick to every destination.
    ///
    /// Send failures are logged per destination and never abort the fan-out.
    pub async fn dispatch(&mut self, tick: &TickDispatch) {
        let now = Utc::now();
        let destinations = self.destinations.clone();
        let mut any_sent = false;

        for destination in destinations {
            if self.is_recent_repeat(&destination, tick, now) {
                tracing::debug!(
                    channel_id = destination.status_channel_id,
                    "Suppressing repeated status line."
                );
                continue;
            }

            if self.dispatch_to(&destination, tick).await {
                self.last_dispatch.insert(destination.status_channel_id, now);
                any_sent = true;
            }
        }

        if any_sent {
            self.last_message = Some(tick.final_string.clone());
        }
    }

    fn is_recent_repeat(
        &self,
        destination: &Destination,
        tick: &TickDispatch,
        now: DateTime<Utc>,
    ) -> bool {
        if self.last_message.as_deref() != Some(tick.final_string.as_str()) {
            return false;
        }
        self.last_dispatch
            .get(&destination.status_channel_id)
            .is_some_and(|last| now - *last < TimeDelta::seconds(DEDUP_WINDOW_SECS))
    }

    /// Returns whether at least one message reached the destination.
    async fn dispatch_to(&self, destination: &Destination, tick: &TickDispatch) -> bool {
        let mut sent = false;

        // A zero count means the server is unreachable; the status line is
        // withheld but alerts below still go out.
        if tick.count != 0 {
            let content = format!("{} ({:+.2}%)", tick.final_string, tick.drop_rate);
            match self.chat.send_message(destination.status_channel_id, &content).await {
                Ok(()) => sent = true,
                Err(e) => tracing::error!(
                    error = %e,
                    channel_id = destination.status_channel_id,
                    "Failed to send status update."
                ),
            }
        }

        if tick.resurrected {
            let content = format!(
                "[{}] SERVER IS UP! <t:{}:R> <@&{}>",
                Local::now().format("%H:%M:%S"),
                tick.now_unix,
                destination.alert_role_id
            );
            match self.chat.send_message(destination.alert_channel_id, &content).await {
                Ok(()) => sent = true,
                Err(e) => tracing::error!(
                    error = %e,
                    channel_id = destination.alert_channel_id,
                    "Failed to send resurrection alert."
                ),
            }
        }

        if tick.severe_drop {
            let content = format!(
                "{} <t:{}:R> <@&{}>",
                tick.final_string, tick.now_unix, destination.alert_role_id
            );
            match self.chat.send_message(destination.alert_channel_id, &content).await {
                Ok(()) => sent = true,
                Err(e) => tracing::error!(
                    error = %e,
                    channel_id = destination.alert_channel_id,
                    "Failed to send severe-drop alert."
                ),
            }
        }

        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(n: u64) -> Destination {
        Destination { status_channel_id: n, alert_channel_id: n + 100, alert_role_id: n + 200 }
    }

    fn make_tick(final_string: &str, count: u64) -> TickDispatch {
        TickDispatch {
            final_string: final_string.to_string(),
            count,
            drop_rate: 0.0,
            severe_drop: false,
            resurrected: false,
            now_unix: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_dispatch_sends_status_to_every_destination() {
        let mut chat = MockChatService::new();
        chat.expect_send_message()
            .withf(|channel_id, content| {
                (*channel_id == 1 || *channel_id == 2) && content.ends_with("(+0.00%)")
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1), destination(2)]);
        notifier.dispatch(&make_tick("[12:00:00] 5,123 (+40) online players", 5123)).await;
    }

    #[tokio::test]
    async fn test_dispatch_suppresses_recent_repeat() {
        let mut chat = MockChatService::new();
        chat.expect_send_message().times(1).returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        let tick = make_tick("[12:00:00] 5,123 online players.", 5123);
        notifier.dispatch(&tick).await;
        notifier.dispatch(&tick).await;
    }

    #[test]
    fn test_repeat_outside_window_is_not_suppressed() {
        let chat = MockChatService::new();
        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        let tick = make_tick("[12:00:00] 5,123 online players.", 5123);

        let delivered = Utc::now();
        notifier.last_message = Some(tick.final_string.clone());
        notifier.last_dispatch.insert(1, delivered);

        assert!(notifier.is_recent_repeat(&destination(1), &tick, delivered));
        assert!(notifier.is_recent_repeat(
            &destination(1),
            &tick,
            delivered + TimeDelta::seconds(DEDUP_WINDOW_SECS - 1)
        ));
        assert!(!notifier.is_recent_repeat(
            &destination(1),
            &tick,
            delivered + TimeDelta::seconds(DEDUP_WINDOW_SECS)
        ));
    }

    #[tokio::test]
    async fn test_dispatch_resends_when_line_changes() {
        let mut chat = MockChatService::new();
        chat.expect_send_message().times(2).returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        notifier.dispatch(&make_tick("[12:00:00] 5,123 online players.", 5123)).await;
        notifier.dispatch(&make_tick("[12:01:00] 5,124 (+1) online players", 5124)).await;
    }

    #[tokio::test]
    async fn test_dedup_is_tracked_per_destination() {
        let mut chat = MockChatService::new();
        chat.expect_send_message()
            .withf(|channel_id, _| *channel_id == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        // Destination 2 fails on the first tick, so only it is retried.
        let mut seq = mockall::Sequence::new();
        chat.expect_send_message()
            .withf(|channel_id, _| *channel_id == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(NotificationError::NotifyFailed("boom".to_string())));
        chat.expect_send_message()
            .withf(|channel_id, _| *channel_id == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1), destination(2)]);
        let tick = make_tick("[12:00:00] 5,123 online players.", 5123);
        notifier.dispatch(&tick).await;
        notifier.dispatch(&tick).await;
    }

    #[tokio::test]
    async fn test_dispatch_retries_after_failed_send() {
        let mut chat = MockChatService::new();
        chat.expect_send_message()
            .times(2)
            .returning(|_, _| Err(NotificationError::NotifyFailed("boom".to_string())));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        let tick = make_tick("[12:00:00] 5,123 online players.", 5123);

        // A failed send must not count as delivered, so the identical line
        // goes out again on the next tick.
        notifier.dispatch(&tick).await;
        notifier.dispatch(&tick).await;
    }

    #[tokio::test]
    async fn test_dispatch_zero_count_sends_no_status() {
        let mut chat = MockChatService::new();
        chat.expect_send_message().times(0);

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        notifier.dispatch(&make_tick("[12:00:00] SERVER MAINTENANCE!", 0)).await;
    }

    #[tokio::test]
    async fn test_dispatch_zero_count_still_alerts_on_severe_drop() {
        let mut chat = MockChatService::new();
        chat.expect_send_message()
            .withf(|channel_id, content| *channel_id == 101 && content.contains("<@&201>"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        let mut tick = make_tick("[12:00:00] SERVER MAINTENANCE!", 0);
        tick.severe_drop = true;
        notifier.dispatch(&tick).await;
    }

    #[tokio::test]
    async fn test_dispatch_sends_resurrection_alert() {
        let mut chat = MockChatService::new();
        chat.expect_send_message()
            .withf(|channel_id, _| *channel_id == 1)
            .times(1)
            .returning(|_, _| Ok(()));
        chat.expect_send_message()
            .withf(|channel_id, content| {
                *channel_id == 101
                    && content.contains("SERVER IS UP! <t:1700000000:R> <@&201>")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        let mut tick = make_tick("[12:00:00] 2,400 (+2400) online players", 2400);
        tick.resurrected = true;
        notifier.dispatch(&tick).await;
    }

    #[tokio::test]
    async fn test_dispatch_status_content_carries_drop_rate() {
        let mut chat = MockChatService::new();
        chat.expect_send_message()
            .withf(|_, content| content.ends_with("(-3.25%)"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut notifier = Notifier::new(Arc::new(chat), vec![destination(1)]);
        let mut tick = make_tick("[12:00:00] 4,753 (-160) online players", 4753);
        tick.drop_rate = -3.25;
        notifier.dispatch(&tick).await;
    }
}
