use tracing::warn;

use crate::delivery::DeliveryChannel;
use crate::error::NotifyError;
use crate::model::{DeliveryStats, Notification};

/// Hands notifications to a channel and keeps count. A failed delivery is
/// logged and counted; it never stops later deliveries.
pub struct Notifier<C: DeliveryChannel> {
    channel: C,
    stats: DeliveryStats,
}

impl<C: DeliveryChannel> Notifier<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            stats: DeliveryStats::default(),
        }
    }

    pub fn channel_name(&self) -> &'static str {
        self.channel.name()
    }

    /// Returns whether the notification was delivered.
    pub fn notify(&mut self, notification: &Notification) -> bool {
        match self.channel.deliver(notification) {
            Ok(()) => {
                self.stats.delivered += 1;
                true
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!(
                    channel = self.channel.name(),
                    recipient = %notification.recipient,
                    subject = %notification.subject,
                    "failed to deliver: {e}"
                );
                false
            }
        }
    }

    pub fn stats(&self) -> DeliveryStats {
        self.stats
    }

    /// Flush the channel and return the final counts along with the channel.
    pub fn finish(mut self) -> Result<(DeliveryStats, C), NotifyError> {
        self.channel.finish()?;
        Ok((self.stats, self.channel))
    }
}
