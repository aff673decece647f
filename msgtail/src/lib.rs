mod mailbox;
mod poll;
mod schema;

use abi::{Message, MessageId, Notification};
use async_trait::async_trait;

pub use mailbox::PgMailbox;
pub use poll::{BoundedPollLoop, LoopState, PollStats, PollWindow};
pub use schema::{ProvisionStep, PROVISION_STEPS};

/// Brings the watched table, the notify function and the trigger to their
/// current definition. Safe to run on every startup.
#[async_trait]
pub trait SchemaProvisioner {
    async fn ensure(&mut self) -> Result<(), abi::Error>;
}

/// An open `LISTEN` on one channel of one connection. Consumed by
/// [`SubscriptionChannel::close`]; dropping the connection ends it too.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    channel: String,
}

impl Subscription {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait]
pub trait SubscriptionChannel {
    /// start receiving notifications published on `channel`
    async fn open(&mut self, channel: &str) -> Result<Subscription, abi::Error>;
    /// stop receiving notifications for the subscription
    async fn close(&mut self, subscription: Subscription) -> Result<(), abi::Error>;
}

#[async_trait]
pub trait NotificationSource {
    /// Take every notification received so far, in arrival order, without
    /// waiting for new ones. What is returned is not returned again.
    async fn drain(&mut self) -> Result<Vec<Notification>, abi::Error>;
}

#[async_trait]
pub trait MessageResolver {
    /// fetch the current row for `id`, `abi::Error::NotFound` if it is gone
    async fn resolve(&mut self, id: MessageId) -> Result<Message, abi::Error>;
}
