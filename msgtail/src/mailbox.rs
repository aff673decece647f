use std::collections::BTreeSet;

use abi::{Message, MessageId, Notification};
use async_trait::async_trait;
use sqlx::Executor;
use sqlx_postgres::PgListener;
use tracing::{debug, info, warn};

use crate::{
    MessageResolver, NotificationSource, SchemaProvisioner, Subscription, SubscriptionChannel,
    PROVISION_STEPS,
};

/// All four collaborators of the poll loop on a single postgres connection:
/// provisioning, `LISTEN`/`UNLISTEN`, draining and row lookups share the
/// listener's connection.
pub struct PgMailbox {
    listener: PgListener,
    channels: BTreeSet<String>,
}

impl PgMailbox {
    pub fn new(listener: PgListener) -> Self {
        Self {
            listener,
            channels: BTreeSet::new(),
        }
    }

    pub async fn connect(url: &str) -> Result<Self, abi::Error> {
        let listener = PgListener::connect(url).await?;
        Ok(Self::new(listener))
    }

    /// channels currently listened on
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(String::as_str)
    }

    fn read_error(&self, e: sqlx::Error) -> abi::Error {
        match e {
            sqlx::Error::Io(_) => {
                let channels: Vec<&str> = self.channels().collect();
                abi::Error::ConnectionLost(channels.join(","))
            }
            e => abi::Error::DbError(e),
        }
    }
}

#[async_trait]
impl SchemaProvisioner for PgMailbox {
    async fn ensure(&mut self) -> Result<(), abi::Error> {
        for step in PROVISION_STEPS {
            (&mut self.listener)
                .execute(step.sql)
                .await
                .map_err(|source| abi::Error::ProvisionError {
                    object: step.object,
                    source,
                })?;
            debug!(object = step.object, "provisioned");
        }
        info!("schema for `{}` is up to date", abi::MESSAGE_TABLE);
        Ok(())
    }
}

#[async_trait]
impl SubscriptionChannel for PgMailbox {
    async fn open(&mut self, channel: &str) -> Result<Subscription, abi::Error> {
        self.listener
            .listen(channel)
            .await
            .map_err(|source| abi::Error::SubscribeError {
                channel: channel.to_string(),
                source,
            })?;
        if !self.channels.insert(channel.to_string()) {
            debug!(channel, "already listening");
        }
        Ok(Subscription::new(channel))
    }

    async fn close(&mut self, subscription: Subscription) -> Result<(), abi::Error> {
        let channel = subscription.channel();
        self.listener
            .unlisten(channel)
            .await
            .map_err(|source| abi::Error::UnsubscribeError {
                channel: channel.to_string(),
                source,
            })?;
        self.channels.remove(channel);
        Ok(())
    }
}

#[async_trait]
impl NotificationSource for PgMailbox {
    async fn drain(&mut self) -> Result<Vec<Notification>, abi::Error> {
        // a full round trip reads everything the server sent before it, and
        // the listener buffers the notifications found on the way. A socket
        // read is never abandoned halfway through a frame.
        if let Err(e) = (&mut self.listener).execute("SELECT 1").await {
            return Err(self.read_error(e));
        }

        let mut drained = Vec::new();
        while let Some(n) = self.listener.next_buffered() {
            let n = Notification::from(n);
            if self.channels.contains(&n.channel) {
                drained.push(n);
            } else {
                warn!(channel = %n.channel, "dropping notification for a channel not listened on");
            }
        }
        Ok(drained)
    }
}

#[async_trait]
impl MessageResolver for PgMailbox {
    async fn resolve(&mut self, id: MessageId) -> Result<Message, abi::Error> {
        let message: Option<Message> =
            sqlx::query_as("SELECT id, usuario, mensaxe FROM mensaxes WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut self.listener)
                .await?;

        message.ok_or(abi::Error::NotFound(id))
    }
}
