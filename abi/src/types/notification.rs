use sqlx::postgres::PgNotification;

use crate::{Error, MessageId};

/// An event drained from the listening connection. Once drained it is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel: String,
    pub payload: String,
}

impl Notification {
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    /// The payload is the decimal id of the inserted row. Any integer is
    /// accepted; whether the row exists is for the resolver to say.
    pub fn message_id(&self) -> Result<MessageId, Error> {
        self.payload
            .trim()
            .parse()
            .map_err(|_| Error::MalformedPayload(self.payload.clone()))
    }
}

impl From<PgNotification> for Notification {
    fn from(n: PgNotification) -> Self {
        Self {
            channel: n.channel().to_string(),
            payload: n.payload().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_should_parse_to_message_id() {
        let n = Notification::new("novamensaxe", "7");
        assert_eq!(n.message_id(), Ok(7));
    }

    #[test]
    fn non_numeric_payload_should_be_malformed() {
        let n = Notification::new("novamensaxe", "seven");
        assert_eq!(
            n.message_id(),
            Err(Error::MalformedPayload("seven".to_string()))
        );

        let n = Notification::new("novamensaxe", "");
        assert_eq!(n.message_id(), Err(Error::MalformedPayload(String::new())));
    }

    #[test]
    fn overflowing_payload_should_be_malformed() {
        let n = Notification::new("novamensaxe", "99999999999");
        assert!(matches!(n.message_id(), Err(Error::MalformedPayload(_))));
    }

    #[test]
    fn zero_and_negative_payloads_should_parse() {
        let n = Notification::new("novamensaxe", "0");
        assert_eq!(n.message_id(), Ok(0));

        let n = Notification::new("novamensaxe", "-5");
        assert_eq!(n.message_id(), Ok(-5));
    }
}
