use std::io;

use crate::MessageId;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to provision {object}: `{source}`")]
    ProvisionError {
        object: &'static str,
        source: sqlx::Error,
    },

    #[error("Failed to listen on channel `{channel}`: `{source}`")]
    SubscribeError { channel: String, source: sqlx::Error },

    #[error("Failed to unlisten channel `{channel}`: `{source}`")]
    UnsubscribeError { channel: String, source: sqlx::Error },

    #[error("Database error: `{0}`")]
    DbError(sqlx::Error),

    #[error("No message found by id `{0}`")]
    NotFound(MessageId),

    #[error("Malformed notification payload: `{0}`")]
    MalformedPayload(String),

    #[error("Connection lost while listening on `{0}`")]
    ConnectionLost(String),

    #[error("Wait between polls was interrupted")]
    InterruptedWait,

    #[error("Failed to write message: `{0}`")]
    OutputError(#[from] io::Error),

    #[error("Failed to read configuration file")]
    ConfigReadError,

    #[error("Failed to parse configuration file")]
    ConfigParseError,

    #[error("Invalid poll interval: `{0}`ms")]
    InvalidInterval(u64),
}

impl Error {
    /// Errors scoped to a single notification. The poll loop reports them and
    /// moves on to the next one.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::MalformedPayload(_))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // driver errors are compared by kind only
            (Error::DbError(_), Error::DbError(_)) => true,
            (Error::OutputError(_), Error::OutputError(_)) => true,
            (Error::ProvisionError { object: o1, .. }, Error::ProvisionError { object: o2, .. }) => {
                o1 == o2
            }
            (Error::SubscribeError { channel: c1, .. }, Error::SubscribeError { channel: c2, .. }) => {
                c1 == c2
            }
            (
                Error::UnsubscribeError { channel: c1, .. },
                Error::UnsubscribeError { channel: c2, .. },
            ) => c1 == c2,
            (Error::NotFound(v1), Error::NotFound(v2)) => v1 == v2,
            (Error::MalformedPayload(v1), Error::MalformedPayload(v2)) => v1 == v2,
            (Error::ConnectionLost(v1), Error::ConnectionLost(v2)) => v1 == v2,
            (Error::InterruptedWait, Error::InterruptedWait) => true,
            (Error::ConfigReadError, Error::ConfigReadError) => true,
            (Error::ConfigParseError, Error::ConfigParseError) => true,
            (Error::InvalidInterval(v1), Error::InvalidInterval(v2)) => v1 == v2,
            _ => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::DbError(e)
    }
}
