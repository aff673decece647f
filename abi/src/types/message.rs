use std::fmt;

use crate::MessageId;

/// A row of the `mensaxes` table. Written by other clients, only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    #[sqlx(rename = "usuario")]
    pub sender: String,
    #[sqlx(rename = "mensaxe")]
    pub body: String,
}

impl Message {
    pub fn new(id: MessageId, sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            sender: sender.into(),
            body: body.into(),
        }
    }
}

/// console form: `sender:body`
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sender, self.body)
    }
}
