mod config;
mod error;
mod types;

pub use config::*;
pub use error::Error;
pub use types::*;

pub type MessageId = i32;

/// channel the trigger publishes new message ids on
pub const CHANNEL: &str = "novamensaxe";
/// table holding the messages written by other clients
pub const MESSAGE_TABLE: &str = "mensaxes";
pub const NOTIFY_FUNCTION: &str = "notificar_mensaxe";
pub const NOTIFY_TRIGGER: &str = "not_nova_mensaxe";
