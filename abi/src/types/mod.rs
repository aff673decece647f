mod message;
mod notification;

pub use message::Message;
pub use notification::Notification;
