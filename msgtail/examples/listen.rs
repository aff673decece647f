use std::time::Duration;

use msgtail::{NotificationSource, PgMailbox, SubscriptionChannel};

/// Print raw notifications published on the message channel, without
/// looking the rows up.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let mut mailbox = PgMailbox::connect(&url).await.unwrap();
    let _subscription = mailbox.open(abi::CHANNEL).await.unwrap();
    println!("Listening for {} events...", abi::CHANNEL);
    loop {
        for notification in mailbox.drain().await.unwrap() {
            println!("Received notification: {:?}", notification);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}
