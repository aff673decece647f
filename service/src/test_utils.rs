use std::{ops::Deref, time::Duration};

use abi::Config;
use msgtail::BoundedPollLoop;
use sqlx::{postgres::PgPoolOptions, PgPool};
use sqlx_db_test::TestDb;

#[derive(Debug)]
pub struct TestConfig {
    pub config: Config,
    #[allow(dead_code)]
    tdb: TestDb,
}

impl Deref for TestConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

impl TestConfig {
    pub fn new() -> Self {
        let mut config = Config::load("fixtures/config.yml").unwrap();

        let tdb = TestDb::new(
            &config.db.host,
            config.db.port,
            &config.db.user,
            &config.db.password,
        );

        config.db.dbname = tdb.dbname.clone();
        Self { config, tdb }
    }

    pub fn url(&self) -> String {
        self.config.db.get_url()
    }

    /// a second connection, standing in for the clients that write messages
    pub async fn writer_pool(&self) -> PgPool {
        PgPoolOptions::new()
            .max_connections(1)
            .connect(&self.url())
            .await
            .unwrap()
    }

    /// the configured loop with the window shrunk to `duration`, so a test
    /// does not sit through whole minutes
    pub fn short_poll(&self, duration: Duration) -> BoundedPollLoop {
        let interval = self.config.listen.interval().min(duration / 10);
        BoundedPollLoop::new(abi::CHANNEL, duration, interval)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self::new()
    }
}
