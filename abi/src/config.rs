use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub listen: ListenConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub dbname: String,
}

/// How long to watch the channel and how often to look at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_duration_mins")]
    pub duration_mins: u64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_port() -> u16 {
    5432
}

fn default_duration_mins() -> u64 {
    1
}

fn default_interval_ms() -> u64 {
    1000
}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(filename.as_ref()).map_err(|_| Error::ConfigReadError)?;
        let config: Config = serde_yaml::from_str(&content).map_err(|_| Error::ConfigParseError)?;
        config.listen.validate()?;
        Ok(config)
    }
}

impl DbConfig {
    pub fn server_url(&self) -> String {
        if self.password.is_empty() {
            format!("postgres://{}@{}:{}", self.user, self.host, self.port)
        } else {
            format!(
                "postgres://{}:{}@{}:{}",
                self.user, self.password, self.host, self.port
            )
        }
    }

    pub fn get_url(&self) -> String {
        format!("{}/{}", self.server_url(), self.dbname)
    }
}

impl ListenConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_mins * 60)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.interval_ms == 0 {
            return Err(Error::InvalidInterval(self.interval_ms));
        }
        Ok(())
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            duration_mins: default_duration_mins(),
            interval_ms: default_interval_ms(),
        }
    }
}
