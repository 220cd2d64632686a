use serde::Deserialize;
use std::{fmt, time::Duration};
use zeroize::Zeroize;

use super::folder::FolderStrategy;

pub const DEFAULT_PORT: u16 = 445;
pub const DEFAULT_TEMP_SUFFIX: &str = ".tmp";
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Password wrapper. Redacted in debug output and zeroed on drop.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Host identity and credentials of a share server.
///
/// Sessions always authenticate with NTLMv2 over direct TCP.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectOptions {
    /// NetBIOS name of the remote host, also used in every message
    pub machine_name: String,
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub domain: String,
    pub user_name: String,
    pub password: Secret,
    /// Name this client announces to the server
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_owned()
}

impl ConnectOptions {
    pub fn new<M, I>(machine_name: M, ip: I) -> Self
    where
        M: Into<String>,
        I: Into<String>,
    {
        Self {
            machine_name: machine_name.into(),
            ip: ip.into(),
            port: DEFAULT_PORT,
            domain: String::new(),
            user_name: String::new(),
            password: Secret::default(),
            client_name: default_client_name(),
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_domain<T: Into<String>>(mut self, domain: T) -> Self {
        self.domain = domain.into();
        self
    }

    #[must_use]
    pub fn with_credentials<U, P>(mut self, user_name: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        self.user_name = user_name.into();
        self.password = Secret::new(password);
        self
    }

    #[must_use]
    pub fn with_client_name<T: Into<String>>(mut self, client_name: T) -> Self {
        self.client_name = client_name.into();
        self
    }
}

/// Tuning of [`Connection::move_file`](super::Connection::move_file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Appended to the target name while the content is written.
    /// Empty means writing straight to the target, without atomicity.
    pub temp_suffix: String,
    /// Upper bound for the write step
    pub write_timeout: Duration,
    /// Wait after creating folders, for the server to make them usable
    pub settle_delay: Duration,
    pub folder_strategy: FolderStrategy,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_owned(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            folder_strategy: FolderStrategy::default(),
        }
    }
}

impl DeliveryOptions {
    #[must_use]
    pub fn with_temp_suffix<T: Into<String>>(mut self, temp_suffix: T) -> Self {
        self.temp_suffix = temp_suffix.into();
        self
    }

    #[must_use]
    pub const fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub const fn with_folder_strategy(mut self, folder_strategy: FolderStrategy) -> Self {
        self.folder_strategy = folder_strategy;
        self
    }
}
