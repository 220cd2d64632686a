//! Access to Windows file shares from other hosts.
//!
//! SMB itself is left to a client library plugged in through the
//! [`protocol`] traits. On top of it this crate retrieves files, delivers
//! them atomically (write under a temporary name, then rename), lists and
//! renames remote entries, and probes connections for health checks.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

mod error;
pub mod client;
pub mod health;
pub mod path;
pub mod protocol;
pub mod testing;

pub use client::{
    connect, ConnectOptions, Connection, DeliveryOptions, FolderStatus, FolderStrategy, Secret,
};
pub use error::{Error, Result};
pub use health::{HealthCheck, HealthReport, HealthStatus};
pub use protocol::{SearchAttributes, SessionError, SharedFile, SmbConnector, SmbSession};
