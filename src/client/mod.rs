//! High-level operations on a remote share.
//!
//! [`connect`] opens a [`Connection`], whose methods retrieve, deliver,
//! rename and list remote files. Every operation runs its steps one after
//! the other; nothing here coordinates concurrent operations on the same
//! path.

mod browse;
mod folder;
mod options;
mod session;
mod transfer;

pub use folder::{FolderStatus, FolderStrategy};
pub use options::{
    ConnectOptions, DeliveryOptions, Secret, DEFAULT_PORT, DEFAULT_SETTLE_DELAY,
    DEFAULT_TEMP_SUFFIX, DEFAULT_WRITE_TIMEOUT,
};
pub use session::{connect, Connection};
