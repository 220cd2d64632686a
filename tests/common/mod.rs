#![allow(dead_code)]

use std::{path::PathBuf, time::Duration};

use tempfile::TempDir;
use winshare::{
    connect,
    testing::{FakeSession, FakeSmbServer},
    ConnectOptions, Connection, DeliveryOptions,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn options() -> ConnectOptions {
    ConnectOptions::new("TestComputer", "127.0.0.1")
        .with_port(80)
        .with_domain("TestDomain")
        .with_credentials("TestUser", "TestPassword")
}

/// Connection on `server` that does not wait for new folders to settle.
pub async fn connection(server: &FakeSmbServer) -> Connection<FakeSession> {
    init_logging();
    connect(server, &options())
        .await
        .expect("fake server accepts connections")
        .with_delivery_options(DeliveryOptions::default().with_settle_delay(Duration::ZERO))
}

pub fn local_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("temp dir is writable");
    path
}
