//! Liveness probe of an open connection.
//!
//! Reports follow the vocabulary of the
//! [health check response format](https://inadarei.github.io/rfc-healthcheck/).

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{client::Connection, protocol::SmbSession};

/// Overall status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Pass,
    /// Part of the response format, never produced by the echo probe
    Warn,
    Fail,
}

/// Details of one probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub component_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_value: Option<String>,
    pub status: HealthStatus,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Probes keyed by `{component}:echo`
    pub checks: BTreeMap<String, HealthCheck>,
}

impl<S: SmbSession> Connection<S> {
    /// Sends an empty echo request to the server.
    ///
    /// Failures are part of the returned report, never raised.
    pub async fn check(&self, component: &str) -> HealthReport {
        self.check_at(component, Utc::now).await
    }

    /// Same as [`Connection::check`], with the report time taken from `clock`.
    pub async fn check_at<F>(&self, component: &str, clock: F) -> HealthReport
    where
        F: FnOnce() -> DateTime<Utc>,
    {
        let echoed = self.session.lock().await.echo(Bytes::new()).await;
        let time = clock().to_rfc3339_opts(SecondsFormat::Micros, true);

        let check = match echoed {
            Ok(payload) => HealthCheck {
                component_type: self.remote_name.clone(),
                observed_value: Some(String::from_utf8_lossy(&payload).into_owned()),
                status: HealthStatus::Pass,
                time,
                output: None,
            },
            Err(error) => {
                warn!("echo to {} failed: {}", self.remote_name, error);
                HealthCheck {
                    component_type: self.remote_name.clone(),
                    observed_value: None,
                    status: HealthStatus::Fail,
                    time,
                    output: Some(error.to_string()),
                }
            }
        };

        HealthReport {
            status: check.status,
            checks: BTreeMap::from([(format!("{component}:echo"), check)]),
        }
    }
}
