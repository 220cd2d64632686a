use std::sync::Arc;
use tokio::{runtime::Handle, sync::Mutex};

use super::options::{ConnectOptions, DeliveryOptions};
use crate::{
    error::{Error, Result},
    path,
    protocol::{SmbConnector, SmbSession},
};

/// Establishes an authenticated session with a share server.
///
/// A single attempt is made. A refused handshake, a timeout or any other
/// library failure ends up as [`Error::Connection`].
pub async fn connect<C>(connector: &C, options: &ConnectOptions) -> Result<Connection<C::Session>>
where
    C: SmbConnector,
{
    info!(
        "Connecting to {} ({}:{})...",
        options.machine_name, options.ip, options.port
    );

    let mut session = connector.session(options);
    let failure = |source| {
        Error::connection(
            &options.machine_name,
            &options.ip,
            options.port,
            &options.domain,
            &options.user_name,
            source,
        )
    };

    match session.connect(&options.ip, options.port).await {
        Ok(true) => {}
        Ok(false) => {
            session.close().await;
            return Err(failure(None));
        }
        Err(error) => {
            warn!("connect to {} failed: {}", options.machine_name, error);
            session.close().await;
            return Err(failure(Some(error)));
        }
    }

    info!(
        "Connected to {} ({}:{}).",
        options.machine_name, options.ip, options.port
    );

    Ok(Connection::new(session))
}

/// Open session against one remote host.
///
/// Call [`Connection::close`] when done. A connection dropped without
/// being closed closes its session in the background if a Tokio runtime
/// is available.
pub struct Connection<S: SmbSession> {
    pub(crate) session: Arc<Mutex<S>>,
    pub(crate) remote_name: String,
    pub(super) delivery: DeliveryOptions,
    closed: bool,
}

impl<S: SmbSession> Connection<S> {
    pub(crate) fn new(session: S) -> Self {
        Self {
            remote_name: session.remote_name().to_owned(),
            session: Arc::new(Mutex::new(session)),
            delivery: DeliveryOptions::default(),
            closed: false,
        }
    }

    /// Display name of the remote host
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    pub const fn delivery_options(&self) -> &DeliveryOptions {
        &self.delivery
    }

    /// Replaces the options used by [`Connection::move_file`].
    pub fn set_delivery_options(&mut self, delivery: DeliveryOptions) {
        self.delivery = delivery;
    }

    #[must_use]
    pub fn with_delivery_options(mut self, delivery: DeliveryOptions) -> Self {
        self.delivery = delivery;
        self
    }

    /// Closes the underlying session.
    pub async fn close(mut self) {
        self.closed = true;
        self.session.lock().await.close().await;
        debug!("session with {} closed", self.remote_name);
    }

    /// `\\host\share\path` form of a remote object on this host.
    pub(crate) fn unc(&self, share: &str, file_path: &str) -> String {
        path::unc(&self.remote_name, share, file_path)
    }
}

impl<S: SmbSession> Drop for Connection<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        if let Ok(handle) = Handle::try_current() {
            let session = self.session.to_owned();

            let _ = handle.spawn(async move {
                session.lock().await.close().await;
            });
        }
    }
}
