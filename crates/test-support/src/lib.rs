use anyhow::Context as _;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Kills the wrapped child process when dropped so a failing test never leaks a server.
pub struct KillOnDrop(pub tokio::process::Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.start_kill();
    }
}

/// An in-process stand-in for the Warpmetrics API, served on an ephemeral localhost port.
///
/// The server shuts down when the handle is dropped.
pub struct MockApi {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockApi {
    /// Bind `127.0.0.1:0` and serve `app` in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
    /// local address cannot be read.
    pub async fn start(app: Router) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind ephemeral port")?;
        let addr = listener.local_addr().context("read local addr")?;
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            shutdown: Some(tx),
        })
    }

    /// `http://127.0.0.1:<port>`, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A localhost URL with nothing listening on it. The port is bound, then released.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails.
pub async fn closed_local_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind ephemeral port")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
