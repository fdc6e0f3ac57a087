//! # Waitlist Server
//!
//! The HTTP entry point of the waitlist: `Axum` routes over `SurrealDB` and the
//! XLSX export directory, served by `axum-server` with optional TLS.
//!
//! ## Example
//! ```no_run
//! use waitlist_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod logging;
mod router;
mod shutdown;

pub use logging::init_logger;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use waitlist::domain::config::{ApiConfig, SslConfig};
use waitlist::kernel::server::ApiState;
use waitlist_database::Database;

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Directory receiving the registrations workbook.
    pub fn export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.export.dir = dir.into();
        self
    }

    /// Opens the database session and applies every slice's schema scripts.
    async fn open_database(&self) -> Result<Database> {
        let db_cfg = &self.cfg.database;
        let mut builder =
            Database::builder().url(&db_cfg.url).session(&db_cfg.namespace, &db_cfg.database);

        if let Some(creds) = &db_cfg.credentials {
            builder = builder.auth(&creds.username, &creds.password);
        }
        for migrations in waitlist::MIGRATIONS {
            builder = builder.migrations(migrations);
        }

        builder.init().await.context("Failed to establish database connection")
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Checks the TLS files when TLS is configured
    /// 2. Connects to the database and applies migrations
    /// 3. Initializes the feature slices
    /// 4. Registers them in the shared [`ApiState`]
    ///
    /// # Errors
    /// Returns an error if:
    /// * The certificate or key file is missing
    /// * The database is unreachable or rejects the credentials
    /// * A migration fails or was altered after being applied
    /// * A feature slice rejects its configuration
    pub async fn build(self) -> Result<Server> {
        if let Some(ssl) = &self.cfg.server.ssl {
            check_tls_files(ssl)?;
        }

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(%address, "Initializing server");

        let db = self.open_database().await?;

        let slices = waitlist::init(&self.cfg, &db)
            .await
            .map_err(|e| anyhow!("Platform bootstrap failed: {e}"))?;

        let state = ApiState::builder()
            .config(self.cfg)
            .db(db)
            .register_slices(slices)
            .build()
            .context("Failed to finalize API state registry")?;

        Ok(Server { state })
    }
}

fn check_tls_files(ssl: &SslConfig) -> Result<()> {
    if !ssl.cert.exists() {
        anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
    }
    if !ssl.key.exists() {
        anyhow::bail!("SSL key not found at: {}", ssl.key.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = ssl.key.metadata()?.permissions().mode();
        if mode & 0o077 != 0 {
            warn!(key = %ssl.key.display(), "SSL private key is readable by others (expected 600)");
        }
    }
    Ok(())
}

/// A fully initialized server, returned by [`ServerBuilder::build`].
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    /// The complete application router: system, registration and docs routes.
    ///
    /// # Errors
    /// Returns an error if a feature slice the routes depend on was not registered.
    pub fn router(&self) -> Result<Router> {
        router::init(self.state.clone())
    }

    /// Serves until SIGINT or SIGTERM, then drains in-flight requests.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound or the TLS files cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let server_cfg = self.state.config.server.clone();
        let address = SocketAddr::new(server_cfg.address, server_cfg.port);
        let app = self.router()?.into_make_service();

        let handle = Handle::<SocketAddr>::new();
        shutdown::spawn_listener(handle.clone());

        match &server_cfg.ssl {
            Some(ssl) => {
                let tls = RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                    .await
                    .context("Failed to load SSL/TLS certificates")?;

                info!("Listening on https://{address}");
                axum_server::bind_rustls(address, tls)
                    .handle(handle)
                    .serve(app)
                    .await
                    .context("HTTPS server failed")?;
            },
            None => {
                info!("Listening on http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(app)
                    .await
                    .context("HTTP server failed")?;
            },
        }

        info!("Server shutdown complete");
        Ok(())
    }
}
