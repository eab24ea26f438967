//! Startup orchestration.
//!
//! ```text
//! Start ─▶ ConfigLoaded ─▶ DbConnected ─▶ RoutesRegistered ─▶ Ready
//!   │           │
//!   └───────────┴──▶ Failed(step)
//! ```
//!
//! The bootstrapper never returns an error: it logs what went wrong and
//! hands back a [`Startup`] in the `Failed` stage. Only a `Ready` startup
//! holds an [`HttpServer`], so a failed one has nothing to serve and its
//! run methods refuse.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::assets::AssetDirs;
use crate::auth::{Authenticator, StaticCredentials};
use crate::config::{load_config, AppConfig, ConfigError};
use crate::http::server::{AppState, HttpServer};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::Logger;
use crate::store::{Connector, Store};

const CONTEXT: &str = "startup";

/// Startup steps that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStep {
    LoadConfig,
    ConnectDatabase,
}

impl fmt::Display for FailedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedStep::LoadConfig => f.write_str("configuration load"),
            FailedStep::ConnectDatabase => f.write_str("database connection"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigLoaded,
    DbConnected,
    RoutesRegistered,
    Ready,
    Failed(FailedStep),
}

/// Which steps completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub config_loaded: bool,
    pub db_connected: bool,
    pub routes_registered: bool,
}

impl BootstrapOutcome {
    pub fn is_runnable(&self) -> bool {
        self.config_loaded && self.db_connected && self.routes_registered
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection error: {0}")]
    Connection(String),

    #[error("refusing to serve: startup failed at {0}")]
    NotReady(FailedStep),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the startup sequence.
pub struct Bootstrapper<C> {
    config_path: PathBuf,
    connector: C,
    logger: Arc<Logger>,
    authenticator: Arc<dyn Authenticator>,
}

impl<C: Connector> Bootstrapper<C> {
    pub fn new(config_path: impl Into<PathBuf>, connector: C, logger: Arc<Logger>) -> Self {
        Self {
            config_path: config_path.into(),
            connector,
            logger,
            authenticator: Arc::new(StaticCredentials),
        }
    }

    /// Replace the built-in credential pairs.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub async fn bootstrap(self) -> Startup {
        let mut startup = Startup {
            stage: Stage::Start,
            outcome: BootstrapOutcome::default(),
            server: None,
            error: None,
            logger: self.logger.clone(),
        };
        self.logger.info_ctx("Bootstrap started", CONTEXT);

        // 1. Configuration
        let config = match self.load_config() {
            Ok(config) => config,
            Err(e) => return startup.fail(FailedStep::LoadConfig, e.into()),
        };
        startup.advance(Stage::ConfigLoaded);
        startup.outcome.config_loaded = true;
        self.apply_logging(&config);

        // 2. Database
        self.logger.info_ctx(
            format_args!("Connecting to database ({})...", config.database.descriptor()),
            CONTEXT,
        );
        let store: Arc<dyn Store> = match self.connector.connect(&config.database).await {
            Ok(store) => store,
            Err(e) => {
                self.logger
                    .error_ctx(format_args!("Failed to connect to database: {}", e), CONTEXT);
                return startup.fail(
                    FailedStep::ConnectDatabase,
                    StartupError::Connection(e.to_string()),
                );
            }
        };
        self.logger.info_ctx("Connected to database successfully", CONTEXT);
        startup.advance(Stage::DbConnected);
        startup.outcome.db_connected = true;

        // 3. Port
        let port = config.server.port;
        self.logger
            .info_ctx(format_args!("Server configured for port: {}", port), CONTEXT);

        // 4. Routes
        let state = AppState {
            store,
            logger: self.logger.clone(),
            authenticator: self.authenticator.clone(),
            assets: Arc::new(AssetDirs::new(config.server.assets_dirs.clone())),
        };
        let server = HttpServer::new(state, config.server.bind_address.clone(), port);
        self.logger.info_ctx("Routes configured successfully", CONTEXT);
        startup.advance(Stage::RoutesRegistered);
        startup.outcome.routes_registered = true;

        startup.server = Some(server);
        startup.advance(Stage::Ready);
        startup
    }

    fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let result = load_config(&self.config_path);
        match &result {
            Ok(_) => self.logger.info_ctx(
                format_args!("Config file loaded: {}", self.config_path.display()),
                CONTEXT,
            ),
            Err(ConfigError::Io { source, .. }) => self.logger.error_ctx(
                format_args!(
                    "Cannot open config file: {} ({})",
                    self.config_path.display(),
                    source
                ),
                CONTEXT,
            ),
            Err(e) => self.logger.error_ctx(format_args!("Config error: {}", e), CONTEXT),
        }
        result
    }

    fn apply_logging(&self, config: &AppConfig) {
        if let Some(logging) = &config.logging {
            self.logger.init(&logging.file, logging.level);
            self.logger.enable_console(logging.console);
            if !self.logger.file_enabled() {
                self.logger.warning_ctx(
                    format_args!("Cannot open log file {}, file logging disabled", logging.file.display()),
                    CONTEXT,
                );
            }
            self.logger.info_ctx(
                format_args!("Logging reconfigured: level={} file={}", logging.level, logging.file.display()),
                CONTEXT,
            );
        }
    }
}

/// Result of a bootstrap run.
pub struct Startup {
    stage: Stage,
    outcome: BootstrapOutcome,
    server: Option<HttpServer>,
    error: Option<StartupError>,
    logger: Arc<Logger>,
}

impl Startup {
    fn advance(&mut self, stage: Stage) {
        self.logger
            .debug_ctx(format_args!("Startup stage: {:?}", stage), CONTEXT);
        self.stage = stage;
    }

    fn fail(mut self, step: FailedStep, error: StartupError) -> Self {
        self.stage = Stage::Failed(step);
        self.error = Some(error);
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn outcome(&self) -> BootstrapOutcome {
        self.outcome
    }

    pub fn is_ready(&self) -> bool {
        self.stage == Stage::Ready
    }

    /// Why startup failed, if it did.
    pub fn error(&self) -> Option<&StartupError> {
        self.error.as_ref()
    }

    /// Configured listen port, once known.
    pub fn port(&self) -> Option<u16> {
        self.server.as_ref().map(HttpServer::port)
    }

    /// Bind the configured address and serve until SIGINT/SIGTERM.
    pub async fn run(self) -> Result<(), StartupError> {
        let (server, logger) = self.into_server()?;
        let address = server.address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                logger.error_ctx(format_args!("Cannot bind {}: {}", address, e), CONTEXT);
                return Err(e.into());
            }
        };
        server.run(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn run_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (server, _) = self.into_server()?;
        server.run(listener, shutdown).await?;
        Ok(())
    }

    fn into_server(self) -> Result<(HttpServer, Arc<Logger>), StartupError> {
        match (self.stage, self.server) {
            (Stage::Ready, Some(server)) => Ok((server, self.logger)),
            (stage, _) => {
                let step = match stage {
                    Stage::Failed(step) => step,
                    _ => FailedStep::LoadConfig,
                };
                self.logger.error_ctx(
                    format_args!("Server not started: bootstrap failed at {}", step),
                    CONTEXT,
                );
                Err(StartupError::NotReady(step))
            }
        }
    }
}
