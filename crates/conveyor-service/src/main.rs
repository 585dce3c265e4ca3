//! # Conveyor Service
//!
//! Binary entry point for the Conveyor polling service.
//!
//! This executable:
//! - Loads configuration from environment and files
//! - Initializes logging
//! - Constructs the queue client, worker invoker, and dead-letter router
//! - Starts the poller pool and runs it for the process lifetime
//!
//! Shutdown is an external process-level concern: the pool has no
//! cancellation path and the process is expected to be stopped by its
//! supervisor (systemd, the container runtime, and so on).

use anyhow::Context;
use conveyor_core::{AtomicMetrics, DeadLetterRouter, EngineConfig, PollerPool};
use conveyor_runtime::{LambdaInvoker, QueueClient, SqsQueueClient, WorkerInvoker};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "conveyor_service=info,conveyor_core=info,conveyor_runtime=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Conveyor Service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order — later sources override earlier ones):
    //  1. /etc/conveyor/service.yaml          — system-wide defaults
    //  2. ./config/service.yaml               — deployment-local override
    //  3. Path given by CONVEYOR_CONFIG_FILE  — operator-specified file
    //  4. Environment variables prefixed CONVEYOR__ (double-underscore
    //     separator), e.g. CONVEYOR__CONCURRENCY=8 sets concurrency = 8
    //
    // Every engine configuration field carries a serde default, so absent
    // files produce a config that only fails validation on the required
    // identifiers (queue URL, dead-letter queue, function name). A malformed
    // file or an environment variable that cannot be coerced to the correct
    // type IS a hard error because it indicates deliberate-but-broken
    // operator configuration.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/conveyor/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    // Optional explicit path supplied by the operator.
    if let Ok(explicit_path) = std::env::var("CONVEYOR_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "Loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(config::Environment::with_prefix("CONVEYOR").separator("__"))
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let engine_config: EngineConfig = match config.try_deserialize() {
        Ok(ec) => ec,
        Err(e) => {
            error!(
                error = %e,
                "Could not deserialize engine configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = engine_config.validate() {
        error!(error = %e, "Engine configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Construct AWS clients and engine components
    //
    // Credentials and region come from the default AWS provider chain
    // (environment, shared config files, instance metadata).
    // -------------------------------------------------------------------------
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let queue: Arc<dyn QueueClient> = Arc::new(SqsQueueClient::new(
        aws_sdk_sqs::Client::new(&aws_config),
        engine_config.queue_url.clone(),
    ));

    let invoker: Arc<dyn WorkerInvoker> = Arc::new(LambdaInvoker::new(
        aws_sdk_lambda::Client::new(&aws_config),
        engine_config.function_name.clone(),
    ));

    let dead_letter = Arc::new(DeadLetterRouter::new(
        Arc::clone(&queue),
        engine_config
            .dead_letter_queue_name()
            .context("dead-letter queue name failed validation")?,
    ));

    let metrics = Arc::new(AtomicMetrics::new());

    info!(
        queue_url = %engine_config.queue_url,
        dead_letter_queue = %engine_config.dead_letter_queue,
        function = %engine_config.function_name,
        concurrency = engine_config.concurrency,
        "Starting poller pool"
    );

    // -------------------------------------------------------------------------
    // Run the pool for the process lifetime
    //
    // `run` only returns in the degenerate case where supervision lost every
    // lane; that is fatal and handed to the process supervisor to restart.
    // -------------------------------------------------------------------------
    let pool = PollerPool::for_engine(
        engine_config.concurrency,
        engine_config.poller_settings(),
        queue,
        invoker,
        dead_letter,
        metrics,
    );

    let err = pool.run().await;
    error!(error = %err, "Poller pool terminated");
    Err(err.into())
}
