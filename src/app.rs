use std::io::Write;

use actix_web::web;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::browser::open_browser;
use crate::infrastructure::config::{ConfigService, DashboardConfig};
use crate::infrastructure::dataset::DatasetLoader;
use crate::interfaces::http::{start_server, HttpState, SessionRegistry};

/// Process entry: serve the dashboard until shutdown. Never panics on
/// startup faults; they are logged and reported before the final message.
pub fn run() {
    let outcome = launch();
    if let Err(err) = &outcome {
        init_tracing("info");
        error!(error = %err, "Dashboard failed");
    }
    report(&outcome, &mut std::io::stdout(), &mut std::io::stderr());
}

/// User-facing outcome: the fault, if any, then the stop message
fn report(outcome: &Result<()>, out: &mut impl Write, err: &mut impl Write) {
    if let Err(fault) = outcome {
        let _ = writeln!(err, "Une erreur s'est produite : {}", fault);
    }
    let _ = writeln!(out, "Serveur arrêté.");
}

/// `RUST_LOG` wins over the configured filter
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn launch() -> Result<()> {
    let config = ConfigService::load()?;
    init_tracing(&config.log_filter);
    launch_with(config)
}

fn launch_with(config: DashboardConfig) -> Result<()> {
    // Schema errors abort here, before any request is served
    let dataset = DatasetLoader::new(config.dataset.clone(), config.schema.clone()).load()?;
    let registry = SessionRegistry::new(dataset, config.server.max_sessions);
    let state = web::Data::new(HttpState::new(registry));

    actix_web::rt::System::new().block_on(serve(state, config))
}

async fn serve(state: web::Data<HttpState>, config: DashboardConfig) -> Result<()> {
    let server = start_server(state, &config.server)?;
    let url = config.server.url();

    if config.server.open_browser {
        if let Err(err) = open_browser(&url) {
            warn!(error = %err, url = %url, "Could not open browser");
        }
    }
    info!(url = %url, "Dashboard listening");

    server.await?;
    Ok(())
}
