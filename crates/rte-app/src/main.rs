mod app;
mod cli;
mod headless;
mod output;
mod writer;

use std::process::ExitCode;

use rte_config::RteConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

/// Load the config named on the command line, or the platform default.
fn load_config(args: &cli::Args) -> (RteConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => rte_config::toml_loader::load_from_path(path),
        None => rte_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (RteConfig::default(), Some(e.to_string())),
    }
}

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

/// `--log-level debug` means `rte=debug`; a full directive passes through.
fn cli_directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("rte={level}")
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config comes first so its log level can seed the subscriber.
    let (config, config_error) = load_config(&args);
    let directive = args
        .log_level
        .as_deref()
        .map(cli_directive)
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    init_logging(&directive);

    tracing::info!("Smart RTE v{} starting...", env!("CARGO_PKG_VERSION"));
    match (&config_error, &args.config) {
        (Some(e), _) => tracing::warn!("Config load failed, using defaults: {e}"),
        (None, Some(path)) => tracing::info!("Using config override: {}", path.display()),
        (None, None) => {}
    }

    let initial_html = match &args.input {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(path = %path.display(), "Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => String::new(),
    };

    if args.headless {
        return match headless::run(&config, &initial_html, args.output.as_deref(), args.markdown) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Headless run failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut app = app::RteApp::new(config, initial_html, args.output, args.markdown);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
