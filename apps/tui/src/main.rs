use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use spray_dashboard::api::ApiClient;
use spray_dashboard::app::{App, AppActions};
use spray_dashboard::cli::CliArgs;
use spray_dashboard::config::init_app_config;
use spray_dashboard::logging::{init_logging, LogTarget};
use spray_dashboard::{event, terminal};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;

    // Headless output goes to stdout, so only a real terminal gets the dashboard
    let headless = args.headless || args.json || !is_terminal();
    let log_target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(&config.log_file)
    };
    init_logging(config.debug, log_target)?;

    info!(api_url = %config.api_url, scheme = config.scheme.as_str(), "starting dashboard");

    let client = ApiClient::new(config.api_url.clone(), config.request_timeout)
        .map_err(|e| eyre!("Failed to build API client: {e}"))?;

    let mut app = App::new(config);
    app.start();

    if headless {
        return event::run_headless(&mut app, &client, args.json).await;
    }

    let (actions, mut responses) = AppActions::new(client);

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app, &actions, &mut responses).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
