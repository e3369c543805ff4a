use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;

use spotbridge::{
    config, error,
    management::{CredentialBootstrapper, SessionManager},
    server,
    spotify::SpotifyClient,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the bridge HTTP server
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => serve().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

/// Resolves client credentials and runs the server.
///
/// Credential precedence: a complete static triple from the environment wins;
/// otherwise the remote configuration endpoint is polled with the bounded
/// retry policy. Bootstrap exhaustion is non-fatal - the server starts with
/// an uninitialized session and protected routes report it. There is no
/// operator path to inject credentials into a running uninitialized process;
/// set the static triple and restart instead.
async fn serve() {
    let session = Arc::new(Mutex::new(SessionManager::new()));

    if let Some(credentials) = config::static_credentials() {
        session
            .lock()
            .await
            .set_client(SpotifyClient::from_config(credentials));
    } else if let Some(url) = config::credentials_url() {
        let bootstrapper = CredentialBootstrapper::from_config(url);
        if let Some(credentials) = bootstrapper.run().await {
            session
                .lock()
                .await
                .set_client(SpotifyClient::from_config(credentials));
        }
    } else {
        warning!("No credentials configured; starting uninitialized.");
    }

    server::start_api_server(session).await;
}
