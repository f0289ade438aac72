use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use nowplay::{Res, cli, config, error, spotify::SpotifyClient};

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
    /// Show the track playing right now, or the last one played
    Now(OutputOptions),

    /// Show the track playing right now
    Current(OutputOptions),

    /// Show the last played track
    Recent(RecentOptions),

    /// Check credentials by requesting an access token
    Token,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Print the record as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RecentOptions {
    /// Print the record as JSON
    #[clap(long)]
    pub json: bool,

    /// List the whole play history
    #[clap(long)]
    pub all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

/// Loads the environment and builds the client every command runs on.
async fn spotify_client() -> Res<SpotifyClient> {
    config::load_env().await?;
    let config = config::Config::from_env()?;
    Ok(SpotifyClient::new(config)?)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let spotify = match spotify_client().await {
        Ok(spotify) => spotify,
        Err(e) => error!("Cannot start. Err: {}", e),
    };

    match cli.command {
        Command::Now(opt) => cli::now(&spotify, opt.json).await,
        Command::Current(opt) => cli::current(&spotify, opt.json).await,
        Command::Recent(opt) => cli::recent(&spotify, opt.json, opt.all).await,
        Command::Token => cli::token(&spotify).await,
        Command::Completions(_) => {}
    }
}
