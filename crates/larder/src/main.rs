//! Larder CLI - nutrition database access over OAuth 1.0a.
//!
//! Provides commands for:
//! - `credentials`: store consumer credentials
//! - `auth`: authorize a user (interactive or two-step)
//! - `status`: show authorization state
//! - `foods`, `recipes`, `diary`, `profile`, `call`: API access

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AuthCommand, CallArgs, Context, CredentialsCommand, DiaryCommand, FoodsCommand, GlobalArgs,
    RecipesCommand,
};
use error::CliError;
use output::Output;

/// Larder - FatSecret nutrition database from the command line.
#[derive(Parser)]
#[command(name = "larder", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored credentials.
    #[command(subcommand)]
    Credentials(CredentialsCommand),
    /// Authorize access to the user's diary and profile.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Show authorization state.
    Status,
    /// Search and inspect foods.
    #[command(subcommand)]
    Foods(FoodsCommand),
    /// Search and inspect recipes.
    #[command(subcommand)]
    Recipes(RecipesCommand),
    /// Read and write the food diary.
    #[command(subcommand)]
    Diary(DiaryCommand),
    /// Show the user's profile.
    Profile,
    /// Call any API method with key=value parameters.
    Call(CallArgs),
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::new(&cli.global)?;
    match cli.command {
        Commands::Credentials(cmd) => cmd.execute(&ctx),
        Commands::Auth(cmd) => cmd.execute(&ctx),
        Commands::Status => commands::status::execute(&ctx),
        Commands::Foods(cmd) => cmd.execute(&ctx),
        Commands::Recipes(cmd) => cmd.execute(&ctx),
        Commands::Diary(cmd) => cmd.execute(&ctx),
        Commands::Profile => commands::profile::execute(&ctx),
        Commands::Call(args) => args.execute(&ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
