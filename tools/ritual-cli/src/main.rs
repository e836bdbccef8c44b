//! Ritual CLI - drive a persisted Ritual Bag from the terminal.
//!
//! Commands:
//! - `ritual add` - Add one unit of a product
//! - `ritual add-from-catalog` - Add a product using fixture catalog data
//! - `ritual remove` / `ritual update` / `ritual clear` - Edit lines
//! - `ritual show` / `ritual checkout` - Inspect the bag
//! - `ritual sessions` / `ritual discard` - Manage stored bags
//! - `ritual replay` - Apply a JSON script of bag actions
//! - `ritual config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    AddArgs, CatalogAddArgs, ConfigArgs, ConfirmArgs, KeyArgs, ReplayArgs, UpdateArgs,
};

/// Ritual CLI - inspect and edit a shopper's bag
#[derive(Parser)]
#[command(name = "ritual")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Session whose bag to use (overrides config)
    #[arg(short, long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the bag
    Add(AddArgs),

    /// Add a product using names and prices from the catalog fixture
    AddFromCatalog(CatalogAddArgs),

    /// Remove a line from the bag
    Remove(KeyArgs),

    /// Set the quantity of a line (0 or less removes it)
    Update(UpdateArgs),

    /// Remove every line from the bag
    Clear(ConfirmArgs),

    /// Show the bag lines and totals
    Show,

    /// Print the checkout snapshot
    Checkout,

    /// List sessions with a stored bag
    Sessions,

    /// Delete the stored bag for the session
    Discard(ConfirmArgs),

    /// Apply a JSON script of bag actions
    Replay(ReplayArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), cli.session.as_deref(), output)?;
    logging::init(&ctx.config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Add(args) => commands::bag::add(args, &ctx),
        Commands::AddFromCatalog(args) => commands::bag::add_from_catalog(args, &ctx),
        Commands::Remove(args) => commands::bag::remove(args, &ctx),
        Commands::Update(args) => commands::bag::update(args, &ctx),
        Commands::Clear(args) => commands::bag::clear(args, &ctx),
        Commands::Show => commands::bag::show(&ctx),
        Commands::Checkout => commands::bag::checkout(&ctx),
        Commands::Sessions => commands::bag::sessions(&ctx),
        Commands::Discard(args) => commands::bag::discard(args, &ctx),
        Commands::Replay(args) => commands::replay::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
