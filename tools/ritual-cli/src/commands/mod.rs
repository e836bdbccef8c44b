//! CLI command implementations.

pub mod bag;
pub mod config;
pub mod replay;

use clap::{Args, Subcommand};
use ritual_bag::bag::ItemKey;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub product: String,

    /// Variant label (e.g. "50ml").
    #[arg(long)]
    pub variant: Option<String>,

    /// Display name.
    #[arg(short, long)]
    pub name: String,

    /// Unit price in major units (e.g. 42.00).
    #[arg(short, long, allow_hyphen_values = true)]
    pub price: f64,

    /// Image URL.
    #[arg(long, default_value = "")]
    pub image: String,
}

/// Arguments for the add-from-catalog command.
#[derive(Args)]
pub struct CatalogAddArgs {
    /// Product ID in the catalog fixture.
    pub product: String,

    /// Variant label.
    #[arg(long)]
    pub variant: Option<String>,
}

/// Identifies one bag line.
#[derive(Args)]
pub struct KeyArgs {
    /// Product ID.
    pub product: String,

    /// Variant label.
    #[arg(long)]
    pub variant: Option<String>,
}

impl KeyArgs {
    /// Line key for these arguments.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.product.as_str(), self.variant.as_deref())
    }
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub line: KeyArgs,

    /// New quantity; 0 or less removes the line.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for destructive commands.
#[derive(Args)]
pub struct ConfirmArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// JSON file holding an array of bag actions.
    pub file: String,

    /// Apply to the session's stored bag instead of a fresh one.
    #[arg(long)]
    pub persist: bool,

    /// Stop at the first rejected action.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Currency for new bags.
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
