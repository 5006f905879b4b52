//! larder CLI
//!
//! Command-line interface for larder - household inventory and shopping
//! list tracking.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use larder_core::{ListId, Store, Unit, INVENTORY_LIST_ID, SHOPPING_LIST_ID};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "larder - household inventory and shopping list tracking")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Add an amount of an item to the inventory
    Add {
        /// Item name
        name: String,
        /// Amount to add
        amount: i64,
        /// Unit, when the name alone is ambiguous
        #[arg(short, long)]
        unit: Option<UnitArg>,
    },
    /// Consume an amount of an item from the inventory
    Consume {
        /// Item name
        name: String,
        /// Amount to consume
        amount: i64,
        /// Unit, when the name alone is ambiguous
        #[arg(short, long)]
        unit: Option<UnitArg>,
    },
    /// Manage the shopping list
    Shop {
        #[command(subcommand)]
        command: ShopCommands,
    },
    /// Show a list (defaults to the active list)
    #[command(alias = "ls")]
    List {
        /// Which list to show
        which: Option<ListName>,
        /// Only show items whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Switch the active list
    Use {
        /// The list to make active
        which: ListName,
    },
    /// Export the dataset as CSV
    Export {
        /// Target file (defaults to export.csv in the export directory)
        path: Option<PathBuf>,
    },
    /// Replace the dataset with the contents of a CSV file
    Import {
        /// Source file (defaults to export.csv in the export directory)
        path: Option<PathBuf>,
    },
    /// Delete all items and empty both lists
    Reset,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (storage location, item and list counts)
    Status,
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Create a new item
    #[command(alias = "add")]
    Create {
        /// Item name
        name: String,
        /// Measuring unit
        #[arg(short, long)]
        unit: UnitArg,
        /// Critical value (defaults per unit)
        #[arg(short, long)]
        critical: Option<i64>,
        /// Default restock value (defaults per unit)
        #[arg(short, long = "default")]
        default_value: Option<i64>,
    },
    /// List all items
    #[command(alias = "ls")]
    List {
        /// Only show items whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Edit an item's critical and default values
    Edit {
        /// Item name
        name: String,
        /// Unit, when the name alone is ambiguous
        #[arg(short, long)]
        unit: Option<UnitArg>,
        /// New critical value (negative resets to the unit default)
        #[arg(short, long)]
        critical: Option<i64>,
        /// New default restock value (negative resets to the unit default)
        #[arg(short, long = "default")]
        default_value: Option<i64>,
    },
}

#[derive(Subcommand)]
enum ShopCommands {
    /// Put an item on the shopping list
    Add {
        /// Item name
        name: String,
        /// Unit, when the name alone is ambiguous
        #[arg(short, long)]
        unit: Option<UnitArg>,
    },
    /// Take an item off the shopping list
    #[command(alias = "rm")]
    Remove {
        /// Item name
        name: String,
        /// Unit, when the name alone is ambiguous
        #[arg(short, long)]
        unit: Option<UnitArg>,
    },
    /// Move a bought item from the shopping list into the inventory
    Buy {
        /// Item name
        name: String,
        /// Bought amount (defaults to the item's default value)
        amount: Option<i64>,
        /// Unit, when the name alone is ambiguous
        #[arg(short, long)]
        unit: Option<UnitArg>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, export_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Measuring unit as a CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    /// Mass, in grams
    Gram,
    /// Volume, in milliliters
    Milliliter,
    /// Count, in pieces
    Piece,
}

impl From<UnitArg> for Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Gram => Unit::Gram,
            UnitArg::Milliliter => Unit::Milliliter,
            UnitArg::Piece => Unit::Piece,
        }
    }
}

/// One of the two fixed lists
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListName {
    Inventory,
    Shopping,
}

impl From<ListName> for ListId {
    fn from(name: ListName) -> Self {
        match name {
            ListName::Inventory => INVENTORY_LIST_ID,
            ListName::Shopping => SHOPPING_LIST_ID,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config doesn't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let mut store = Store::open()?;

    // Mutating commands persist the dataset afterwards; everything else
    // is read-only
    let is_write = matches!(
        &cli.command,
        Commands::Item {
            command: ItemCommands::Create { .. } | ItemCommands::Edit { .. }
        } | Commands::Add { .. }
            | Commands::Consume { .. }
            | Commands::Shop { .. }
            | Commands::Use { .. }
            | Commands::Import { .. }
            | Commands::Reset
    );

    let result = match cli.command {
        Commands::Item { command } => handle_item_command(command, &mut store, &output),
        Commands::Add { name, amount, unit } => {
            commands::inventory::add(&mut store, &name, amount, unit.map(Into::into), &output)
        }
        Commands::Consume { name, amount, unit } => {
            commands::inventory::consume(&mut store, &name, amount, unit.map(Into::into), &output)
        }
        Commands::Shop { command } => handle_shop_command(command, &mut store, &output),
        Commands::List { which, filter } => {
            commands::view::list(&store, which.map(Into::into), filter, &output)
        }
        Commands::Use { which } => commands::view::use_list(&mut store, which.into(), &output),
        Commands::Export { path } => commands::data::export(&store, path, &output),
        Commands::Import { path } => commands::data::import(&mut store, path, &output),
        Commands::Reset => commands::data::reset(&mut store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
    };

    if is_write && result.is_ok() {
        store.save()?;
        tracing::debug!("dataset saved");
    }

    result
}

fn handle_item_command(command: ItemCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        ItemCommands::Create {
            name,
            unit,
            critical,
            default_value,
        } => commands::item::create(store, name, unit.into(), critical, default_value, output),
        ItemCommands::List { filter } => commands::item::list(store, filter, output),
        ItemCommands::Edit {
            name,
            unit,
            critical,
            default_value,
        } => commands::item::edit(
            store,
            &name,
            unit.map(Into::into),
            critical,
            default_value,
            output,
        ),
    }
}

fn handle_shop_command(command: ShopCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        ShopCommands::Add { name, unit } => {
            commands::shopping::add(store, &name, unit.map(Into::into), output)
        }
        ShopCommands::Remove { name, unit } => {
            commands::shopping::remove(store, &name, unit.map(Into::into), output)
        }
        ShopCommands::Buy { name, amount, unit } => {
            commands::shopping::buy(store, &name, amount, unit.map(Into::into), output)
        }
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
