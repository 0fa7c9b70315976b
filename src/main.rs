use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use bakery::{ConfigLoader, Loader, Result};

/// Load a tree of datalog recipes and print it as JSON
#[derive(Parser, Debug)]
#[command(name = "bakery")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Root directory of the recipe tree
    root: PathBuf,

    /// TOML settings file layered over the defaults and BAKERY_* variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reject text after the last terminated statement
    #[arg(long)]
    strict: bool,

    /// Reject duplicate recipe names within a cookbook
    #[arg(long)]
    unique: bool,

    /// Walk directories in file name order
    #[arg(long)]
    sorted: bool,

    /// Print only this cookbook
    #[arg(long)]
    cookbook: Option<String>,

    /// Print only this recipe of the selected cookbook
    #[arg(long, requires = "cookbook", conflicts_with = "merged")]
    recipe: Option<String>,

    /// Print the selected cookbook merged into one recipe
    #[arg(long, requires = "cookbook")]
    merged: bool,
}

fn settings(cli: &Cli) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().with_env();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if cli.strict {
        loader = loader.set_override("termination", "strict")?;
    }
    if cli.unique {
        loader = loader.set_override("unique_recipe_names", true)?;
    }
    if cli.sorted {
        loader = loader.set_override("sort_entries", true)?;
    }
    Ok(loader)
}

fn print<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "cannot serialize output");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match settings(&cli).and_then(ConfigLoader::build) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid settings");
            return ExitCode::FAILURE;
        }
    };
    let bakery = match Loader::new(config).bakery(&cli.root) {
        Ok(bakery) => bakery,
        Err(e) => {
            error!(error = %e, root = %cli.root.display(), "cannot load recipes");
            return ExitCode::FAILURE;
        }
    };

    let Some(name) = &cli.cookbook else {
        // sorted so repeated runs print the same document
        let cookbooks: BTreeMap<_, _> = bakery.iter().collect();
        return print(&cookbooks);
    };
    let cookbook = bakery.cookbook(name);
    if cli.merged {
        return print(&cookbook.merged());
    }
    match &cli.recipe {
        Some(recipe) => match cookbook.find(recipe) {
            Some(recipe) => print(recipe),
            None => {
                error!(cookbook = %name, recipe = %recipe, "recipe not found");
                ExitCode::FAILURE
            }
        },
        None => print(cookbook),
    }
}
