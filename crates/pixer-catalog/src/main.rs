use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pixer_catalog::{Entity, ListRequest, Registry, Settings};

#[derive(Parser)]
#[command(name = "pixer", version, about = "Query the catalog list endpoints")]
struct Cli {
    /// YAML settings file; built-in defaults when absent.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory holding the entity JSON files. Defaults to the settings
    /// `data_dir`, which is `data` relative to the working directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of an entity's records.
    List {
        /// tags, categories, types or shops.
        entity: Entity,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
        /// Filter as `key:value;key:value`, or a bare search term.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        order_by: Option<String>,
        /// asc or desc.
        #[arg(long)]
        sorted_by: Option<String>,
    },
    /// Print one record, looked up by id or slug.
    Show { entity: Entity, key: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.settings.as_deref()).context("loading settings")?;
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }
    let registry = Registry::new(settings).context("configuring catalogs")?;

    let output = match cli.command {
        Command::List {
            entity,
            page,
            limit,
            search,
            order_by,
            sorted_by,
        } => {
            let request = ListRequest {
                page,
                limit,
                search,
                order_by,
                sorted_by,
            };
            registry
                .list(entity, &request)
                .with_context(|| format!("listing {entity}"))?
        }
        Command::Show { entity, key } => registry
            .show(entity, &key)
            .with_context(|| format!("looking up {entity} '{key}'"))?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
