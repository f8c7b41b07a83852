mod config;
mod ingredient_cmds;
mod plan_cmds;
mod recipe_cmds;
mod serve_cmd;
mod shopping_cmd;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use larder_core::menu::{CURRENT_PLAN_ID, MemoAutosave};
use larder_core::store::PgStore;
use larder_db::pool;

use config::LarderConfig;

#[derive(Parser)]
#[command(name = "larder", about = "Recipe catalog, weekly menu planner, and shopping-list builder")]
struct Cli {
    /// Database URL (overrides LARDER_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a larder config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/larder")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the larder database (requires config file or env vars)
    DbInit,
    /// Ingredient catalog management
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
    /// Recipe management
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Weekly plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Build the shopping list for the current plan
    Shopping,
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// Register a new catalog ingredient
    Add {
        /// Ingredient name (must be unique)
        name: String,
        /// Unit the ingredient is measured in (e.g. piece, gram, tablespoon)
        #[arg(long)]
        unit: String,
        /// Leave this ingredient off generated shopping lists
        #[arg(long)]
        exclude: bool,
    },
    /// List all catalog ingredients
    List,
    /// Delete an ingredient from the catalog
    Delete {
        /// Ingredient ID to delete
        id: String,
    },
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Create a recipe from a TOML file
    Create {
        /// Path to the recipe TOML file
        file: String,
    },
    /// List recipes, optionally filtered
    List {
        /// Only show recipes in this lane: main, side, or soup
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive title keyword
        #[arg(long)]
        query: Option<String>,
    },
    /// Show a recipe in full
    Show {
        /// Recipe ID to show
        id: String,
    },
    /// Replace a recipe from a TOML file
    Update {
        /// Recipe ID to update
        id: String,
        /// Path to the recipe TOML file
        file: String,
    },
    /// Export a recipe as TOML
    Export {
        /// Recipe ID to export
        id: String,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Delete a recipe
    Delete {
        /// Recipe ID to delete
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Assign a recipe to a plan slot
    Set {
        /// Slot key, e.g. mon-dinner-main
        slot: String,
        /// Recipe ID to place in the slot
        recipe_id: String,
    },
    /// Empty a plan slot
    Unset {
        /// Slot key, e.g. mon-dinner-main
        slot: String,
    },
    /// Show the current plan and memo
    Show,
    /// Remove every slot assignment and the memo
    Clear {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Set the plan memo
    Memo {
        /// Memo text
        text: String,
    },
}

/// Execute the `larder init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `larder db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `larder db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = LarderConfig::resolve(cli_db_url)?;

    println!("Initializing larder database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect to the target database.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    // 3. Run migrations.
    pool::run_migrations(&db_pool).await?;

    // 4. Print success with table counts.
    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    // 5. Clean shutdown.
    db_pool.close().await;

    println!("larder db-init complete.");
    Ok(())
}

async fn connect(cli_db_url: Option<&str>) -> anyhow::Result<PgPool> {
    let resolved = LarderConfig::resolve(cli_db_url)?;
    pool::create_pool(&resolved.db_config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Ingredient { command } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = ingredient_cmds::run_ingredient_command(command, &store).await;
            db_pool.close().await;
            result?;
        }
        Commands::Recipe { command } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = recipe_cmds::run_recipe_command(command, &store).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = plan_cmds::run_plan_command(command, &store).await;
            db_pool.close().await;
            result?;
        }
        Commands::Shopping => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = shopping_cmd::run_shopping(&store).await;
            db_pool.close().await;
            result?;
        }
        Commands::Serve { bind, port } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let store: Arc<dyn larder_core::store::Store> =
                Arc::new(PgStore::new(db_pool.clone()));
            let autosave = Arc::new(MemoAutosave::new(
                Arc::clone(&store),
                CURRENT_PLAN_ID,
                MemoAutosave::DEFAULT_DELAY,
            ));
            let state = serve_cmd::AppState { store, autosave };
            let result = serve_cmd::run_serve(state, &bind, port).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
