use clap::{Parser, Subcommand};
use food_store::{DbConfig, FoodStore, PgFoodStore, schema};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Administrative tasks for the food listings database.
#[derive(Parser, Debug)]
#[command(name = "food-admin")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and the foods table if they do not exist
    Setup,

    /// Delete every listing
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = DbConfig::from_env()?;

    match cli.command {
        Command::Setup => schema::initialize(&config).await?,
        Command::Clear => {
            let store = PgFoodStore::connect(&config).await?;
            let deleted = store.clear_all().await;
            store.pool().close().await;
            tracing::info!("removed {} listings", deleted?);
        }
    }

    Ok(())
}
