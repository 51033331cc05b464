//! # Yatube manage
//!
//! Administrative commands that are not exposed over HTTP, such as creating
//! the groups posts can be filed under.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use yatube_core::domain::NewGroup;
use yatube_core::ports::{BaseRepository, GroupRepository};
use yatube_infra::database::PostgresGroupRepository;
use yatube_infra::{DatabaseConfig, DatabaseConnections};

#[derive(Debug, Parser)]
#[command(name = "manage", about = "Yatube back-office commands")]
struct Cli {
    /// Database URL, defaults to `DATABASE_URL`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a group. The slug is derived from the title when omitted.
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all groups.
    ListGroups,
    /// Delete a group. Its posts stay and lose their group.
    DeleteGroup {
        #[arg(long)]
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let cli = Cli::parse();
    let connections = DatabaseConnections::init(&DatabaseConfig {
        url: cli.database_url.clone(),
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .context("failed to connect to the database")?;
    let groups = PostgresGroupRepository::new(connections.main);

    match cli.command {
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let new_group = NewGroup::new(title, slug.as_deref(), description)?;
            let group = groups.create(new_group).await?;
            println!("Created group '{}' with slug '{}'", group.title, group.slug);
        }
        Command::ListGroups => {
            for group in groups.list_all().await? {
                println!("{}\t{}\t{}", group.id, group.slug, group.title);
            }
        }
        Command::DeleteGroup { slug } => {
            let group = groups
                .find_by_slug(&slug)
                .await?
                .with_context(|| format!("no group with slug '{slug}'"))?;
            BaseRepository::<yatube_core::domain::Group, i64>::delete(&groups, group.id).await?;
            println!("Deleted group '{}'", group.title);
        }
    }

    Ok(())
}
