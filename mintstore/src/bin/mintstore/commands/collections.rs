use anyhow::Result;
use clap::Subcommand;
use mintstore::{Collection, CollectionPatch, MarketStore, Pagination, RawPayload};

use super::{read_json, read_payload, report_created, report_found, report_listing};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Browse",
        commands: &[
            "mintstore collections list --limit 10 --offset 10   # Second page of ten",
            "mintstore collections trending --limit 3            # Highest floor prices",
            "mintstore collections by-creator 2                  # Collections by user 2",
        ],
    },
    ExampleGroup {
        title: "Mutations",
        commands: &[
            r#"mintstore collections create --json '{"name": "Drops", "image": "https://img.example/d.png", "creatorId": 1}'"#,
            r#"mintstore collections update 1 --json '{"floorPrice": "0.6"}'"#,
        ],
    },
];

#[derive(Subcommand)]
pub enum CollectionsCommands {
    /// List collections in insertion order
    #[command(name = "list")]
    List {
        /// Maximum number of collections (0 = all)
        #[arg(long)]
        limit: Option<usize>,

        /// Number of collections to skip
        #[arg(long)]
        offset: Option<usize>,
    },

    /// List collections by floor price, highest first
    #[command(name = "trending")]
    Trending {
        /// Maximum number of collections (defaults to listings.trending_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a collection by id
    #[command(name = "get")]
    Get { id: u64 },

    /// List collections created by a user
    #[command(name = "by-creator")]
    ByCreator { creator_id: u64 },

    /// Create a collection from a JSON payload
    #[command(name = "create")]
    Create {
        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },

    /// Apply a JSON patch to a collection
    #[command(name = "update")]
    Update {
        id: u64,

        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },
}

pub async fn handle_collections_commands(
    command: CollectionsCommands,
    store: &MarketStore,
    output: &OutputManager,
) -> Result<()> {
    match command {
        CollectionsCommands::List { limit, offset } => {
            let collections = store.get_all_collections(Pagination::new(limit, offset)).await;
            report_listing(output, "Collections", collections)?;
        }
        CollectionsCommands::Trending { limit } => {
            let collections = store.get_trending_collections(limit).await;
            report_listing(output, "Trending Collections", collections)?;
        }
        CollectionsCommands::Get { id } => {
            let collection = store.get_collection(id).await;
            report_found(output, &format!("Collection {id}"), collection)?;
        }
        CollectionsCommands::ByCreator { creator_id } => {
            let collections = store.get_collections_by_creator(creator_id).await;
            let heading = format!("Collections by user {creator_id}");
            report_listing(output, &heading, collections)?;
        }
        CollectionsCommands::Create { json } => {
            let payload = read_payload(&json)?;
            let created = store.create_collection(RawPayload::<Collection>::new(payload)).await;
            report_created(output, "collection", created)?;
        }
        CollectionsCommands::Update { id, json } => {
            let patch: CollectionPatch = read_json(&json)?;
            let updated = store.update_collection(id, patch).await;
            report_found(output, &format!("Collection {id}"), updated)?;
        }
    }

    Ok(())
}
