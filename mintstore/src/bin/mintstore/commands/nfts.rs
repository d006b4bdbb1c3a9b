use anyhow::Result;
use clap::Subcommand;
use mintstore::{MarketStore, Nft, NftFilter, NftPatch, Pagination, RawPayload};

use super::{read_json, read_payload, report_created, report_found, report_listing};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Browse",
        commands: &[
            "mintstore nfts list --collection 2                  # NFTs in collection 2",
            "mintstore nfts list --min-price 1 --max-price 2     # Listed between 1 and 2",
            "mintstore nfts featured                             # Promoted NFTs",
            "mintstore nfts by-owner 1                           # NFTs held by user 1",
        ],
    },
    ExampleGroup {
        title: "Mutations",
        commands: &[
            r#"mintstore nfts create --json @nft.json"#,
            r#"mintstore nfts update 1 --json '{"price": "3.0", "ownerId": 2}'"#,
        ],
    },
];

#[derive(Subcommand)]
pub enum NftsCommands {
    /// List NFTs, optionally filtered, in insertion order
    #[command(name = "list")]
    List {
        /// Maximum number of NFTs (0 = all)
        #[arg(long)]
        limit: Option<usize>,

        /// Number of matching NFTs to skip
        #[arg(long)]
        offset: Option<usize>,

        /// Only NFTs in this collection
        #[arg(long)]
        collection: Option<u64>,

        /// Only NFTs priced at or above this amount
        #[arg(long)]
        min_price: Option<f64>,

        /// Only NFTs priced at or below this amount
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// List featured NFTs
    #[command(name = "featured")]
    Featured {
        /// Maximum number of NFTs (defaults to listings.featured_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show an NFT by id
    #[command(name = "get")]
    Get { id: u64 },

    /// List NFTs in a collection
    #[command(name = "by-collection")]
    ByCollection { collection_id: u64 },

    /// List NFTs created by a user
    #[command(name = "by-creator")]
    ByCreator { creator_id: u64 },

    /// List NFTs owned by a user
    #[command(name = "by-owner")]
    ByOwner { owner_id: u64 },

    /// Create an NFT from a JSON payload
    #[command(name = "create")]
    Create {
        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },

    /// Apply a JSON patch to an NFT
    #[command(name = "update")]
    Update {
        id: u64,

        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },
}

pub async fn handle_nfts_commands(
    command: NftsCommands,
    store: &MarketStore,
    output: &OutputManager,
) -> Result<()> {
    match command {
        NftsCommands::List {
            limit,
            offset,
            collection,
            min_price,
            max_price,
        } => {
            let filter = NftFilter {
                collection,
                min_price,
                max_price,
            };
            let nfts = store.get_all_nfts(Pagination::new(limit, offset), filter).await;
            report_listing(output, "NFTs", nfts)?;
        }
        NftsCommands::Featured { limit } => {
            let nfts = store.get_featured_nfts(limit).await;
            report_listing(output, "Featured NFTs", nfts)?;
        }
        NftsCommands::Get { id } => {
            report_found(output, &format!("NFT {id}"), store.get_nft(id).await)?;
        }
        NftsCommands::ByCollection { collection_id } => {
            let nfts = store.get_nfts_by_collection(collection_id).await;
            report_listing(output, &format!("NFTs in collection {collection_id}"), nfts)?;
        }
        NftsCommands::ByCreator { creator_id } => {
            let nfts = store.get_nfts_by_creator(creator_id).await;
            report_listing(output, &format!("NFTs created by user {creator_id}"), nfts)?;
        }
        NftsCommands::ByOwner { owner_id } => {
            let nfts = store.get_nfts_by_owner(owner_id).await;
            report_listing(output, &format!("NFTs owned by user {owner_id}"), nfts)?;
        }
        NftsCommands::Create { json } => {
            let payload = read_payload(&json)?;
            let created = store.create_nft(RawPayload::<Nft>::new(payload)).await;
            report_created(output, "NFT", created)?;
        }
        NftsCommands::Update { id, json } => {
            let patch: NftPatch = read_json(&json)?;
            let updated = store.update_nft(id, patch).await;
            report_found(output, &format!("NFT {id}"), updated)?;
        }
    }

    Ok(())
}
