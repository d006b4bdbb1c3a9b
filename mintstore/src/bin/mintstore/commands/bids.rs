use anyhow::Result;
use clap::Subcommand;
use mintstore::{Bid, MarketStore, RawPayload};

use super::{read_payload, report_created, report_listing};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Bids",
    commands: &[
        "mintstore bids for-nft 2                 # Bids on NFT 2 with bidder details",
        "mintstore bids by-bidder 1               # Bids placed by user 1",
        r#"mintstore bids create --json '{"nftId": 2, "bidderId": 2, "amount": "2.4"}'"#,
    ],
}];

#[derive(Subcommand)]
pub enum BidsCommands {
    /// List bids on an NFT, with each bidder's public profile
    #[command(name = "for-nft")]
    ForNft { nft_id: u64 },

    /// List bids placed by a user
    #[command(name = "by-bidder")]
    ByBidder { bidder_id: u64 },

    /// Place a bid from a JSON payload
    #[command(name = "create")]
    Create {
        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },
}

pub async fn handle_bids_commands(
    command: BidsCommands,
    store: &MarketStore,
    output: &OutputManager,
) -> Result<()> {
    match command {
        BidsCommands::ForNft { nft_id } => {
            let bids = store.get_bids_by_nft(nft_id).await;
            report_listing(output, &format!("Bids on NFT {nft_id}"), bids)?;
        }
        BidsCommands::ByBidder { bidder_id } => {
            let bids = store.get_bids_by_bidder(bidder_id).await;
            report_listing(output, &format!("Bids by user {bidder_id}"), bids)?;
        }
        BidsCommands::Create { json } => {
            let payload = read_payload(&json)?;
            let created = store.create_bid(RawPayload::<Bid>::new(payload)).await;
            report_created(output, "bid", created)?;
        }
    }

    Ok(())
}
