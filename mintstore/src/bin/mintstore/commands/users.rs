use anyhow::Result;
use clap::Subcommand;
use mintstore::{MarketStore, PublicUser, RawPayload, User, UserPatch};

use super::{read_json, read_payload, report_created, report_found};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Lookup",
        commands: &[
            "mintstore users get 1                        # Show user 1",
            "mintstore users find --username janesmith    # Exact username match",
            "mintstore users find --wallet 0x1234...5678  # Exact wallet match",
        ],
    },
    ExampleGroup {
        title: "Mutations",
        commands: &[
            r#"mintstore users create --json '{"username": "collector"}'"#,
            r#"mintstore users update 2 --json '{"bio": "Generative artist"}'"#,
        ],
    },
];

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Show a user by id
    #[command(name = "get")]
    Get { id: u64 },

    /// Find a user by exact username or wallet address
    #[command(name = "find")]
    Find {
        /// Username to match
        #[arg(long, conflicts_with = "wallet", required_unless_present = "wallet")]
        username: Option<String>,

        /// Wallet address to match
        #[arg(long)]
        wallet: Option<String>,
    },

    /// Create a user from a JSON payload
    #[command(name = "create")]
    Create {
        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },

    /// Apply a JSON patch to a user
    #[command(name = "update")]
    Update {
        id: u64,

        /// JSON object, or @path to a file holding one
        #[arg(long)]
        json: String,
    },
}

fn public(user: Option<User>) -> Option<PublicUser> {
    user.as_ref().map(PublicUser::from)
}

pub async fn handle_users_commands(
    command: UsersCommands,
    store: &MarketStore,
    output: &OutputManager,
) -> Result<()> {
    match command {
        UsersCommands::Get { id } => {
            let user = store.get_user(id).await;
            report_found(output, &format!("User {id}"), public(user))?;
        }
        UsersCommands::Find { username, wallet } => {
            let found = match (username, wallet) {
                (Some(username), _) => store.get_user_by_username(&username).await,
                (None, Some(wallet)) => store.get_user_by_wallet_address(&wallet).await,
                (None, None) => None,
            };
            report_found(output, "User", public(found))?;
        }
        UsersCommands::Create { json } => {
            let payload = read_payload(&json)?;
            let created = store.create_user(RawPayload::<User>::new(payload)).await;
            report_created(output, "user", created.map(|user| PublicUser::from(&user)))?;
        }
        UsersCommands::Update { id, json } => {
            let patch: UserPatch = read_json(&json)?;
            let updated = store.update_user(id, patch).await;
            report_found(output, &format!("User {id}"), public(updated))?;
        }
    }

    Ok(())
}
