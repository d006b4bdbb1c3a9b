use anyhow::Result;
use clap::Subcommand;

use crate::context::{SeedSource, StoreContext};
use crate::examples::ExampleGroup;
use crate::output::{OutputFormat, OutputManager};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Configuration",
    commands: &[
        "mintstore config show                             # Effective settings",
        "mintstore --config ./market.toml config show      # Settings from another file",
    ],
}];

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    #[command(name = "show")]
    Show,
}

pub fn handle_config_commands(
    command: ConfigCommands,
    ctx: &StoreContext,
    output: &OutputManager,
) -> Result<()> {
    match command {
        ConfigCommands::Show => handle_show(ctx, output),
    }
}

fn handle_show(ctx: &StoreContext, output: &OutputManager) -> Result<()> {
    if output.options.output_format == OutputFormat::Json {
        if !output.options.quiet {
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        }
        return Ok(());
    }

    output.heading("Configuration");
    if ctx.loaded {
        output.key_value("file", &ctx.config_path.display().to_string());
    } else {
        let path = ctx.config_path.display();
        output.info(&format!("No config at {path}, using defaults"));
    }

    let seed = match ctx.config.store.seed {
        SeedSource::Demo => "demo".to_string(),
        SeedSource::Empty => "empty".to_string(),
        SeedSource::File => match ctx.seed_file() {
            Ok(path) => format!("file ({})", path.display()),
            Err(err) => format!("file (unresolved: {err})"),
        },
    };
    output.key_value("store.seed", &seed);
    let listings = ctx.config.listings;
    output.key_value("listings.trending_limit", &listings.trending_limit.to_string());
    output.key_value("listings.featured_limit", &listings.featured_limit.to_string());

    Ok(())
}
