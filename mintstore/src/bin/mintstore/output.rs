use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use mintstore::{Bid, BidWithBidder, Collection, Nft, PublicUser};
use serde::Serialize;
use serde_json::Value;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// A record that renders as one row of a listing table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;

    fn compact(&self) -> String;
}

/// A single record shown as a field/value table.
#[derive(Serialize)]
#[serde(transparent)]
pub struct Detail<T>(pub T);

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet && self.options.output_format != OutputFormat::Json {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.success)
            } else {
                format!(
                    "{} {}",
                    ICONS.success.color(THEME.success),
                    message.color(THEME.success)
                )
            };
            println!("{output}");
        }
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", ICONS.error)
        } else {
            format!(
                "{} {}",
                ICONS.error.color(THEME.error),
                message.color(THEME.error)
            )
        };
        eprintln!("{output}");
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.warning)
            } else {
                format!(
                    "{} {}",
                    ICONS.warning.color(THEME.warning),
                    message.color(THEME.warning)
                )
            };
            eprintln!("{output}");
        }
    }

    /// Display info message with color and icon
    pub fn info(&self, message: &str) {
        if !self.options.quiet && self.options.output_format != OutputFormat::Json {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.info)
            } else {
                format!(
                    "{} {}",
                    ICONS.info.color(THEME.info),
                    message.color(THEME.info)
                )
            };
            println!("{output}");
        }
    }

    /// Display a heading
    pub fn heading(&self, text: &str) {
        if !self.options.quiet && self.options.output_format == OutputFormat::Table {
            let output = if self.options.no_color {
                format!("\n{text}\n{}", "=".repeat(text.chars().count()))
            } else {
                format!("\n{}", text.color(THEME.primary).bold())
            };
            println!("{output}");
        }
    }

    /// Display a key-value pair
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{key}: {value}")
            } else {
                format!(
                    "{}: {}",
                    key.color(THEME.key).bold(),
                    value.color(THEME.value)
                )
            };
            println!("{output}");
        }
    }

    /// Display a bullet list item
    pub fn bullet(&self, text: &str) {
        let output = if self.options.no_color {
            format!("  {} {text}", ICONS.bullet)
        } else {
            format!("  {} {text}", ICONS.bullet.color(THEME.muted))
        };
        eprintln!("{output}");
    }
}

fn create_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();

    if !options.no_color {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    } else {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    }

    table
}

fn add_table_header(options: &GlobalOptions, table: &mut Table, headers: &[&str]) {
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color {
                cell
            } else {
                cell.fg(TableColor::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);
}

impl<T> TableDisplay for Vec<T>
where
    T: TableRow + Serialize,
{
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);

        if self.is_empty() {
            table.add_row(vec![Cell::new("No items found")]);
            return table;
        }

        add_table_header(options, &mut table, T::HEADERS);
        for item in self {
            table.add_row(item.row());
        }

        table
    }

    fn to_compact(&self) -> String {
        if self.is_empty() {
            return "Count: 0".to_string();
        }
        self.iter().map(TableRow::compact).collect::<Vec<_>>().join("\n")
    }
}

impl<T> TableDisplay for Detail<T>
where
    T: TableRow + Serialize,
{
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Field", "Value"]);

        if let Ok(Value::Object(fields)) = serde_json::to_value(&self.0) {
            for (key, value) in fields {
                table.add_row(vec![key, render_value(&value)]);
            }
        }

        table
    }

    fn to_compact(&self) -> String {
        self.0.compact()
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(value).unwrap_or_default(),
        other => other.to_string(),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn flag(value: bool) -> String {
    if value {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

fn price(value: Option<&str>, currency: &str) -> String {
    match value {
        Some(amount) => format!("{amount} {currency}"),
        None => "-".to_string(),
    }
}

impl TableRow for PublicUser {
    const HEADERS: &'static [&'static str] = &["ID", "Username", "Email", "Wallet", "Verified"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            or_dash(self.email.as_deref()),
            or_dash(self.wallet_address.as_deref()),
            flag(self.is_verified),
        ]
    }

    fn compact(&self) -> String {
        format!("#{} {}", self.id, self.username)
    }
}

impl TableRow for Collection {
    const HEADERS: &'static [&'static str] =
        &["ID", "Name", "Creator", "Category", "Floor", "Royalty %", "Items", "Verified"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.creator_id.to_string(),
            or_dash(self.category.as_deref()),
            or_dash(self.floor_price.as_deref()),
            self.royalty_percentage.to_string(),
            self.items_count.to_string(),
            flag(self.verified),
        ]
    }

    fn compact(&self) -> String {
        format!(
            "#{} {} floor={}",
            self.id,
            self.name,
            self.floor_price.as_deref().unwrap_or("-")
        )
    }
}

impl TableRow for Nft {
    const HEADERS: &'static [&'static str] =
        &["ID", "Name", "Collection", "Owner", "Price", "Auction", "Featured", "Likes"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.collection_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            self.owner_id.to_string(),
            price(self.price.as_deref(), &self.currency),
            flag(self.is_auction),
            if self.featured {
                ICONS.star.to_string()
            } else {
                String::new()
            },
            self.likes.to_string(),
        ]
    }

    fn compact(&self) -> String {
        let amount = price(self.price.as_deref(), &self.currency);
        format!("#{} {} {amount}", self.id, self.name)
    }
}

impl TableRow for Bid {
    const HEADERS: &'static [&'static str] = &["ID", "NFT", "Bidder", "Amount", "Expires"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nft_id.to_string(),
            self.bidder_id.to_string(),
            format!("{} {}", self.amount, self.currency),
            self.expires_at.map_or_else(|| "-".to_string(), |at| at.to_rfc3339()),
        ]
    }

    fn compact(&self) -> String {
        format!(
            "#{} nft={} bidder={} {} {}",
            self.id, self.nft_id, self.bidder_id, self.amount, self.currency
        )
    }
}

impl TableRow for BidWithBidder {
    const HEADERS: &'static [&'static str] = Bid::HEADERS;

    fn row(&self) -> Vec<String> {
        let mut row = self.bid.row();
        if let Some(bidder) = &self.bidder {
            row[2] = format!("{} (#{})", bidder.username, bidder.id);
        }
        row
    }

    fn compact(&self) -> String {
        match &self.bidder {
            Some(bidder) => format!(
                "#{} nft={} bidder={} {} {}",
                self.bid.id, self.bid.nft_id, bidder.username, self.bid.amount, self.bid.currency
            ),
            None => self.bid.compact(),
        }
    }
}
