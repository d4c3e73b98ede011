// Command-line dashboard client

use clap::{Args as ClapArgs, Parser, Subcommand};
use navtiles::dashboard::config::ClientConfig;
use navtiles::dashboard::palette::shortcut_label;
use navtiles::dashboard::search::{TileLayout, ViewMode};
use navtiles::dashboard::shortcuts::{KeyPress, ShortcutAction};
use navtiles::dashboard::app::TileDraft;
use navtiles::dashboard::{Dashboard, DashboardError};
use navtiles::models::{ColorMeaning, Tile};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_COLOR: &str = "#4285F4";

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage navigation tiles from the terminal", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct ViewArgs {
    /// Search term (matches name, pinyin of the name, or URL)
    #[arg(short, long, default_value = "")]
    search: String,
    /// grid, grouped or rainbow
    #[arg(short, long, default_value = "grid")]
    view: ViewMode,
    /// Only show these colors (grid view)
    #[arg(long = "color")]
    colors: Vec<String>,
}

#[derive(ClapArgs, Debug)]
struct TileFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    url: Option<String>,
    /// `#RRGGBB`
    #[arg(long)]
    color: Option<String>,
    /// Background tint, 0-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    darkness: Option<u8>,
    /// Custom icon URL; pass an empty string to clear it
    #[arg(long)]
    icon: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show tiles as the dashboard would
    List(ViewArgs),
    /// Add a tile; without --color the best suggestion is used
    Add(TileFields),
    /// Change fields of an existing tile
    Edit {
        id: String,
        #[command(flatten)]
        fields: TileFields,
    },
    /// Delete a tile
    Remove {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Move a tile to the position of another
    Move { id: String, over: String },
    /// Suggest colors for a URL
    Suggest {
        url: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// List, set or remove color meanings
    #[command(subcommand)]
    Meanings(MeaningsCommand),
    /// Write a backup file
    Export {
        /// Defaults to navigation-backup-<date>.json in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore tiles and/or color meanings from a backup file
    Import { path: PathBuf },
    /// Probe favicon sources and cache the ones that work
    RefreshIcons,
    /// Print the URL that digit key <n> opens
    Open {
        n: String,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Subcommand, Debug)]
enum MeaningsCommand {
    List,
    Set {
        color: String,
        name: String,
        #[arg(long, default_value = "")]
        emoji: String,
        #[arg(long)]
        description: Option<String>,
    },
    Remove { color: String },
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_view(dashboard: &mut Dashboard, view: &ViewArgs) {
    dashboard.set_search(&view.search);
    dashboard.set_view(view.view);
    for color in &view.colors {
        dashboard.toggle_color(color);
    }
}

fn print_tile(dashboard: &Dashboard, position: usize, tile: &Tile, numbered: bool) {
    let label = if numbered { shortcut_label(position) } else { None };
    println!(
        "{:>2}  {:<14} {:<24} {:<9} {:<20} {}",
        label.unwrap_or_default(),
        tile.id,
        tile.name,
        tile.color.to_uppercase(),
        dashboard.color_meanings().label(&tile.color),
        tile.url,
    );
}

fn list(dashboard: &Dashboard) {
    if let Some(banner) = dashboard.banner() {
        eprintln!("! {banner}");
    }
    let numbered = dashboard.view().has_shortcuts();
    match dashboard.layout() {
        TileLayout::Flat(tiles) => {
            for (i, tile) in tiles.iter().enumerate() {
                print_tile(dashboard, i, tile, numbered);
            }
        }
        TileLayout::Grouped(groups) => {
            for group in groups {
                println!("== {} ({})", dashboard.color_meanings().label(&group.color), group.tiles.len());
                for (i, tile) in group.tiles.iter().enumerate() {
                    print_tile(dashboard, i, tile, false);
                }
            }
        }
    }
}

fn merge_fields(mut draft: TileDraft, fields: TileFields) -> TileDraft {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(url) = fields.url {
        draft.url = url;
    }
    if let Some(color) = fields.color {
        draft.color = color;
    }
    if let Some(darkness) = fields.darkness {
        draft.darkness = darkness;
    }
    if let Some(icon) = fields.icon {
        draft.custom_icon = icon;
    }
    draft
}

async fn run(dashboard: &mut Dashboard, command: Command) -> Result<(), DashboardError> {
    match command {
        Command::List(view) => {
            dashboard.load().await?;
            apply_view(dashboard, &view);
            list(dashboard);
        }
        Command::Add(fields) => {
            dashboard.load().await?;
            let mut draft = merge_fields(TileDraft::default(), fields);
            if draft.color.is_empty() {
                draft.color = dashboard
                    .suggestions(&draft.url, &draft.name)
                    .first()
                    .map_or_else(|| DEFAULT_COLOR.to_string(), |s| s.color.clone());
            }
            dashboard.open_add();
            let id = dashboard.submit_tile_modal(&draft).await?;
            println!("Added tile {id} ({})", draft.color.to_uppercase());
        }
        Command::Edit { id, fields } => {
            dashboard.load().await?;
            let draft = merge_fields(dashboard.open_edit(&id)?, fields);
            dashboard.submit_tile_modal(&draft).await?;
            println!("Updated tile {id}");
        }
        Command::Remove { id, yes } => {
            dashboard.load().await?;
            if dashboard.delete_tile(&id, yes).await? {
                println!("Deleted tile {id}");
            } else {
                println!("Not deleted; pass --yes to confirm deleting {id}");
            }
        }
        Command::Move { id, over } => {
            dashboard.load().await?;
            if dashboard.drag_end(&id, Some(&over)).await? {
                println!("Moved {id}");
            } else {
                println!("Order unchanged");
            }
        }
        Command::Suggest { url, name } => {
            dashboard.load().await?;
            let suggestions = dashboard.suggestions(&url, &name);
            if suggestions.is_empty() {
                println!("No suggestions");
            }
            for s in suggestions {
                println!("{}  {:.1}  {}", s.color, s.confidence, s.reason);
            }
        }
        Command::Meanings(sub) => {
            dashboard.load().await?;
            match sub {
                MeaningsCommand::List => {
                    for (color, meaning) in dashboard.color_meanings().iter() {
                        println!(
                            "{color}  {} {}  {}",
                            meaning.emoji,
                            meaning.name,
                            meaning.description.as_deref().unwrap_or_default()
                        );
                    }
                }
                MeaningsCommand::Set { color, name, emoji, description } => {
                    dashboard
                        .set_color_meaning(&color, ColorMeaning { name, emoji, description })
                        .await?;
                    println!("Saved meaning for {}", color.to_uppercase());
                }
                MeaningsCommand::Remove { color } => {
                    dashboard.remove_color_meaning(&color).await?;
                    println!("Removed meaning for {}", color.to_uppercase());
                }
            }
        }
        Command::Export { output } => {
            dashboard.load().await?;
            let (file_name, contents) = dashboard.export()?;
            let path = output.unwrap_or_else(|| PathBuf::from(file_name));
            tokio::fs::write(&path, contents)
                .await
                .map_err(|e| DashboardError::Save(format!("Could not write {}: {e}", path.display())))?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            dashboard.load().await?;
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| DashboardError::Validation(format!("Could not read {}: {e}", path.display())))?;
            let summary = dashboard.import(&raw).await?;
            if let Some(n) = summary.tiles {
                println!("Imported {n} tiles");
            }
            if let Some(n) = summary.color_meanings {
                println!("Imported {n} color meanings");
            }
        }
        Command::RefreshIcons => {
            dashboard.load().await?;
            let changed = dashboard.refresh_favicons().await?;
            println!("Cached favicons for {changed} tiles");
        }
        Command::Open { n, view } => {
            dashboard.load().await?;
            apply_view(dashboard, &view);
            match dashboard.handle_key(&KeyPress::new(n.clone())) {
                ShortcutAction::OpenTile(url) => println!("{url}"),
                _ => return Err(DashboardError::NotFound(format!("No tile on key {n} in {} view", view.view))),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    init_logging();

    let config = ClientConfig::load(args.config.as_deref())?;
    let mut dashboard = Dashboard::from_config(&config)?;

    if let Err(e) = run(&mut dashboard, args.command).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
