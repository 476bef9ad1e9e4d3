//! VN Organizer - track the branches and saves of an interactive story from
//! the command line, and draw them as a flowchart.

mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use story_tree::Path as TreePath;

#[derive(Parser)]
#[command(name = "vn-organizer")]
#[command(about = "Track branches, saves and events in a visual novel playthrough")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// A tree file and the node inside it a command works on.
#[derive(Args)]
struct Target {
    /// Tree file (JSON)
    file: PathBuf,

    /// Node address as dot-separated child indices, e.g. `0.2.1`
    #[arg(short, long, default_value = "root")]
    path: TreePath,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tree file holding an empty story
    Init {
        file: PathBuf,

        /// Directory the game writes its saves to
        #[arg(long)]
        primary: Option<PathBuf>,

        /// Mirror of the primary save directory
        #[arg(long)]
        secondary: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a node with its items and choices
    Show {
        #[command(flatten)]
        target: Target,
    },

    /// Append a save marker to a node
    AddSave {
        #[command(flatten)]
        target: Target,

        /// Save name
        name: String,
    },

    /// Append an event to a node
    AddEvent {
        #[command(flatten)]
        target: Target,

        /// Color code: r, g, b, c, y, m or d
        #[arg(short, long, default_value = "d")]
        color: String,

        text: String,
    },

    /// Split a node into one branch per response
    Branch {
        #[command(flatten)]
        target: Target,

        /// Question asked at the branch point
        #[arg(long)]
        prompt: String,

        #[arg(required = true)]
        responses: Vec<String>,
    },

    /// Mark a leaf as finished, or unmark it
    ToggleEnd {
        #[command(flatten)]
        target: Target,
    },

    /// Remove an item from a node
    DeleteItem {
        #[command(flatten)]
        target: Target,

        /// Item index, starting at 0
        index: usize,
    },

    /// Remove a branch and everything below it
    DeleteBranch {
        #[command(flatten)]
        target: Target,

        /// Branch index, starting at 0
        index: usize,
    },

    /// Draw the whole tree as a PNG flowchart
    Render {
        file: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Diagram settings (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            file,
            primary,
            secondary,
            force,
        } => commands::init(&file, primary, secondary, force)?,
        Commands::Show { target } => {
            println!("{}", commands::show(&target.file, &target.path)?);
        }
        Commands::AddSave { target, name } => {
            commands::add_save(&target.file, &target.path, name)?;
        }
        Commands::AddEvent {
            target,
            color,
            text,
        } => {
            commands::add_event(&target.file, &target.path, &color, text)?;
        }
        Commands::Branch {
            target,
            prompt,
            responses,
        } => {
            commands::branch(&target.file, &target.path, prompt, responses)?;
        }
        Commands::ToggleEnd { target } => {
            commands::toggle_end(&target.file, &target.path)?;
        }
        Commands::DeleteItem { target, index } => {
            commands::delete_item(&target.file, &target.path, index)?;
        }
        Commands::DeleteBranch { target, index } => {
            commands::delete_branch(&target.file, &target.path, index)?;
        }
        Commands::Render {
            file,
            output,
            config,
        } => commands::render(&file, &output, config.as_deref())?,
    }

    Ok(())
}
