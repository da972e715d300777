use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::PickStatus;

#[derive(Debug, Parser)]
#[command(name = "pick-grader")]
#[command(version)]
#[command(about = "Grade weekly NFL picks in _data/weeks.yml", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Weeks data file (defaults to WEEKS_DATA_FILE or _data/weeks.yml)
    #[arg(short, long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Grade the current week's open picks (default)
    Grade {
        /// Grade regardless of the day of week
        #[arg(short, long)]
        force: bool,
    },
    /// Open a new week with a blank pick for every participant
    AddWeek {
        week: u32,
    },
    /// Record a participant's pick
    SetPick {
        week: u32,
        name: String,
        pick: String,
        /// pending, won, lost, ai_won or ai_lost
        #[arg(short, long)]
        status: Option<PickStatus>,
        /// American odds, e.g. -130 or +150
        #[arg(short, long, allow_hyphen_values = true)]
        odds: Option<String>,
    },
    /// Flag or unflag a participant's pick as the week's worst
    MarkWorst {
        week: u32,
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        worst: bool,
    },
    /// Print the current week's picks
    Show,
}

impl Cli {
    /// The requested command, grading when none is given.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Grade { force: false })
    }
}
