use crate::modules::announcements::core::announcement::Priority;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Committee roster, shift and attendance client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Committee and day a roster command works on. The day defaults to today.
#[derive(Args, Debug, Clone)]
pub struct RosterArgs {
    pub committee: i64,

    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive match on name, college id or email.
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long)]
    pub shift: Option<String>,

    /// Group filter as "group,coordinator".
    #[arg(long)]
    pub group: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum PriorityArg {
    Low,
    #[default]
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the signed-in user.
    Me,
    Committees {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    CommitteeCreate {
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },
    CommitteeDelete {
        id: i64,
    },
    /// Load a committee roster and print the filtered volunteers.
    Roster {
        #[command(flatten)]
        roster: RosterArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },
    StartShift {
        #[command(flatten)]
        roster: RosterArgs,

        shift: String,
    },
    EndShift {
        #[command(flatten)]
        roster: RosterArgs,
    },
    /// Check a volunteer in or out on the running shift.
    Toggle {
        #[command(flatten)]
        roster: RosterArgs,

        volunteer: i64,
    },
    /// List volunteers who never checked in.
    Missed {
        #[command(flatten)]
        roster: RosterArgs,

        #[arg(long)]
        shift: Option<String>,
    },
    Announcements {
        #[arg(long)]
        committee: Option<i64>,

        /// Only announcements addressed to the signed-in volunteer.
        #[arg(long)]
        mine: bool,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    Announce {
        title: String,

        body: String,

        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,

        #[arg(long)]
        committee: Option<i64>,
    },
    AnnouncementDelete {
        id: i64,
    },
    Volunteers {
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Add a volunteer to a committee, reusing an existing one with the same email.
    AddVolunteer {
        committee: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        dept: Option<String>,

        #[arg(long)]
        college_id: Option<String>,

        #[arg(long)]
        shift: Option<String>,

        /// "group,coordinator"
        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        role: Option<String>,
    },
    BulkUpload {
        committee: i64,

        file: PathBuf,
    },
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
    /// Poll committee summaries until interrupted.
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum ExportTarget {
    Volunteers {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Assignments {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Attendance {
        #[command(flatten)]
        roster: RosterArgs,

        #[arg(long)]
        shift: Option<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}
