use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cli::Cli;

/// Which optional matrices are read and which optional checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Rooms, features, attendance; unplaced events count towards infeasibility.
    Basic,
    /// Adds slot availability, event ordering and distance to feasibility.
    #[default]
    Extended,
}

impl Profile {
    pub fn is_extended(self) -> bool {
        self == Profile::Extended
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Basic => write!(f, "basic"),
            Profile::Extended => write!(f, "extended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Settings for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatorConfig {
    pub profile: Profile,
    pub format: OutputFormat,
    /// Compute instance statistics alongside the report.
    pub stats: bool,
}

impl ValidatorConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        ValidatorConfig {
            profile: cli.profile,
            format: cli.format,
            stats: cli.stats,
        }
    }
}
