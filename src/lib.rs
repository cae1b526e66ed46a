//! Validator for enrolment-based course timetables.
//!
//! An instance (`.tim`) describes rooms, events, students and features, and in
//! the extended profile slot availability and event ordering. A solution
//! (`.sln`) places every event in a slot and a room. [`validate`] reports every
//! hard violation, the soft penalty and whether the timetable is feasible.
//!
//! ```no_run
//! use std::path::Path;
//! use tim_validator::{ValidatorConfig, validate_files};
//!
//! let output = validate_files(Path::new("comp01"), &ValidatorConfig::default())?;
//! println!("feasible: {}", output.report.feasible);
//! # Ok::<(), tim_validator::ValidatorError>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod loader;
pub mod report;
pub mod server;
pub mod stats;
pub mod validator;

use log::info;
use std::path::Path;

pub use config::{OutputFormat, Profile, ValidatorConfig};
pub use data::{Assignment, Instance};
pub use error::{ValidatorError, ValidatorResult};
pub use report::{ValidationOutput, ValidationReport};
pub use stats::InstanceStats;
pub use validator::validate;

/// Validates a solution given as text against an instance given as text.
pub fn validate_text(instance: &str, solution: &str, profile: Profile) -> ValidatorResult<ValidationReport> {
    let instance = loader::parse_instance(instance, profile)?;
    let assignment = loader::parse_assignment(solution, &instance)?;
    Ok(validate(&instance, &assignment))
}

/// Reads `<basename>.tim` and `<basename>.sln` and validates them.
pub fn validate_files(basename: &Path, config: &ValidatorConfig) -> ValidatorResult<ValidationOutput> {
    let instance = loader::load_instance(&loader::instance_path(basename), config.profile)?;
    let assignment = loader::load_assignment(&loader::solution_path(basename), &instance)?;

    let stats = config.stats.then(|| InstanceStats::of(&instance));
    if let Some(stats) = &stats {
        info!("Instance statistics: {stats:?}");
    }

    Ok(ValidationOutput {
        stats,
        report: validate(&instance, &assignment),
    })
}
