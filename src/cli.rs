use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::config::{OutputFormat, Profile};

/// Validate a course timetable (`<BASENAME>.sln`) against its instance (`<BASENAME>.tim`).
#[derive(Parser, Debug)]
#[command(name = "validate", author, version, about)]
pub struct Cli {
    /// Path of the instance and solution files without the .tim/.sln suffix
    #[arg(value_name = "BASENAME", required_unless_present = "serve")]
    pub basename: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Profile::Extended)]
    pub profile: Profile,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print instance statistics before the report
    #[arg(long)]
    pub stats: bool,
    /// Serve validation requests over HTTP instead of reading files
    #[arg(long, value_name = "ADDR", conflicts_with = "basename")]
    pub serve: Option<SocketAddr>,
    #[arg(short, long, value_name = "[off, error, warn, info, debug, trace]")]
    pub log_level: Option<LevelFilter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_extended_text() {
        let cli = Cli::try_parse_from(["validate", "data/comp01"]).unwrap();
        assert_eq!(cli.basename, Some(PathBuf::from("data/comp01")));
        assert_eq!(cli.profile, Profile::Extended);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.stats);
        assert!(cli.serve.is_none());
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from([
            "validate", "comp01", "--profile", "basic", "--format", "csv", "--stats", "-l", "debug",
        ])
        .unwrap();
        assert_eq!(cli.profile, Profile::Basic);
        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(cli.stats);
        assert_eq!(cli.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn basename_required_unless_serving() {
        assert!(Cli::try_parse_from(["validate"]).is_err());
        assert!(Cli::try_parse_from(["validate", "a", "b"]).is_err());
        let cli = Cli::try_parse_from(["validate", "--serve", "127.0.0.1:8080"]).unwrap();
        assert_eq!(cli.serve, Some("127.0.0.1:8080".parse().unwrap()));
        assert!(Cli::try_parse_from(["validate", "comp01", "--serve", "127.0.0.1:8080"]).is_err());
    }
}
