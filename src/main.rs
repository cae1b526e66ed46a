use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;

use tim_validator::cli::Cli;
use tim_validator::{ValidatorConfig, ValidatorError, ValidatorResult, server, validate_files};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return fail(ValidatorError::Usage(e.render().to_string())),
    };

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = cli.log_level {
        logger.filter_level(level);
    }
    logger.init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

async fn run(cli: Cli) -> ValidatorResult<()> {
    if let Some(addr) = cli.serve {
        return server::run_server(addr).await;
    }

    let config = ValidatorConfig::from_cli(&cli);
    let Some(basename) = cli.basename else {
        return Err(ValidatorError::Usage("Usage: validate <BASENAME>".to_string()));
    };

    // the report is written even when the timetable is infeasible
    let output = validate_files(&basename, &config)?;
    println!("{}", output.render(config.format)?);
    Ok(())
}

fn fail(error: ValidatorError) -> ExitCode {
    eprintln!("{}", error.to_string().trim_end());
    ExitCode::from(error.exit_code())
}
