use color_eyre::eyre::eyre;
use pgsift::{
    cli::{Cli, Commands},
    commands::{
        execute_activity, execute_classify, execute_cron, execute_events, print_activity_summary,
        print_classify_summary, print_cron_summary, print_events_summary,
    },
    config::{OutputFormat, PgsiftConfig},
    error::{format_error_chain, suggest_fix, Result},
    logging,
};
use tracing::{debug, info, warn};

fn main() -> color_eyre::Result<()> {
    let cli = Cli::parse_args();

    // The config file may raise the default verbosity, so read it before logging starts
    let config_file = match &cli.config {
        Some(path) => PgsiftConfig::load_from_path(path),
        None => PgsiftConfig::load_from_file(),
    };
    let file_verbosity = config_file
        .as_ref()
        .ok()
        .and_then(|config| config.as_ref())
        .and_then(|config| config.verbosity);

    logging::init(cli.verbosity().or(file_verbosity).unwrap_or(0)).map_err(|e| eyre!("{}", e))?;

    info!("Starting pgsift v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command: {:?}", cli.command);

    let config_file = match config_file {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring configuration file: {}", e);
            None
        }
    };

    if let Err(e) = run(cli, config_file) {
        logging::output::error(format_error_chain(&e));

        if let Some(suggestion) = suggest_fix(&e) {
            logging::output::info(suggestion);
        }

        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli, config_file: Option<PgsiftConfig>) -> Result<()> {
    let verbosity = cli.verbosity();

    match cli.command {
        Commands::Init => {
            let path = PgsiftConfig::write_sample_config()?;
            logging::output::success(format!(
                "Created {} - rename to pgsift.toml to use",
                path.display()
            ));
            Ok(())
        }

        Commands::Classify { path } => {
            let result = execute_classify(&path)?;
            info!(
                "Classification completed in {}",
                logging::format_duration(result.duration)
            );
            print_classify_summary(&result);
            Ok(())
        }

        Commands::Events { path, json } => {
            let config = PgsiftConfig::merge_with_cli(config_file, None, json, verbosity);
            let result = execute_events(&path)?;
            if result.events.is_empty() {
                debug!("No events in {}; unparseable SQL also yields none", path.display());
            }
            print_events_summary(&result, config.output_format() == OutputFormat::Json)
        }

        Commands::Activity { path, json } => {
            let config = PgsiftConfig::merge_with_cli(config_file, None, json, verbosity);
            let result = execute_activity(&path)?;
            print_activity_summary(&result, config.output_format() == OutputFormat::Json)
        }

        Commands::Cron {
            command,
            project_ref,
            json,
        } => {
            let config = PgsiftConfig::merge_with_cli(config_file, project_ref, json, verbosity);
            let result = execute_cron(&command, &config.cron_options());
            print_cron_summary(&result, config.output_format() == OutputFormat::Json)
        }
    }
}
