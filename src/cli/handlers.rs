//! Command handlers. Each returns the process exit code.

use super::commands::CliArgs;
use super::output::OutputFormatter;
use crate::config::GeneratorConfig;
use crate::generator::{self, GenerationInput, GeneratorOptions, SpecGenerator};
use tokio::task;
use tracing::{debug, error, info};

pub async fn handle_generate(args: &CliArgs) -> i32 {
    let config = GeneratorConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your DALEC_MAPPER_* environment variables.");
        return 1;
    }
    debug!("{}", config);

    let metadata = if args.offline {
        info!("Offline mode, repository metadata will not be fetched");
        None
    } else {
        let client = match config.create_client() {
            Ok(client) => client,
            Err(e) => {
                error!("{}", e);
                return 1;
            }
        };
        match generator::fetch_metadata(&client, &args.repo).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                error!("{:#}", e);
                eprintln!("\nPossible solutions:");
                eprintln!("  - Check the repository name: owner/repo");
                eprintln!("  - Set DALEC_MAPPER_GITHUB_TOKEN or GITHUB_TOKEN to avoid rate limits");
                eprintln!("  - Use --offline to generate without metadata");
                return 1;
            }
        }
    };

    let mut input = GenerationInput::new(&args.dockerfile);
    input.previous = args.previous.clone();
    input.metadata = metadata;

    let generator = SpecGenerator::new(GeneratorOptions {
        transform: config.transform_options(),
    });
    // Reading the build file and the previous spec is blocking I/O
    let report = match task::spawn_blocking(move || generator.generate(&input)).await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            error!("Generation failed: {:#}", e);
            return 1;
        }
        Err(e) => {
            error!("Generation task failed: {}", e);
            return 1;
        }
    };

    if args.show_model {
        eprintln!("{}", report.model);
    }

    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format_document(&report.document) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &output) {
                error!("Failed to write output to {}: {}", path.display(), e);
                return 1;
            }
            info!("Spec written to: {}", path.display());
        }
        None => print!("{}", output),
    }

    if !args.quiet {
        eprint!("{}", formatter.format_summary(&report));
    }

    0
}
