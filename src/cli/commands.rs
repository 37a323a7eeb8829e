use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Generate a Dalec build spec from a multi-stage Dockerfile
#[derive(Parser, Debug)]
#[command(
    name = "dalec-mapper",
    about = "Generate a Dalec build spec from a multi-stage Dockerfile",
    version,
    long_about = "dalec-mapper reads a multi-stage Dockerfile, merges repository metadata \
                  fetched from GitHub and writes a Dalec build specification. When a \
                  previously generated spec is given, the revision is bumped if the \
                  source commit has not changed.\n\n\
                  Examples:\n  \
                  dalec-mapper --repo acme/widget\n  \
                  dalec-mapper -r acme/widget -d build/Dockerfile -o widget.yml -p widget.yml\n  \
                  dalec-mapper -r acme/widget --offline --format json"
)]
pub struct CliArgs {
    #[arg(
        short = 'r',
        long,
        value_name = "REPO",
        help = "GitHub repository (owner/repo or URL)"
    )]
    pub repo: String,

    #[arg(
        short = 'd',
        long,
        value_name = "FILE",
        default_value = "Dockerfile",
        help = "Path to the Dockerfile"
    )]
    pub dockerfile: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the spec to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'p',
        long,
        value_name = "FILE",
        help = "Previously generated spec used for revision tracking"
    )]
    pub previous: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "yaml",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Skip fetching repository metadata")]
    pub offline: bool,

    #[arg(long, help = "Print the parsed build model to stderr")]
    pub show_model: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress the summary and non-error logs"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Yaml,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["dalec-mapper", "--repo", "acme/widget"]);

        assert_eq!(args.repo, "acme/widget");
        assert_eq!(args.dockerfile, PathBuf::from("Dockerfile"));
        assert_eq!(args.format, OutputFormatArg::Yaml);
        assert!(args.output.is_none());
        assert!(args.previous.is_none());
        assert!(!args.offline);
        assert!(!args.show_model);
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_short_options() {
        let args = CliArgs::parse_from([
            "dalec-mapper",
            "-r",
            "acme/widget",
            "-d",
            "build/Dockerfile",
            "-o",
            "widget.yml",
            "-p",
            "old.yml",
            "-f",
            "json",
            "-q",
        ]);

        assert_eq!(args.dockerfile, PathBuf::from("build/Dockerfile"));
        assert_eq!(args.output, Some(PathBuf::from("widget.yml")));
        assert_eq!(args.previous, Some(PathBuf::from("old.yml")));
        assert_eq!(args.format, OutputFormatArg::Json);
        assert!(args.quiet);
    }

    #[test]
    fn test_repo_is_required() {
        assert!(CliArgs::try_parse_from(["dalec-mapper"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["dalec-mapper", "-r", "a/b", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_log_level_flag() {
        let args = CliArgs::parse_from(["dalec-mapper", "-r", "a/b", "--log-level", "debug"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }
}
