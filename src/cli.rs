use clap::Parser;

use crate::scale::ScaleFilter;

pub const HELP_KEYS: &str = "\
Key Bindings:
  Left                  : Previous image
  Right / Space / Enter : Next image
  Home / End            : First / last image
  Ctrl+O                : Open images
  Esc                   : Quit
";

#[derive(Parser, Debug)]
#[command(name = "mview", about = "Browse a set of images one at a time", after_help = HELP_KEYS)]
pub struct Cli {
    /// Images or directories to open at startup (optional)
    pub paths: Vec<std::path::PathBuf>,

    /// Recurse into subdirectories given on the command line
    #[arg(short, long)]
    pub recursive: bool,

    /// Resampling filter used when shrinking images to fit the window
    #[arg(long, value_enum, default_value_t = ScaleFilter::Lanczos3)]
    pub filter: ScaleFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_launches_empty() {
        let cli = Cli::try_parse_from(["mview"]).expect("parse failed");
        assert!(cli.paths.is_empty());
        assert!(!cli.recursive);
        assert_eq!(cli.filter, ScaleFilter::Lanczos3);
    }

    #[test]
    fn paths_and_filter_parse() {
        let cli = Cli::try_parse_from(["mview", "-r", "--filter", "nearest", "a.png", "pics"])
            .expect("parse failed");
        assert_eq!(cli.paths.len(), 2);
        assert!(cli.recursive);
        assert_eq!(cli.filter, ScaleFilter::Nearest);
    }
}
