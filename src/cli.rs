use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trackforge")]
#[command(author, version, about = "Probe, remux and edit Matroska track properties")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe media files and display their streams
    Probe {
        /// Files to probe
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Dump every raw section field instead of the typed summary
        #[arg(long)]
        raw: bool,
    },

    /// Remux files into Matroska
    Convert {
        /// Source files
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Directory for the converted files (defaults to next to each source)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Edit container and track properties in place
    Edit(EditArgs),

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct EditArgs {
    /// Matroska file to edit
    pub file: PathBuf,

    /// Set the container title
    #[arg(long, conflicts_with = "clear_title")]
    pub title: Option<String>,

    /// Remove the container title
    #[arg(long)]
    pub clear_title: bool,

    /// Set the name of the first video track
    #[arg(long, conflicts_with = "clear_name")]
    pub name: Option<String>,

    /// Remove the name of the first video track
    #[arg(long)]
    pub clear_name: bool,

    /// Set the stereoscopic mode of the first video track (0-14)
    #[arg(long, conflicts_with = "clear_stereo_mode", value_parser = clap::value_parser!(u8).range(0..=14))]
    pub stereo_mode: Option<u8>,

    /// Remove the stereoscopic mode of the first video track
    #[arg(long)]
    pub clear_stereo_mode: bool,

    /// Set an audio track language, e.g. `0=de` (0-based track index)
    #[arg(long = "language", value_name = "IDX=TAG", value_parser = parse_indexed)]
    pub languages: Vec<(usize, String)>,

    /// Set an audio track default flag, e.g. `1=yes` (0-based track index)
    #[arg(long = "default", value_name = "IDX=yes|no", value_parser = parse_flag)]
    pub defaults: Vec<(usize, bool)>,
}

fn parse_indexed(s: &str) -> Result<(usize, String), String> {
    let (idx, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected IDX=VALUE, got '{s}'"))?;
    let idx = idx
        .trim()
        .parse()
        .map_err(|_| format!("invalid track index '{idx}'"))?;
    Ok((idx, value.trim().to_string()))
}

fn parse_flag(s: &str) -> Result<(usize, bool), String> {
    let (idx, value) = parse_indexed(s)?;
    let flag = match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => true,
        "no" | "false" | "0" => false,
        other => return Err(format!("expected yes or no, got '{other}'")),
    };
    Ok((idx, flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_values() {
        assert_eq!(parse_indexed("0=de"), Ok((0, "de".to_string())));
        assert_eq!(parse_indexed("1 = German"), Ok((1, "German".to_string())));
        assert!(parse_indexed("de").is_err());
        assert!(parse_indexed("x=de").is_err());
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("0=yes"), Ok((0, true)));
        assert_eq!(parse_flag("1=No"), Ok((1, false)));
        assert!(parse_flag("1=maybe").is_err());
    }

    #[test]
    fn edit_command_parses() {
        let cli = Cli::try_parse_from([
            "trackforge",
            "edit",
            "movie.mkv",
            "--title",
            "New",
            "--language",
            "0=de",
            "--language",
            "1=en",
            "--default",
            "1=no",
        ])
        .unwrap();
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.title.as_deref(), Some("New"));
        assert_eq!(args.languages, [(0, "de".to_string()), (1, "en".to_string())]);
        assert_eq!(args.defaults, [(1, false)]);
    }

    #[test]
    fn conflicting_title_flags_rejected() {
        let res = Cli::try_parse_from(["trackforge", "edit", "m.mkv", "--title", "x", "--clear-title"]);
        assert!(res.is_err());
    }
}
