//! CLI argument definitions
//!
//! All Clap derive structs for `parlor` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Memory and guessing mini-games for the terminal.
#[derive(Parser, Debug)]
#[command(name = "parlor", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PARLOR_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: OutputFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow the ball while the hats are shuffled, then guess where it is.
    HatTrick(HatTrickArgs),

    /// Turn every cup face down, flipping a fixed number per move.
    CupFlip(CupFlipArgs),

    /// Memorize who is behind each door, then find the named character.
    FindCharacter(FindCharacterArgs),

    /// Validate configuration files without playing.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Game Commands
// ============================================================================

/// Options shared by every game.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "PARLOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for reproducible rounds.
    #[arg(long, env = "PARLOR_SEED")]
    pub seed: Option<u64>,

    /// Write a JSONL event stream to this file (`-` for stderr).
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Stop after this many rounds.
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Skip every delay.
    #[arg(long)]
    pub instant: bool,

    /// Serve Prometheus metrics on 127.0.0.1 at this port.
    #[arg(long, env = "PARLOR_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `hat-trick`.
#[derive(Args, Debug, Clone)]
pub struct HatTrickArgs {
    /// Session options.
    #[command(flatten)]
    pub session: SessionArgs,

    /// Override the number of hats.
    #[arg(long)]
    pub slots: Option<usize>,

    /// Override the number of swaps per round.
    #[arg(long)]
    pub swaps: Option<usize>,
}

/// Arguments for `cup-flip`.
#[derive(Args, Debug, Clone)]
pub struct CupFlipArgs {
    /// Session options.
    #[command(flatten)]
    pub session: SessionArgs,

    /// Override the number of cups.
    #[arg(long)]
    pub cups: Option<usize>,

    /// Override the number of cups flipped per move.
    #[arg(long)]
    pub flips_per_move: Option<usize>,
}

/// Arguments for `find-character`.
#[derive(Args, Debug, Clone)]
pub struct FindCharacterArgs {
    /// Session options.
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hat_trick_with_overrides() {
        let cli = Cli::try_parse_from([
            "parlor",
            "hat-trick",
            "--slots",
            "4",
            "--swaps",
            "6",
            "--seed",
            "42",
            "--rounds",
            "2",
        ])
        .unwrap();

        let Commands::HatTrick(args) = cli.command else {
            panic!("expected hat-trick");
        };
        assert_eq!(args.slots, Some(4));
        assert_eq!(args.swaps, Some(6));
        assert_eq!(args.session.seed, Some(42));
        assert_eq!(args.session.rounds, Some(2));
        assert!(!args.session.instant);
    }

    #[test]
    fn cup_flip_flags() {
        let cli =
            Cli::try_parse_from(["parlor", "cup-flip", "--cups", "7", "--flips-per-move", "3"])
                .unwrap();
        let Commands::CupFlip(args) = cli.command else {
            panic!("expected cup-flip");
        };
        assert_eq!(args.cups, Some(7));
        assert_eq!(args.flips_per_move, Some(3));
        assert_eq!(args.session.metrics_port, None);
    }

    #[test]
    fn metrics_port_is_opt_in() {
        let cli = Cli::try_parse_from(["parlor", "hat-trick", "--metrics-port", "9464"]).unwrap();
        let Commands::HatTrick(args) = cli.command else {
            panic!("expected hat-trick");
        };
        assert_eq!(args.session.metrics_port, Some(9464));
        assert!(Cli::try_parse_from(["parlor", "hat-trick", "--metrics-port", "x"]).is_err());
    }

    #[test]
    fn find_character_instant() {
        let cli = Cli::try_parse_from(["parlor", "find-character", "--instant"]).unwrap();
        let Commands::FindCharacter(args) = cli.command else {
            panic!("expected find-character");
        };
        assert!(args.session.instant);
    }

    #[test]
    fn validate_requires_files() {
        assert!(Cli::try_parse_from(["parlor", "validate"]).is_err());
        let cli = Cli::try_parse_from(["parlor", "validate", "a.yaml", "--strict"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.files.len(), 1);
        assert!(args.strict);
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["parlor", "version", "-vv", "--color", "never"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn help_output() {
        let err = Cli::try_parse_from(["parlor", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_output() {
        let err = Cli::try_parse_from(["parlor", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn unknown_shell_rejected() {
        assert!(Cli::try_parse_from(["parlor", "completions", "tcsh"]).is_err());
    }
}
