use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Sprout teaching-language snippet runner.
///
/// Sprout is the snippet engine behind a gamified introduction to functions:
/// learners type a small program, press run, and see the output or a single
/// friendly error. This CLI drives the same engine from the terminal.
///
/// EXAMPLES:
///     sprout run snippet.spr            Run a snippet
///     sprout check snippet.spr --tier 2 Validate against a lesson tier
///     sprout concepts snippet.spr       Show demonstrated concepts
///     sprout lessons lessons/           List available lessons
///     sprout play lessons/ --lesson 3   Drive a lesson end to end
///
/// ENVIRONMENT VARIABLES:
///     SPROUT_JSON   Set to '1' for JSON output by default
///     NO_COLOR      Set to disable colored output
#[derive(Parser)]
#[command(name = "sprout")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a snippet file
    ///
    /// Interprets the snippet and prints its output lines. A failed run
    /// prints the single learner-facing error.
    ///
    /// EXAMPLES:
    ///     sprout run snippet.spr            Run a snippet
    ///     sprout run snippet.spr --json     Emit the full report as JSON
    ///     sprout run snippet.spr --tier 2   Run with tier-2 capabilities
    #[command(visible_alias = "r")]
    Run {
        /// Path to the snippet file
        file: String,
        /// Output the run report in JSON format
        #[arg(long, env = "SPROUT_JSON")]
        json: bool,
        /// Capability tier to run under (default: everything unlocked)
        #[arg(long)]
        tier: Option<u8>,
    },

    /// Check a snippet without running it
    ///
    /// Lexes, parses, and capability-checks the snippet, reporting internal
    /// diagnostics instead of the collapsed learner message.
    ///
    /// EXAMPLES:
    ///     sprout check snippet.spr          Check with everything unlocked
    ///     sprout check snippet.spr --tier 0 Check against the starter tier
    #[command(visible_alias = "c")]
    Check {
        /// Path to the snippet file
        file: String,
        /// Capability tier to check against (default: everything unlocked)
        #[arg(long)]
        tier: Option<u8>,
    },

    /// Show the concepts a snippet demonstrates
    ///
    /// Runs the heuristic concept scan and lists each flag. This is the
    /// checklist signal, not a correctness verdict.
    Concepts {
        /// Path to the snippet file
        file: String,
        /// Output the concept list in JSON format
        #[arg(long, env = "SPROUT_JSON")]
        json: bool,
    },

    /// List the lessons in a directory
    Lessons {
        /// Directory containing lesson TOML files
        dir: String,
    },

    /// Drive one lesson end to end
    ///
    /// Runs the lesson's starter snippet, checks the challenge list, answers
    /// the quiz with the correct answers, and shows the reward grant.
    Play {
        /// Directory containing lesson TOML files
        dir: String,
        /// Lesson id to play
        #[arg(long)]
        lesson: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, json, tier } => commands::run::run(&file, json, tier)?,
        Commands::Check { file, tier } => commands::check::run(&file, tier)?,
        Commands::Concepts { file, json } => commands::concepts::run(&file, json)?,
        Commands::Lessons { dir } => commands::lessons::run(&dir)?,
        Commands::Play { dir, lesson } => commands::play::run(&dir, lesson)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::parse_from(["sprout", "run", "x.spr", "--json", "--tier", "2"]);
        match cli.command {
            Commands::Run { file, json, tier } => {
                assert_eq!(file, "x.spr");
                assert!(json);
                assert_eq!(tier, Some(2));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_alias() {
        let cli = Cli::parse_from(["sprout", "r", "x.spr"]);
        assert!(matches!(cli.command, Commands::Run { .. }));
    }

    #[test]
    fn test_play_requires_lesson_id() {
        assert!(Cli::try_parse_from(["sprout", "play", "lessons/"]).is_err());
    }
}
