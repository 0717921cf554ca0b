use crate::models::CliFlags;
use clap::{Parser, Subcommand};

/// One handler per subcommand.
pub mod handlers;

/// dcsh: an interactive shell for docker-compose, with tasks defined in YAML.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
// `help` is a dcsh screen, not clap's help subcommand.
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Turns off ANSI colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Runs docker-compose using sudo.
    #[arg(short, long, global = true)]
    pub sudo: bool,

    /// Enables debug output.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// The subcommand to run; `shell` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// The dcsh subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launches the interactive shell (default).
    #[command(alias = "launch")]
    Shell,
    /// Shows the merged configuration.
    Show {
        /// Dumps the merged settings tree as YAML.
        #[arg(long)]
        raw: bool,
    },
    /// Shows the shell commands and the configured tasks.
    Help,
}

impl Cli {
    /// The activation switches given on the command line.
    pub fn flags(&self) -> CliFlags {
        CliFlags {
            debug: self.debug,
            sudo: self.sudo,
            no_color: self.no_color,
        }
    }

    /// The requested subcommand, defaulting to the shell.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dcsh").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_shell_is_the_default_command() {
        let cli = parse(&[]);
        assert_eq!(cli.command(), Command::Shell);
        assert_eq!(cli.flags(), CliFlags::default());
    }

    #[test]
    fn test_launch_is_an_alias_of_shell() {
        assert_eq!(parse(&["launch"]).command(), Command::Shell);
    }

    #[test]
    fn test_flags_before_and_after_the_subcommand() {
        let cli = parse(&["-d", "show", "--raw", "--sudo", "--no-color"]);
        assert_eq!(cli.command(), Command::Show { raw: true });
        assert_eq!(
            cli.flags(),
            CliFlags {
                debug: true,
                sudo: true,
                no_color: true,
            }
        );
    }

    #[test]
    fn test_help_is_a_regular_subcommand() {
        assert_eq!(parse(&["help"]).command(), Command::Help);
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["dcsh", "frobnicate"]).is_err());
    }
}
