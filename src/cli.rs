// Command-line surface

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};

use crate::input::KEY_HELP;

#[derive(Parser, Debug)]
#[command(
    name = "glances",
    version,
    about = "Glances is a simple CLI monitoring tool",
    disable_version_flag = true
)]
pub struct Args {
    /// Set the refresh time in seconds
    #[arg(
        short = 't',
        long = "time",
        value_name = "SEC",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub time: Option<u64>,

    /// Display the version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn command() -> clap::Command {
    let mut keys = String::from("When Glances is running, you can press:\n");
    keys.push_str("  'h' to hide or show the help message\n");
    for (key, what) in KEY_HELP {
        keys.push_str(&format!("  '{}' {}\n", key, what));
    }
    Args::command().after_help(keys)
}

/// Parse the process arguments; prints usage and exits on error, `--help`
/// or `--version`.
pub fn parse() -> Args {
    match try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}

pub fn try_parse_from<I, T>(itr: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command().try_get_matches_from(itr)?;
    Args::from_arg_matches(&matches)
}
