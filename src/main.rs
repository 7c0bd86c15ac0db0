use anyhow::Result;
use colored::Colorize;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use archive_gate::access::GitHubDirectory;
use archive_gate::archive::{LocalFsStore, Listing};
use archive_gate::core::{GateConfig, GateError};
use archive_gate::{logging, ArchiveGate};

const USAGE: &str = "Usage:
    archive-gate browse <username> [path]
    archive-gate download <username> <key>

Environment:
    GITHUB_TOKEN           token used for team membership lookups
    AC_ORG, AC_TEAM        organization and team granting access
    AWS_BUCKET             archive root directory
    ARCHIVE_DELIMITER      key delimiter (default /)
    ARCHIVE_GATE_CONFIG    JSON configuration file, replaces the four above";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Browse { username: String, path: String },
    Download { username: String, key: String },
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [cmd, username] if cmd == "browse" => Some(Command::Browse {
                username: username.clone(),
                path: String::new(),
            }),
            [cmd, username, path] if cmd == "browse" => Some(Command::Browse {
                username: username.clone(),
                path: path.clone(),
            }),
            [cmd, username, key] if cmd == "download" => Some(Command::Download {
                username: username.clone(),
                key: key.clone(),
            }),
            _ => None,
        }
    }
}

fn load_config() -> Result<GateConfig> {
    let config = match env::var("ARCHIVE_GATE_CONFIG") {
        Ok(path) => GateConfig::load(path)?,
        Err(_) => GateConfig::from_env()?,
    };
    Ok(config)
}

fn print_listing(listing: &Listing) {
    if !listing.path.is_empty() {
        let parent = listing.parent.as_deref().unwrap_or("/");
        println!("{}  {}", "..".blue().bold(), parent.dimmed());
    }

    for entry in &listing.entries {
        if entry.is_container {
            println!("{}", entry.display_name.blue().bold());
        } else {
            println!("{}", entry.display_name);
        }
    }
}

fn report(err: &GateError) -> ExitCode {
    if err.is_denial() {
        eprintln!("{} {}", "Forbidden:".red().bold(), err);
    } else {
        eprintln!("{} {}", "Not found:".yellow().bold(), err);
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _log_guard = logging::init_logging()?;

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Some(command) => command,
        None => {
            eprintln!("{}", USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    let config = load_config()?;
    let directory = Arc::new(GitHubDirectory::from_env()?);
    let store = Arc::new(LocalFsStore::new(&config.bucket));
    let gate = ArchiveGate::from_config(&config, directory, store)?;

    tracing::info!("=== Archive gate: {:?} ===", command);

    let code = match command {
        Command::Browse { username, path } => match gate.browse(&username, &path).await {
            Ok(listing) => {
                print_listing(&listing);
                ExitCode::SUCCESS
            }
            Err(e) => report(&e),
        },
        Command::Download { username, key } => match gate.download_url(&username, &key).await {
            Ok(url) => {
                println!("{}", url);
                ExitCode::SUCCESS
            }
            Err(e) => report(&e),
        },
    };

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse(&args(&["browse", "octocat"])),
            Some(Command::Browse {
                username: "octocat".into(),
                path: String::new()
            })
        );
        assert_eq!(
            Command::parse(&args(&["browse", "octocat", "release/"])),
            Some(Command::Browse {
                username: "octocat".into(),
                path: "release/".into()
            })
        );
        assert_eq!(
            Command::parse(&args(&["download", "octocat", "release/NOTES"])),
            Some(Command::Download {
                username: "octocat".into(),
                key: "release/NOTES".into()
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_usage() {
        assert_eq!(Command::parse(&args(&[])), None);
        assert_eq!(Command::parse(&args(&["download", "octocat"])), None);
        assert_eq!(Command::parse(&args(&["upload", "octocat", "x"])), None);
    }
}
