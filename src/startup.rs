//! Command handlers wiring configuration, HTTP clients and the session controller.
//!
//! Every handler is a thin presentation layer: it sends commands to a
//! [`SessionController`] and renders the snapshots it gets back.

use crate::api_client::{HttpRecommendationService, LastFmArtistSearch};
use crate::configuration::{self, ConfigFolder, Settings};
use crate::session::{RequestState, SessionController, SessionSnapshot, MAX_ARTISTS};
use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

pub fn load_settings(cfg_folder: &ConfigFolder) -> anyhow::Result<Settings> {
    if !cfg_folder.config_file.exists() {
        debug!(
            path = %cfg_folder.config_file.display(),
            "no configuration file, using defaults and environment"
        );
    }
    configuration::get_configuration(&cfg_folder.config_file)
        .context("Unable to parse configuration file")
}

pub fn build_controller(settings: &Settings) -> anyhow::Result<SessionController> {
    let service = HttpRecommendationService::new(&settings.api)
        .context("Failed to build the recommendation client")?;
    let search = LastFmArtistSearch::new(&settings.search)
        .context("Failed to build the artist search client")?;

    Ok(SessionController::new(
        Arc::new(service),
        Arc::new(search),
        settings.messages.clone(),
    ))
}

/// One-shot recommendation for `artists`, following up to `pages` pages.
pub async fn run_recommend(
    cfg_folder: ConfigFolder,
    artists: Vec<String>,
    pages: usize,
    json: bool,
) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let controller = build_controller(&settings)?;

    for artist in &artists {
        if !controller.select_artist(artist) {
            warn!(artist = %artist, "artist ignored");
            eprintln!(
                "\x1b[33mIgnoring '{}': duplicate, blank or more than {} artists.\x1b[0m",
                artist, MAX_ARTISTS
            );
        }
    }

    with_spinner("Generating recommendations...", controller.request_recommendations()).await;

    let mut fetched = 1;
    while fetched < pages && controller.snapshot().page.has_more {
        with_spinner("Loading more...", controller.load_more()).await?;
        if controller.snapshot().request_state.is_failed() {
            break;
        }
        fetched += 1;
    }

    let snapshot = controller.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    if let RequestState::Failed(message) = snapshot.request_state {
        bail!(message);
    }
    Ok(())
}

/// Interactive session reading commands from stdin.
pub async fn run_session(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let controller = build_controller(&settings)?;

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("\x1b[31m{}\x1b[0m", e);
                continue;
            }
        };

        match command {
            SessionCommand::Add(name) => {
                if !controller.select_artist(&name) {
                    println!("\x1b[33m'{}' was not added.\x1b[0m", name);
                }
                print_snapshot(&controller.snapshot());
            }
            SessionCommand::Remove(index) => {
                if !controller.remove_artist(index) {
                    println!("\x1b[33mNo artist at position {}.\x1b[0m", index + 1);
                }
                print_snapshot(&controller.snapshot());
            }
            SessionCommand::Search(partial) => {
                let candidates = controller.suggest_artists(&partial).await;
                print_candidates(&candidates);
            }
            SessionCommand::Go => {
                with_spinner(
                    "Generating recommendations...",
                    controller.request_recommendations(),
                )
                .await;
                print_snapshot(&controller.snapshot());
            }
            SessionCommand::More => {
                if let Err(e) = with_spinner("Loading more...", controller.load_more()).await {
                    println!("\x1b[33m{}\x1b[0m", e);
                }
                print_snapshot(&controller.snapshot());
            }
            SessionCommand::Dismiss => {
                controller.dismiss_error();
                print_snapshot(&controller.snapshot());
            }
            SessionCommand::Show => print_snapshot(&controller.snapshot()),
            SessionCommand::Clear => {
                controller.reset();
                print_snapshot(&controller.snapshot());
            }
            SessionCommand::Help => print_help(),
            SessionCommand::Quit => break,
        }
    }

    Ok(())
}

pub async fn run_health(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let service = HttpRecommendationService::new(&settings.api)
        .context("Failed to build the recommendation client")?;

    let health = service
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", service.base_url()))?;

    println!(
        "\x1b[32mBackend status: {} ({} artists indexed)\x1b[0m",
        health.status, health.total_artists
    );
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Add(String),
    /// Zero-based position.
    Remove(usize),
    Search(String),
    Go,
    More,
    Dismiss,
    Show,
    Clear,
    Help,
    Quit,
}

impl SessionCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "add" if !rest.is_empty() => Ok(SessionCommand::Add(rest.to_string())),
            "rm" | "remove" => rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(SessionCommand::Remove)
                .ok_or_else(|| format!("Usage: rm <1..{}>", MAX_ARTISTS)),
            "search" if !rest.is_empty() => Ok(SessionCommand::Search(rest.to_string())),
            "go" => Ok(SessionCommand::Go),
            "more" => Ok(SessionCommand::More),
            "dismiss" => Ok(SessionCommand::Dismiss),
            "show" => Ok(SessionCommand::Show),
            "clear" => Ok(SessionCommand::Clear),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" => Ok(SessionCommand::Quit),
            "add" | "search" => Err(format!("Usage: {} <artist name>", verb)),
            _ => Err(format!("Unknown command '{}'. Type 'help'.", verb)),
        }
    }
}

async fn with_spinner<F: Future>(message: &'static str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    println!(
        "\x1b[1m\x1b[34mSelected artists ({}/{}):\x1b[0m",
        snapshot.artists.len(),
        MAX_ARTISTS
    );
    if snapshot.artists.is_empty() {
        println!("  (none)");
    }
    for (i, artist) in snapshot.artists.iter().enumerate() {
        println!("  {}. {}", i + 1, artist);
    }

    let page = &snapshot.page;
    if !page.items.is_empty() {
        println!("\x1b[1m\x1b[34mRecommendations:\x1b[0m");
        for (i, artist) in page.items.iter().enumerate() {
            println!("  \x1b[32m{:>2}.\x1b[0m {}", i + 1, artist);
        }
        println!(
            "Showing {} of {} results{}",
            page.items.len(),
            page.total_found,
            if page.has_more { " - type 'more' for 5 more" } else { "" }
        );
    }
    if !page.not_found.is_empty() {
        println!(
            "\x1b[33mNot in the dataset: {}\x1b[0m",
            page.not_found.join(", ")
        );
    }

    match &snapshot.request_state {
        RequestState::Failed(message) => println!("\x1b[31m{}\x1b[0m", message),
        RequestState::Loading | RequestState::LoadingMore => println!("Loading..."),
        RequestState::Idle => {}
    }
}

fn print_candidates(candidates: &[String]) {
    if candidates.is_empty() {
        println!("\x1b[33mNo suggestions.\x1b[0m");
        return;
    }
    println!("\x1b[1m\x1b[34mSuggestions:\x1b[0m");
    for candidate in candidates {
        println!("  - {}", candidate);
    }
}

fn print_help() {
    println!("📖 Session commands:");
    println!("  \x1b[1m\x1b[32madd <name>\x1b[0m     - select a reference artist (up to {})", MAX_ARTISTS);
    println!("  \x1b[1m\x1b[32mrm <n>\x1b[0m         - remove the n-th selected artist");
    println!("  \x1b[1m\x1b[32msearch <text>\x1b[0m  - suggest artist names (3+ characters)");
    println!("  \x1b[1m\x1b[32mgo\x1b[0m             - get recommendations");
    println!("  \x1b[1m\x1b[32mmore\x1b[0m           - load the next 5 recommendations");
    println!("  \x1b[1m\x1b[32mdismiss\x1b[0m        - clear the current error");
    println!("  \x1b[1m\x1b[32mshow\x1b[0m           - print the current state");
    println!("  \x1b[1m\x1b[32mclear\x1b[0m          - start over");
    println!("  \x1b[1m\x1b[32mquit\x1b[0m           - leave the session");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            SessionCommand::parse("add  Massive Attack "),
            Ok(SessionCommand::Add("Massive Attack".into()))
        );
        assert_eq!(SessionCommand::parse("rm 2"), Ok(SessionCommand::Remove(1)));
        assert_eq!(
            SessionCommand::parse("SEARCH radio"),
            Ok(SessionCommand::Search("radio".into()))
        );
        assert_eq!(SessionCommand::parse("go"), Ok(SessionCommand::Go));
        assert_eq!(SessionCommand::parse("more"), Ok(SessionCommand::More));
        assert_eq!(SessionCommand::parse("exit"), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(SessionCommand::parse("add").is_err());
        assert!(SessionCommand::parse("rm 0").is_err());
        assert!(SessionCommand::parse("rm x").is_err());
        assert!(SessionCommand::parse("search").is_err());
        assert!(SessionCommand::parse("dance").is_err());
    }

    #[test]
    fn test_build_controller_from_defaults() {
        let controller = build_controller(&Settings::default()).unwrap();
        let snapshot = controller.snapshot();

        assert!(snapshot.artists.is_empty());
        assert_eq!(snapshot.request_state, RequestState::Idle);
    }
}
