use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::export::{build_export, write_export};
use crate::history::{FileStorage, HistoryStore, MemoryStorage};
use crate::logging::{self, LogTarget};
use crate::metrics::format_search_time;
use crate::models::SearchMode;
use crate::search::{GitHubClient, SearchEvent, SearchSession, validate_search_query};
use crate::tui;
use crate::utils::format_path_with_tilde;
use crate::utils::terminal::{single_line, strip_ansi_codes};

/// Number of languages listed under the results
const TOP_LANGUAGES: usize = 5;

#[derive(Parser)]
#[command(name = "github-repo-explorer")]
#[command(version)]
#[command(about = "Search public GitHub repositories from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search repositories and print the results
    Search {
        /// Free-text search query
        query: String,
        /// Search preset (quick: 20 results, exhaustive: 50)
        #[arg(long, value_enum, default_value_t = SearchMode::Quick)]
        mode: SearchMode,
        /// Print results, metrics and language stats as JSON
        #[arg(long)]
        json: bool,
        /// Also write the results as a JSON export into DIR
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
        /// Do not record this search in the history
        #[arg(long)]
        no_history: bool,
    },
    /// Show or edit the search history
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// Open the interactive search panel
    Interactive {
        /// Initial search preset
        #[arg(long, value_enum, default_value_t = SearchMode::Quick)]
        mode: SearchMode,
        /// Run this query on startup
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List recent searches, most recent first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete all saved searches
    Clear,
    /// Delete one saved search by id
    Remove { id: String },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { query, mode, json, export, no_history }) => {
            logging::init(LogTarget::Stderr)?;
            let config = Config::from_env()?;
            run_search(&config, &query, mode, json, export.as_deref(), no_history)?;
        }
        Some(Commands::History { action }) => {
            logging::init(LogTarget::Stderr)?;
            let config = Config::from_env()?;
            run_history(&config, action)?;
        }
        Some(Commands::Interactive { mode, query }) => {
            let config = Config::from_env()?;
            logging::init(LogTarget::File(&config.log_path()))?;
            run_interactive(&config, mode, query)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn history_store(config: &Config, persist: bool) -> HistoryStore {
    if persist {
        HistoryStore::new(Box::new(FileStorage::new(&config.data_dir)))
    } else {
        HistoryStore::new(Box::new(MemoryStorage::new()))
    }
}

fn run_search(
    config: &Config,
    query: &str,
    mode: SearchMode,
    json: bool,
    export_dir: Option<&Path>,
    no_history: bool,
) -> Result<()> {
    validate_search_query(query)?;

    let runtime = build_runtime()?;
    let client = GitHubClient::new(config)?;
    let mut session = SearchSession::new(
        Arc::new(client),
        runtime.handle().clone(),
        history_store(config, !no_history),
    );
    session.set_mode(mode);
    session.search(query)?;

    let event = runtime
        .block_on(session.next_event())
        .context("Search task ended without a result")?;
    let search_time_ms = match event {
        SearchEvent::Completed { search_time_ms, .. } => search_time_ms,
        SearchEvent::Failed { message, .. } => anyhow::bail!(message),
    };

    if json {
        print_json(&session)?;
    } else {
        print_results(&session, search_time_ms);
    }

    if let Some(dir) = export_dir {
        let document = build_export(query, mode, session.repositories(), Utc::now());
        let path = write_export(dir, &document)?;
        // stdout stays machine-readable with --json
        eprintln!(
            "Exported {} repositories to {}",
            document.repositories.len(),
            format_path_with_tilde(&path)
        );
    }

    Ok(())
}

fn print_json(session: &SearchSession) -> Result<()> {
    let output = serde_json::json!({
        "query": session.searched_query(),
        "searchType": session.mode(),
        "metrics": session.metrics(),
        "languageStats": session.language_stats(),
        "repositories": session.repositories(),
    });
    println!("{}", serde_json::to_string_pretty(&output).context("Failed to serialize results")?);
    Ok(())
}

fn print_results(session: &SearchSession, search_time_ms: u64) {
    let repositories = session.repositories();
    let query = session.searched_query().unwrap_or_default();

    println!(
        "Found {} repositories for \"{}\" in {} ({})",
        repositories.len(),
        strip_ansi_codes(query),
        format_search_time(search_time_ms),
        session.mode()
    );

    if repositories.is_empty() {
        return;
    }
    println!();

    for (idx, repo) in repositories.iter().enumerate() {
        let r = &repo.repository;
        println!(
            "{:>3}. {}  ★ {}  ⑂ {}  {}  {}% match",
            idx + 1,
            strip_ansi_codes(&r.full_name),
            r.stargazers_count,
            r.forks_count,
            r.language.as_deref().map(strip_ansi_codes).unwrap_or_else(|| "-".to_string()),
            repo.similarity.overall_similarity
        );
        if let Some(description) = r.description.as_deref().filter(|d| !d.trim().is_empty()) {
            println!("     {}", single_line(description, 100));
        }
        println!("     {}", r.html_url);
    }

    if let Some(metrics) = session.metrics() {
        println!();
        println!("Search Metrics");
        println!("==============");
        println!("Repositories: {}", metrics.total_repositories);
        println!("Languages: {}", metrics.unique_languages);
        println!("Most popular: {}", strip_ansi_codes(&metrics.most_popular_language));
        println!("Average stars: {}", metrics.average_stars);
        println!("Average forks: {}", metrics.average_forks);
    }

    let stats = session.language_stats();
    if !stats.is_empty() {
        println!();
        println!("Top languages:");
        for stat in stats.iter().take(TOP_LANGUAGES) {
            println!(
                "  {:<16} {:>3} ({:>3}%)  ★ {}",
                strip_ansi_codes(&stat.language),
                stat.count,
                stat.percentage,
                stat.total_stars
            );
        }
    }
}

fn run_history(config: &Config, action: HistoryCommand) -> Result<()> {
    let mut store = history_store(config, true);

    match action {
        HistoryCommand::List { json } => {
            let entries = store.load();
            if json {
                let output =
                    serde_json::to_string_pretty(&entries).context("Failed to serialize history")?;
                println!("{}", output);
            } else if entries.is_empty() {
                println!("No search history");
            } else {
                println!("Recent searches");
                println!("===============");
                for entry in &entries {
                    println!(
                        "{}  {}  {:<10} {:>3} results  {}",
                        entry.id,
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        entry.search_mode,
                        entry.result_count,
                        strip_ansi_codes(&entry.query)
                    );
                }
            }
        }
        HistoryCommand::Clear => {
            store.clear();
            println!("Search history cleared");
        }
        HistoryCommand::Remove { id } => {
            if !store.remove(&id) {
                anyhow::bail!("No history entry with id {}", id);
            }
            println!("Removed {}", id);
        }
    }

    Ok(())
}

fn run_interactive(config: &Config, mode: SearchMode, query: Option<String>) -> Result<()> {
    let runtime = build_runtime()?;
    let client = GitHubClient::new(config)?;
    let mut session =
        SearchSession::new(Arc::new(client), runtime.handle().clone(), history_store(config, true));
    session.set_mode(mode);

    if let Some(query) = query {
        session.set_query(query);
        // Invalid startup queries stay in the input with their inline error
        if let Err(e) = session.submit() {
            log::warn!("Startup query rejected: {}", e);
        }
    }

    let export_dir = std::env::current_dir().context("Failed to resolve current directory")?;
    tui::run_interactive(session, export_dir)
}
