use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{poll as event_poll, read as event_read, Event as CrosstermEvent, KeyEventKind};
use ratatui::Terminal;
use repotree::app::App;
use repotree::config::{Config, ThemeChoice, ViewerOptions};
use repotree::config_io::DirectoryContext;
use repotree::model::repo::{parse_github_url, RepoId};
use repotree::model::tree::build_file_tree;
use repotree::services::cache::RepoCache;
use repotree::services::clipboard::Clipboard;
use repotree::services::github::GitHubClient;
use repotree::services::loader::RepoLoader;
use repotree::services::terminal_modes::{self, TerminalModes};
use repotree::services::time_source::{RealTimeSource, SharedTimeSource};
use repotree::services::token::{resolve_token, TokenStore, TOKEN_ENV};
use repotree::services::{log_dirs, tracing_setup};
use repotree::ui::{self, Theme};
use repotree::view::{outline, RenderOptions, RenderedTree};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Browse the file tree of a GitHub repository in the terminal
#[derive(Parser, Debug)]
#[command(name = "repotree")]
#[command(about = "Browse the file tree of a GitHub repository", long_about = None)]
#[command(version)]
struct Args {
    /// Repository URL or owner/repo
    #[arg(value_name = "REPO")]
    repo: Option<String>,

    /// Viewer options as a query string, e.g. "repo=owner/repo&expand=true&theme=dark"
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Start with every directory expanded
    #[arg(long)]
    expand: bool,

    /// Color scheme: auto, dark or light
    #[arg(long, value_name = "THEME")]
    theme: Option<String>,

    /// Leave the terminal background showing
    #[arg(long)]
    transparent: bool,

    /// GitHub personal access token for this run (overrides GITHUB_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Store a personal access token for future runs and exit
    #[arg(long, value_name = "TOKEN")]
    save_token: Option<String>,

    /// Remove the stored personal access token and exit
    #[arg(long)]
    clear_token: bool,

    /// Ignore the cached copy and fetch again
    #[arg(long)]
    refresh: bool,

    /// Print the tree to stdout instead of starting the viewer
    #[arg(long)]
    print: bool,

    /// Initial search query
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the directories used by repotree and exit
    #[arg(long)]
    show_paths: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Effective configuration: config file, then query string, then flags
fn resolve_config(args: &Args, dir_context: &DirectoryContext) -> (Config, Option<String>) {
    let mut config = Config::load_or_default(dir_context, args.config.as_deref());

    let query = args
        .query
        .as_deref()
        .map(ViewerOptions::from_query)
        .unwrap_or_default();
    query.apply_to(&mut config);

    if args.expand {
        config.expand_folders = true;
    }
    if let Some(theme) = &args.theme {
        config.theme = ThemeChoice::parse(theme);
    }
    if args.transparent {
        config.transparent = true;
    }

    let repo = args.repo.clone().or(query.repo);
    (config, repo)
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let dir_context = DirectoryContext::from_system()?;

    if args.show_paths {
        log_dirs::print_all_paths(&dir_context);
        return Ok(());
    }

    let token_store = TokenStore::new(dir_context.token_path());
    if args.clear_token {
        token_store
            .clear()
            .context("Failed to remove stored token")?;
        println!("Removed stored GitHub token");
        return Ok(());
    }
    if let Some(token) = &args.save_token {
        let saved = token_store
            .save(token)
            .with_context(|| format!("Failed to write {}", dir_context.token_path().display()))?;
        if !saved {
            anyhow::bail!("Refusing to store an empty token");
        }
        println!("Stored GitHub token in {}", dir_context.token_path().display());
        return Ok(());
    }

    let (config, repo_input) = resolve_config(&args, &dir_context);

    if args.dump_config {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not create log file {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("repotree starting");

    let time_source: SharedTimeSource = RealTimeSource::shared();
    let env_token = std::env::var(TOKEN_ENV).ok();
    let token = resolve_token(args.token.as_deref(), env_token.as_deref(), &token_store);
    let client = GitHubClient::new(&config.api_base_url, token, config.request_timeout())
        .with_time_source(time_source.clone());
    tracing::info!("Authenticated requests: {}", client.is_authenticated());

    let cache = RepoCache::new(dir_context.repo_cache_dir(), config.cache_ttl());
    let loader = RepoLoader::new(Arc::new(client), Some(cache), time_source.clone());

    if args.print {
        let input = repo_input.context("A repository is required with --print")?;
        let repo = parse_github_url(&input)
            .with_context(|| format!("Not a GitHub repository: {}", input))?;
        return print_tree(&loader, &repo, &config, &args);
    }

    run_viewer(config, loader, token_store, time_source, repo_input, &args)
}

/// Load synchronously and print the tree, fully expanded
fn print_tree(
    loader: &RepoLoader,
    repo: &RepoId,
    config: &Config,
    args: &Args,
) -> AnyhowResult<()> {
    let (snapshot, _) = loader
        .load(repo, args.refresh)
        .with_context(|| format!("Failed to load {}", repo))?;

    let mut tree = RenderedTree::render(
        build_file_tree(Some(&snapshot.entries)),
        RenderOptions {
            initially_expanded: true,
        },
    );
    if let Some(query) = &args.search {
        tree.apply_search(query);
    }

    println!("{}", snapshot.metadata.full_name);
    print!("{}", outline(&tree, config.show_icons));
    if snapshot.truncated {
        eprintln!("Warning: GitHub truncated the listing for this repository");
    }
    Ok(())
}

fn run_viewer(
    config: Config,
    loader: RepoLoader,
    token_store: TokenStore,
    time_source: SharedTimeSource,
    repo_input: Option<String>,
    args: &Args,
) -> AnyhowResult<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let theme = Theme::resolve(config.theme, config.transparent);
    let mut app =
        App::new(config, loader, Clipboard::new(), time_source).with_token_store(token_store);

    if let Some(query) = &args.search {
        app.search(query);
    }
    if let Some(input) = &repo_input {
        app.open(input, args.refresh);
    }

    let _modes = TerminalModes::enable()?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    run_event_loop(&mut app, &mut terminal, &theme)
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
    theme: &Theme,
) -> AnyhowResult<()> {
    const POLL_INTERVAL: Duration = Duration::from_millis(100);
    let mut needs_render = true;

    loop {
        if app.drain_completions() {
            needs_render = true;
        }

        if app.should_quit() {
            tracing::info!("Quitting");
            break;
        }

        if needs_render {
            terminal.draw(|frame| ui::draw(frame, app, theme))?;
            needs_render = false;
        }

        if !event_poll(POLL_INTERVAL)? {
            // Let expiring status messages and loading notices update
            needs_render = app.status_message().is_some() || app.state().is_loading();
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    app.handle_key(key_event);
                    needs_render = true;
                }
            }
            CrosstermEvent::Paste(text) => {
                app.paste(&text);
                needs_render = true;
            }
            CrosstermEvent::Resize(_, _) => needs_render = true,
            _ => {}
        }
    }

    Ok(())
}
