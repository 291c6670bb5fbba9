use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use catalog::{Dog, FilterCriteria, SortDirection, ZipCode};
use controller::{AppContext, ControllerError, PageView, SearchPhase};
use gateway::{GatewayConfig, HttpGateway};
use state::{EventReceiver, Notice, Severity, StateEvent, drain};

/// PawMatch - browse shelter dogs and find a match
#[derive(Parser)]
#[command(name = "pawmatch")]
#[command(about = "Interactive shell for the dog catalog service", long_about = None)]
struct Cli {
    /// Catalog service base URL (overrides PAWMATCH_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides PAWMATCH_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,
}

/// One line typed at the prompt
#[derive(Parser)]
#[command(name = "", no_binary_name = true, disable_help_flag = true)]
#[command(disable_help_subcommand = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a session
    Login { name: String, email: String },

    /// End the session and forget favorites
    Logout,

    /// Show the breed list, optionally narrowed
    Breeds {
        /// Only breeds containing this text (case-insensitive)
        #[arg(long)]
        query: Option<String>,

        /// Show every match instead of the first ten
        #[arg(long)]
        all: bool,

        /// Select or deselect a breed for the next `filter`
        #[arg(long)]
        toggle: Vec<String>,
    },

    /// Set filters and search. Without --breed the breeds picked with
    /// `breeds --toggle` are used.
    Filter {
        #[arg(long = "breed")]
        breeds: Vec<String>,

        #[arg(long = "zip")]
        zip_codes: Vec<ZipCode>,

        #[arg(long)]
        age_min: Option<u32>,

        #[arg(long)]
        age_max: Option<u32>,

        /// asc or desc (by breed)
        #[arg(long, default_value = "asc")]
        sort: SortDirection,
    },

    /// Drop all filters (run `search` afterwards)
    ClearFilters,

    /// Search again with the current filters
    Search,

    /// Show the current page, or jump to page N
    Page { number: Option<usize> },

    Next,

    Prev,

    /// Add a dog from the current results to favorites
    Fav { id: String },

    /// Remove a dog from favorites
    Unfav { id: String },

    /// List favorites
    Favs,

    ClearFavs,

    /// Ask for a match among the favorites
    Match,

    /// Look up postal codes
    Locations {
        #[arg(required = true)]
        zip_codes: Vec<ZipCode>,
    },

    Help,

    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = GatewayConfig::load();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let gateway = HttpGateway::new(&config).context("Failed to set up the catalog client")?;
    println!(
        "{} Connected to {} (type {} for commands)",
        "✓".green(),
        gateway.base_url().bold(),
        "help".cyan()
    );

    let mut app = AppContext::new(Arc::new(gateway));
    let mut events = app.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&app).await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words = split_line(&line);
        if words.is_empty() {
            continue;
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                println!("{}", e.to_string().trim_end().yellow());
                continue;
            }
        };
        if matches!(command, Command::Quit) {
            break;
        }

        let start = Instant::now();
        let outcome = run(&mut app, command).await;
        print_notices(&mut events);
        match outcome {
            Ok(()) => tracing::debug!("Command finished in {:?}", start.elapsed()),
            // Already reported through a notice
            Err(e) if is_reported(&e) => {}
            Err(e) => println!("{} {:#}", "✗".red(), e),
        }
    }

    if app.session().is_authenticated() {
        app.logout().await.ok();
        print_notices(&mut events);
    }
    Ok(())
}

async fn prompt(app: &AppContext) -> Result<()> {
    let who = app
        .session()
        .identity()
        .map(|id| id.name.clone())
        .unwrap_or_else(|| "guest".to_string());
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{}> ", who.green()).as_bytes())
        .await?;
    stdout.flush().await?;
    Ok(())
}

/// Dispatch one parsed command
async fn run(app: &mut AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login { name, email } => {
            app.login(&name, &email).await?;
            print_page(&app.controller().page_view(), app);
        }
        Command::Logout => app.logout().await?,
        Command::Breeds { query, all, toggle } => handle_breeds(app, query, all, toggle),
        Command::Filter {
            breeds,
            zip_codes,
            age_min,
            age_max,
            sort,
        } => {
            let mut criteria = FilterCriteria::default()
                .with_age_range(age_min, age_max)
                .with_sort(sort);
            criteria.zip_codes = zip_codes;
            let criteria = if breeds.is_empty() {
                app.criteria_with_selected_breeds(criteria)
            } else {
                breeds
                    .into_iter()
                    .fold(criteria, |criteria, breed| criteria.with_breed(breed))
            };
            app.apply_filters(criteria).await?;
            print_page(&app.controller().page_view(), app);
        }
        Command::ClearFilters => {
            app.clear_filters();
            println!("Filters cleared");
        }
        Command::Search => {
            app.search().await?;
            print_page(&app.controller().page_view(), app);
        }
        Command::Page { number } => {
            if let Some(number) = number {
                app.controller().go_to_page(number);
            }
            print_page(&app.controller().page_view(), app);
        }
        Command::Next => {
            app.controller().next_page();
            print_page(&app.controller().page_view(), app);
        }
        Command::Prev => {
            app.controller().prev_page();
            print_page(&app.controller().page_view(), app);
        }
        Command::Fav { id } => {
            if !app.add_favorite(&id)? {
                println!("{} is already a favorite", id);
            }
        }
        Command::Unfav { id } => {
            if !app.remove_favorite(&id) {
                bail!("{} is not a favorite", id);
            }
        }
        Command::Favs => print_favorites(app),
        Command::ClearFavs => app.clear_favorites(),
        Command::Match => {
            let dog = app.request_match().await?;
            println!("{}", "You've been matched!".bold().magenta());
            println!("  {}", describe(&dog, true));
            println!("  {}", dog.img.dimmed());
        }
        Command::Locations { zip_codes } => {
            for location in app.locations(&zip_codes).await? {
                println!(
                    "{}: {}, {} ({} county) [{:.4}, {:.4}]",
                    location.zip_code.bold(),
                    location.city,
                    location.state,
                    location.county,
                    location.latitude,
                    location.longitude
                );
            }
        }
        Command::Help => print_help(),
        Command::Quit => {}
    }
    Ok(())
}

fn handle_breeds(app: &mut AppContext, query: Option<String>, all: bool, toggle: Vec<String>) {
    let picker = app.picker_mut();
    if let Some(query) = query {
        picker.set_query(query);
    }
    picker.set_show_all(all);
    for breed in &toggle {
        picker.toggle(breed);
    }

    let picker = app.picker();
    if picker.breeds().is_empty() {
        println!("{}", "No breeds loaded (log in first)".yellow());
        return;
    }
    for breed in picker.displayed() {
        let mark = if picker.is_selected(breed) {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!("{} {}", mark, breed);
    }
    if picker.hidden_count() > 0 {
        println!(
            "{}",
            format!("... {} more (use --all)", picker.hidden_count()).dimmed()
        );
    }
}

/// Did this failure already surface as a notice? Superseded responses emit
/// nothing, so they are printed like any other error.
fn is_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ControllerError>().is_some_and(|e| {
        !matches!(
            e,
            ControllerError::UnknownDog { .. }
                | ControllerError::NotAuthenticated
                | ControllerError::Superseded
        )
    })
}

fn print_notices(events: &mut EventReceiver) {
    for event in drain(events) {
        if let StateEvent::Notice(notice) = event {
            print_notice(&notice);
        }
    }
}

fn print_notice(notice: &Notice) {
    let title = match notice.severity {
        Severity::Success => notice.title.green(),
        Severity::Info => notice.title.cyan(),
        Severity::Warning => notice.title.yellow(),
        Severity::Error => notice.title.red(),
    };
    println!("{}: {}", title.bold(), notice.message);
}

fn print_page(view: &PageView, app: &AppContext) {
    match view.phase {
        SearchPhase::Idle => println!("No search yet"),
        SearchPhase::Searching => println!("Searching..."),
        SearchPhase::Error => println!("{}", "Search failed; try `search` again".red()),
        SearchPhase::Ready if view.dogs.is_empty() => {
            println!("{}", "No dogs match these filters".yellow())
        }
        SearchPhase::Ready => {
            println!(
                "{}",
                format!(
                    "Page {} of {} ({} dogs, {} available)",
                    view.page, view.total_pages, view.total_results, view.service_total
                )
                .bold()
                .blue()
            );
            for dog in &view.dogs {
                println!("{}", describe(dog, app.favorites().is_favorite(&dog.id)));
            }
        }
    }
}

fn print_favorites(app: &AppContext) {
    let favorites = app.favorites();
    if favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    println!("{}", format!("Favorites ({}):", favorites.len()).bold().blue());
    for dog in favorites.dogs() {
        println!("{}", describe(dog, true));
    }
}

fn describe(dog: &Dog, favorite: bool) -> String {
    let star = if favorite { "★".yellow() } else { " ".normal() };
    format!("{} {} {}", star, dog.id.dimmed(), dog)
}

fn print_help() {
    println!("{}", "Commands:".bold());
    let rows = [
        ("login <name> <email>", "start a session"),
        ("logout", "end the session"),
        ("breeds [--query q] [--all] [--toggle b]", "browse and pick breeds"),
        (
            "filter [--breed b].. [--zip z].. [--age-min n] [--age-max n] [--sort asc|desc]",
            "filter and search",
        ),
        ("clear-filters", "reset filters"),
        ("search", "search again"),
        ("page [n] | next | prev", "move through results"),
        ("fav <id> | unfav <id>", "edit favorites"),
        ("favs | clear-favs", "list or clear favorites"),
        ("match", "get matched with one favorite"),
        ("locations <zip>..", "look up postal codes"),
        ("quit", "leave"),
    ];
    for (usage, what) in rows {
        println!("  {:<78} {}", usage.cyan(), what);
    }
}

/// Split a line into words; double quotes group words ("Jane Doe").
fn split_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}
