use anyhow::Result;
use browser::{Screen, Shell, init_tracing_with_config};
use clap::{Parser, Subcommand};
use cli::{KEYSTROKE, VERSION, emphasise, patience, redacted_config, type_and_wait};
use console::style;
use core_types::config::{AppConfig, load_or_create_config};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use typeahead::Key;

/// Drive the MovieHub typeahead and catalog from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "moviehub",
    version = VERSION,
    about = "MovieHub typeahead and catalog driver"
)]
struct Cli {
    /// Config file (created with defaults when missing).
    #[arg(long, global = true, env = "MOVIEHUB_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Type TEXT into a search box and show the suggestions it gets.
    Suggest {
        text: String,
        /// Include adult titles.
        #[arg(long)]
        adult: bool,
        /// Use the built-in catalog instead of the remote service.
        #[arg(long)]
        offline: bool,
        /// Press ArrowDown N times, then Enter.
        #[arg(long)]
        pick: Option<usize>,
        /// Which page's search box to use.
        #[arg(long, default_value = "home")]
        screen: Screen,
    },
    /// Load every landing-page row.
    Preload {
        /// Requests in flight (defaults to the configured value).
        #[arg(short, long)]
        concurrency: Option<usize>,
        #[arg(long)]
        offline: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_or_create_config(cli.config.as_deref())?;
    let _guard = init_tracing_with_config(&cfg.logging)?;

    match cli.command {
        Commands::Suggest {
            text,
            adult,
            offline,
            pick,
            screen,
        } => suggest(cfg, &text, adult, offline, pick, screen).await,
        Commands::Preload {
            concurrency,
            offline,
        } => preload(cfg, concurrency, offline).await,
        Commands::Config => {
            print!("{}", redacted_config(&cfg)?);
            Ok(())
        }
    }
}

async fn suggest(
    cfg: AppConfig,
    text: &str,
    adult: bool,
    offline: bool,
    pick: Option<usize>,
    screen: Screen,
) -> Result<()> {
    let wait = patience(&cfg);
    let image_base = cfg.catalog.image_base_url.clone();
    let shell = Shell::new(cfg, offline);
    let mut area = shell.mount(screen);
    let ctl = area.controller_mut();
    ctl.on_include_adult_changed(adult);

    info!(%screen, text, adult, offline, "suggest started");
    let applied = type_and_wait(ctl, text, KEYSTROKE, wait).await;
    info!(
        events = applied.len(),
        suggestions = ctl.suggestions().len(),
        "suggest settled"
    );

    println!(
        "{} {}",
        style(format!("[{screen}]")).cyan(),
        style(ctl.query()).bold()
    );
    if ctl.suggestions().is_empty() {
        println!("  {}", style("no suggestions").dim());
    }
    for (i, (suggestion, spans)) in ctl.suggestions().iter().zip(ctl.highlighted()).enumerate() {
        let rating = suggestion
            .rating
            .map(|r| format!(" {}", style(format!("★ {r:.1}")).green()))
            .unwrap_or_default();
        let poster = suggestion
            .poster_url(&image_base)
            .map(|url| format!(" {}", style(url).dim()))
            .unwrap_or_default();
        println!("  {:>2}. {}{rating}{poster}", i + 1, emphasise(&spans));
    }

    if let Some(presses) = pick {
        for _ in 0..presses {
            ctl.on_key_event(Key::ArrowDown);
        }
        ctl.on_key_event(Key::Enter);
        if shell.history().is_empty() {
            println!("{}", style("nothing to navigate to").yellow());
        } else {
            let route = shell.history().current();
            info!(path = %route, "suggest committed");
            println!("{} {}", style("→").cyan(), route);
        }
    }
    Ok(())
}

async fn preload(cfg: AppConfig, concurrency: Option<usize>, offline: bool) -> Result<()> {
    let mut cfg = cfg;
    if let Some(n) = concurrency {
        cfg.preload.concurrency = n;
    }
    let shell = Shell::new(cfg, offline);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!(
        "preloading categories ({} at a time)",
        shell.config().preload.concurrency.max(1)
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));
    info!(
        concurrency = shell.config().preload.concurrency,
        offline, "preload started"
    );
    let landing = shell.preload_landing().await;
    spinner.finish_and_clear();
    info!(
        rows = landing.rows.len(),
        genres = landing.genres.len(),
        "preload finished"
    );

    for (key, row) in &landing.rows {
        let label = match key {
            core_types::CategoryKey::Genre(id) => landing
                .genres
                .iter()
                .find(|g| g.id == *id)
                .map_or_else(|| key.to_string(), |g| g.name.clone()),
            _ => key.to_string(),
        };
        let count = if row.is_empty() {
            style(format!("{:>3} items", row.len())).red()
        } else {
            style(format!("{:>3} items", row.len())).green()
        };
        let sample: Vec<&str> = row.iter().take(3).map(|m| m.title.as_str()).collect();
        println!("{label:<18} {count}  {}", style(sample.join(", ")).dim());
    }
    Ok(())
}
