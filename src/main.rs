// frequent-sites - figures out which sites belong on your start page
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::{bail, Context};
use chrono::Utc;
use frequent_sites_lib::{
    config::Settings,
    core::{
        compute_stats, export_sites, format_relative, format_score, format_visit_count,
        import_sites, Recorder, Retriever, Searcher,
    },
    db::PREF_PRESET,
    scoring::{score_breakdown, Preset, ScoringConfig},
    Database, SiteError,
};
use std::env;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        // Library errors have a friendlier message than their Display
        match e.downcast_ref::<SiteError>() {
            Some(site_err) => eprintln!("Error: {}", site_err.user_message()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let preset_flag = take_flag(&mut args, "--preset")?;

    let Some(command) = args.first().cloned() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "version" | "-v" | "--version" => {
            println!("frequent-sites v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(());
        }
        "presets" => {
            handle_presets();
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::load();
    let db = Arc::new(
        Database::new(&settings.db_path)
            .await
            .with_context(|| format!("opening {}", settings.db_path.display()))?,
    );

    let app = App {
        preset: resolve_preset(preset_flag.as_deref(), &settings, &db).await?,
        settings,
        db,
    };
    debug!("Using preset {}", app.preset);

    let result = match command.as_str() {
        "visit" => handle_visit(&app, rest).await,
        "top" => handle_top(&app, rest).await,
        "explain" => handle_explain(&app, rest).await,
        "pin" => handle_flag(&app, rest, Flag::Pin(true)).await,
        "unpin" => handle_flag(&app, rest, Flag::Pin(false)).await,
        "block" => handle_flag(&app, rest, Flag::Block(true)).await,
        "unblock" => handle_flag(&app, rest, Flag::Block(false)).await,
        "delete" => handle_flag(&app, rest, Flag::Delete).await,
        "search" => handle_search(&app, rest).await,
        "stats" => handle_stats(&app).await,
        "use-preset" => handle_use_preset(&app, rest).await,
        "import" => handle_import(&app, rest).await,
        "export" => handle_export(&app, rest).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    app.db.close().await;
    result
}

struct App {
    settings: Settings,
    db: Arc<Database>,
    preset: Preset,
}

impl App {
    fn config(&self) -> ScoringConfig {
        self.settings.scoring_config(self.preset)
    }
}

enum Flag {
    Pin(bool),
    Block(bool),
    Delete,
}

// Pull `--name value` out of the argument list
fn take_flag(args: &mut Vec<String>, name: &str) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        bail!("{} needs a value", name);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

// --preset flag, then FREQUENT_SITES_PRESET, then the saved preference
async fn resolve_preset(flag: Option<&str>, settings: &Settings, db: &Database) -> anyhow::Result<Preset> {
    if let Some(name) = flag {
        return Ok(name.parse::<Preset>()?);
    }
    if let Some(preset) = settings.preset {
        return Ok(preset);
    }

    let saved = db.get_preference(PREF_PRESET).await?;
    Ok(saved
        .and_then(|name| name.parse::<Preset>().ok())
        .unwrap_or_default())
}

async fn handle_visit(app: &App, args: &[String]) -> anyhow::Result<()> {
    let Some(url) = args.first() else {
        bail!("No URL provided");
    };
    let title = (args.len() > 1).then(|| args[1..].join(" "));

    let recorder = Recorder::new(Arc::clone(&app.db));
    let site = recorder.record(url, title.as_deref(), Utc::now()).await?;
    println!("{} ({})", site.title, format_visit_count(site.visit_count));

    Ok(())
}

async fn handle_top(app: &App, args: &[String]) -> anyhow::Result<()> {
    let limit = match args.first() {
        Some(raw) => parse_limit(raw)?,
        None => app.settings.limit,
    };

    let now = Utc::now();
    let retriever = Retriever::new(Arc::clone(&app.db));
    let top = retriever.top(&app.config(), limit, now).await?;

    if top.is_empty() {
        if app.db.all_sites().await?.is_empty() {
            println!("No sites tracked yet. Record one with: frequent-sites visit <url>");
        } else {
            println!("No visible sites. Unblock one with: frequent-sites unblock <site>");
        }
        return Ok(());
    }

    println!("\nFrequently visited ({} preset):", app.preset);
    println!("{}", "=".repeat(60));
    for (i, ranked) in top.iter().enumerate() {
        let site = &ranked.site;
        println!(
            "{:3}. {}{} - {}",
            i + 1,
            if site.pinned { "* " } else { "" },
            site.title,
            site.domain
        );
        println!(
            "     score {}, {}, last {}",
            format_score(ranked.score),
            format_visit_count(site.visit_count),
            format_relative(site.last_visit, now)
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

// `top` limit: a positive whole number
fn parse_limit(raw: &str) -> anyhow::Result<usize> {
    match raw.parse::<usize>() {
        Ok(0) => bail!("Limit must be at least 1"),
        Ok(limit) => Ok(limit),
        Err(_) => bail!("Invalid limit '{}': expected a positive number", raw),
    }
}

async fn handle_explain(app: &App, args: &[String]) -> anyhow::Result<()> {
    let Some(key) = args.first() else {
        bail!("No site provided");
    };

    let site = Retriever::new(Arc::clone(&app.db)).resolve(key).await?;
    let config = app.config();
    let breakdown = score_breakdown(&site, Utc::now(), &config);

    println!("\n{} ({})", site.title, site.url);
    println!("{}", "=".repeat(60));
    println!("  visits      {:>10}", format_score(breakdown.base));
    println!("  last day    {:>10}", format_score(breakdown.last_day));
    println!("  last week   {:>10}", format_score(breakdown.last_week));
    println!("  freshness   {:>10}", format_score(breakdown.decay));
    println!("  pinned      {:>10}", format_score(breakdown.pin));
    println!("  total       {:>10}", format_score(breakdown.total()));
    println!("{}", "=".repeat(60));
    println!(
        "weights: base {} / 1d {} / 7d {} / decay {} / pin {}, half-life {} days",
        config.w_base, config.w_1d, config.w_7d, config.w_decay, config.pin, config.half_life_days
    );
    if site.blocked {
        println!("(blocked: hidden from top sites)");
    }

    Ok(())
}

async fn handle_flag(app: &App, args: &[String], flag: Flag) -> anyhow::Result<()> {
    let Some(key) = args.first() else {
        bail!("No site provided");
    };

    let retriever = Retriever::new(Arc::clone(&app.db));
    let (site, verb) = match flag {
        Flag::Pin(on) => (retriever.set_pinned(key, on).await?, if on { "Pinned" } else { "Unpinned" }),
        Flag::Block(on) => (retriever.set_blocked(key, on).await?, if on { "Blocked" } else { "Unblocked" }),
        Flag::Delete => (retriever.delete(key).await?, "Deleted"),
    };
    println!("{} {}", verb, site.url);

    Ok(())
}

async fn handle_search(app: &App, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        bail!("No search query provided");
    }

    let query = args.join(" ");
    let results = Searcher::new(Arc::clone(&app.db)).search(&query, 20).await?;

    if results.is_empty() {
        println!("No sites found matching '{}'", query);
    } else {
        println!("\nFound {} site(s) matching '{}':", results.len(), query);
        println!("{}", "=".repeat(60));
        for (i, result) in results.iter().enumerate() {
            println!(
                "{:3}. {} - {} ({})",
                i + 1,
                result.site.title,
                result.site.url,
                format_visit_count(result.site.visit_count)
            );
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

async fn handle_stats(app: &App) -> anyhow::Result<()> {
    let sites = app.db.all_sites().await?;
    let stats = compute_stats(&sites, Utc::now(), 5);

    println!("\nfrequent-sites Status");
    println!("{}", "=".repeat(60));
    println!("  Store:       {}", app.db.path().display());
    println!("  Preset:      {}", app.preset);
    println!("\nSites:");
    println!("  Tracked:     {}", stats.total_sites);
    println!("  Visible:     {}", stats.visible_sites);
    println!("  Pinned:      {}", stats.pinned_sites);
    println!("  Blocked:     {}", stats.blocked_sites);
    println!("\nVisits:");
    println!("  Total:       {}", stats.total_visits);
    println!("  Last day:    {}", stats.visits_last_day);
    println!("  Last week:   {}", stats.visits_last_week);

    if !stats.top_domains.is_empty() {
        println!("\nTop domains:");
        for domain in &stats.top_domains {
            println!("  {:<30} {}", domain.domain, domain.visits);
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn handle_presets() {
    println!("\nRanking presets:");
    println!("{}", "=".repeat(60));
    for preset in Preset::ALL {
        let c = preset.config();
        println!("  {:<12} {}", preset.name(), preset.description());
        println!(
            "               base {} / 1d {} / 7d {} / decay {} / pin {}, half-life {}d",
            c.w_base, c.w_1d, c.w_7d, c.w_decay, c.pin, c.half_life_days
        );
    }
    println!("{}", "=".repeat(60));
}

async fn handle_use_preset(app: &App, args: &[String]) -> anyhow::Result<()> {
    let Some(name) = args.first() else {
        bail!("No preset name provided");
    };

    let preset: Preset = name.parse()?;
    app.db.set_preference(PREF_PRESET, preset.name()).await?;
    println!("Default preset is now {}", preset);

    Ok(())
}

async fn handle_import(app: &App, args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        bail!("No import file provided");
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let sites = import_sites(&json)?;
    let count = app.db.import_sites(&sites).await?;

    println!("Imported {} site(s) from {}", count, path);

    Ok(())
}

async fn handle_export(app: &App, args: &[String]) -> anyhow::Result<()> {
    let sites = app.db.all_sites().await?;
    let json = export_sites(&sites, Utc::now())?;

    match args.first() {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("writing {}", path))?;
            eprintln!("Exported {} site(s) to {}", sites.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"frequent-sites v{} - the sites you actually use, ranked

USAGE:
    frequent-sites [--preset <name>] <COMMAND> [OPTIONS]

COMMANDS:
    visit <url> [title]    Record a visit
    top [limit]            Show frequently visited sites (default: 10)
    explain <site>         Show how a site's score is built
    pin <site>             Always keep a site near the top
    unpin <site>           Remove the pin
    block <site>           Hide a site (its record is kept)
    unblock <site>         Show a hidden site again
    delete <site>          Forget a site entirely
    search <query>         Fuzzy search tracked sites
    stats                  Show counts and busiest domains
    presets                List ranking presets
    use-preset <name>      Save the default preset
    import <file>          Import sites from a JSON export
    export [file]          Export sites as JSON (stdout by default)
    version                Show version
    help                   Show this help

A <site> is a URL or a site id.

ENVIRONMENT:
    FREQUENT_SITES_DB      Store location (default ~/.frequent-sites/sites.db)
    FREQUENT_SITES_PRESET  balanced | recency | frequency | pinPriority
    FREQUENT_SITES_LIMIT   Default length of `top`
    FREQUENT_SITES_W_BASE, _W_1D, _W_7D, _W_DECAY, _PIN, _HALF_LIFE_DAYS
                           Override single weights of the preset
    RUST_LOG               Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    frequent-sites visit github.com
    frequent-sites top 5
    frequent-sites --preset recency top
    frequent-sites pin news.ycombinator.com
    frequent-sites export backup.json
"#,
        env!("CARGO_PKG_VERSION")
    );
}
