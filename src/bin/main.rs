use clap::Parser;
use std::path::PathBuf;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "feedpilot")]
#[command(about = "Scroll a feed, pick the most engaging post, reshare and reply")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Collect and log posts, but do not reshare or reply
    #[arg(long)]
    collect_only: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> feedpilot::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let params = feedpilot::Params::from_args(&cli.params)?;
    let mut config = feedpilot::Config::load_with_params(&cli.config, &params)?;

    if cli.check {
        println!("Config valid: {}", config.name);
        match config.login {
            Some(ref login) => println!("  Login: {}", login.url),
            None => println!("  Login: none"),
        }
        println!(
            "  Feed: {} (target {}, max {} scrolls)",
            config.feed.url.as_deref().unwrap_or("current page"),
            config.feed.target,
            config.feed.max_attempts
        );
        println!("  Reply model: {}", config.reply.model);
        println!("  Activity log: {}", config.log.path);
        if !config.params.is_empty() {
            println!("  Parameters: {}", config.params.len());
            for (name, def) in &config.params {
                let req = if def.required { " (required)" } else { "" };
                let desc = def.description.as_deref().unwrap_or("");
                println!("    - {}{}: {}", name, req, desc);
            }
        }
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }

    println!("Running: {}", config.name);

    let mut runner = feedpilot::Runner::new(&config.browser).await?;
    let result = if cli.collect_only {
        runner.run_collect_only(&config).await
    } else {
        runner.run(&config).await
    };
    if let Err(e) = runner.close().await {
        warn!("browser did not close cleanly: {}", e);
    }
    let report = result?;

    println!();
    println!("  Posts collected: {}", report.posts_collected);
    println!("  Posts logged: {}", report.posts_logged);
    if let Some(ref post) = report.selected {
        println!(
            "  Selected: {} ({} likes, {} retweets)",
            post.url.as_deref().unwrap_or("(no permalink)"),
            post.likes(),
            post.retweets()
        );
    }
    if let Some(ref engage) = report.engage {
        println!("  Reshare: {}", engage.reshare);
        println!("  Reply: {}", engage.submit);
        if let Some(ref text) = engage.reply {
            println!("  Reply text: {}", text);
        }
    }
    for w in &report.warnings {
        println!("  Warning: {}", w);
    }
    println!("  Duration: {}ms", report.duration_ms);

    Ok(())
}
