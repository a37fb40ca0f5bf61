use clap::Parser;
use scrim_arena::{Arena, ArenaConfig, GradleEngine, RunMode, default_jobs, render, write_summary};
use std::path::PathBuf;
use std::process;

/// Pit the current bot against baseline opponents across a set of maps and
/// summarize the results as a markdown table.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Arena configuration file (JSON); defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run matches one at a time instead of fanning out
    #[arg(long)]
    serial: bool,

    /// Concurrent match limit (defaults to the cpu count)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Summary file path (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Plain-text outcomes instead of emoji
    #[arg(long)]
    no_emoji: bool,

    /// Opponent to gauntlet against; repeatable (overrides the config)
    #[arg(long = "opponent", value_name = "BOT")]
    opponents: Vec<String>,

    /// Map pool to draw from; repeatable (overrides the config)
    #[arg(long = "pool", value_name = "POOL")]
    pools: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };

    if !args.opponents.is_empty() {
        config.opponents = args.opponents;
    }
    if !args.pools.is_empty() {
        config.pools = args.pools;
    }
    if args.no_emoji {
        config.emoji = false;
    }
    if let Some(output) = args.output {
        config.output = output;
    }

    let maps = config.maps()?;
    let engine = GradleEngine::new(&config.gradle_dir);
    let arena = Arena::new(engine, &config.current_bot, true);

    let mode = if args.serial {
        RunMode::Serial
    } else {
        RunMode::Concurrent {
            jobs: args.jobs.unwrap_or_else(default_jobs),
        }
    };

    let results = arena.run_gauntlet(&config.opponents, &maps, mode).await;

    let summary = render(&results, &config.opponents, &maps, config.emoji);
    write_summary(&config.output, &summary)?;

    println!(
        "\nWin ratio: {}/{} ({:.2}%)",
        results.wins,
        results.total_games(),
        results.win_ratio()
    );
    println!("Summary written to {}", config.output.display());

    Ok(())
}
