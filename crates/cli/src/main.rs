use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{
    EngineConfig, QueryError, RecommendationEngine, RecommendationList, StartupErrorKind,
    SurprisePick, DEFAULT_ALPHA, DEFAULT_TOP_N,
};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Cinematch - Content-Based Movie Recommender
#[derive(Parser)]
#[command(name = "cinematch")]
#[command(about = "Movie recommendations from plot text, genres and clustering", long_about = None)]
struct Cli {
    /// Path or URL of the movie metadata CSV (overrides CINEMATCH_DATA_SOURCE)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Seed for surprise picks (overrides CINEMATCH_SURPRISE_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Movies similar to a title (typos are tolerated)
    Similar {
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,

        /// Weight of text similarity against cluster membership, in [0, 1]
        #[arg(long, default_value_t = DEFAULT_ALPHA)]
        alpha: f32,

        /// Show the score breakdown for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Best rated movies of a genre
    Genre {
        #[arg(long)]
        name: String,

        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,
    },

    /// Best rated movies whose overview mentions a word
    Keyword {
        #[arg(long)]
        word: String,

        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,
    },

    /// One random movie, optionally of a genre
    Surprise {
        #[arg(long)]
        genre: Option<String>,
    },

    /// Run benchmark to test query performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env().context("Failed to read configuration")?;
    if let Some(source) = cli.source {
        config.data_source = source;
    }
    if let Some(seed) = cli.seed {
        config.surprise_seed = Some(seed);
    }

    // Build the engine (fetch + feature build may take a moment)
    let engine = RecommendationEngine::new(config);
    if !cli.json {
        println!(
            "Loading movie catalog from {}...",
            engine.config().data_source
        );
    }
    let start = Instant::now();
    let context = match engine.load_default().await {
        Ok(context) => context,
        Err(e) => {
            let message = format!(
                "Failed to load movie catalog from {} ({})",
                engine.config().data_source,
                load_hint(e.kind())
            );
            return Err(anyhow::Error::new(e).context(message));
        }
    };
    if !cli.json {
        println!(
            "{} Loaded {} movies in {:?}",
            "✓".green(),
            context.catalog().len(),
            start.elapsed()
        );
    }

    // Dispatch to appropriate command handler
    let json = cli.json;
    match cli.command {
        Commands::Similar {
            title,
            limit,
            explain,
            alpha,
        } => {
            let header = format!("Movies similar to '{}':", title);
            print_list(
                engine.hybrid_recommend(&title, limit, alpha),
                &header,
                explain,
                json,
            )?
        }
        Commands::Genre { name, limit } => {
            let header = format!("Top {} movies:", name);
            print_list(
                engine.recommend_by_genre(&name, limit),
                &header,
                false,
                json,
            )?
        }
        Commands::Keyword { word, limit } => {
            let header = format!("Movies mentioning '{}':", word);
            print_list(
                engine.recommend_by_keyword(&word, limit),
                &header,
                false,
                json,
            )?
        }
        Commands::Surprise { genre } => {
            print_surprise(engine.surprise_me(genre.as_deref()), json)?
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Split a query outcome into a value, a printed not-found message, or a
/// hard error.
fn outcome<T>(result: Result<T, QueryError>, json: bool) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            if json {
                print_json(&serde_json::json!({ "error": e.to_string() }))?;
            } else {
                println!("{}", e.to_string().yellow());
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Helper function to format and print recommendations
fn print_list(
    result: Result<RecommendationList, QueryError>,
    header: &str,
    explain: bool,
    json: bool,
) -> Result<()> {
    let Some(list) = outcome(result, json)? else {
        return Ok(());
    };
    if json {
        return print_json(&list);
    }

    println!("{}", header.bold().blue());
    if list.is_empty() {
        println!("(no other movies in the catalog)");
    }
    for (rank, rec) in list.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), rec);
        if explain {
            if let Some(explanation) = rec.explanation() {
                println!("   {}", explanation.dimmed());
            }
        }
    }
    Ok(())
}

fn print_surprise(result: Result<SurprisePick, QueryError>, json: bool) -> Result<()> {
    let Some(pick) = outcome(result, json)? else {
        return Ok(());
    };
    if json {
        return print_json(&pick);
    }
    println!("{}", pick.to_string().bold());
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: RecommendationEngine,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let context = engine.context()?;
    let movies = context.catalog().movies();
    if movies.is_empty() {
        bail!("The catalog is empty");
    }

    // Random catalog titles as queries
    let titles: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| movies[rng.random_range(0..movies.len())].title.clone())
            .collect()
    };

    // Queries are CPU-bound: run them on the blocking pool, bounded by the semaphore
    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for title in titles {
        let permit = semaphore.clone().acquire_owned().await?;
        let engine = engine.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            let ok = engine.hybrid_recommend(&title, DEFAULT_TOP_N, DEFAULT_ALPHA).is_ok();
            (start.elapsed(), ok)
        }));
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = Vec::with_capacity(requests);
    let mut failures = 0;
    for handle in handles {
        let (elapsed, ok) = handle.await?;
        if !ok {
            failures += 1;
        }
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    let busy: Duration = timings.iter().sum();
    let avg_latency = busy / timings.len() as u32;
    timings.sort();
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!(
        "Requests: {} ({} concurrent, {} failed)",
        requests,
        concurrent.max(1),
        failures
    );
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of an ascending, non-empty slice
/// What the user can do about a failed startup
fn load_hint(kind: StartupErrorKind) -> &'static str {
    match kind {
        StartupErrorKind::DataSource => "check --source or CINEMATCH_DATA_SOURCE",
        StartupErrorKind::Schema => {
            "the table needs title, genres, overview, popularity and vote_average columns"
        }
        StartupErrorKind::EmptyCorpus => "no complete movie rows were found",
        StartupErrorKind::Config => "check the CINEMATCH_* environment variables",
        StartupErrorKind::Internal => "internal error",
    }
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = (sorted.len() as f64 * p).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}
