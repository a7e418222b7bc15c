use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use engine::{
    Config, EngineError, MetadataLookup, MovieRecommendation, RecommendationOrchestrator,
    SelectedMovie,
};
use metadata_client::MovieMetadata;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

/// Characters of plot shown per recommendation
const PLOT_PREVIEW_CHARS: usize = 200;

/// movie-recs - Similar movie recommender
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommend movies similar to a selected title", long_about = None)]
struct Cli {
    /// Directory with movie_list.json / similarity.json (or their .zip archives).
    /// Overrides DATA_DIR.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a title, with details from OMDb
    Recommend {
        /// Exact movie title (case-sensitive)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return (overrides RECOMMENDATION_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List selectable titles
    Titles {
        /// Only show titles containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Maximum number of titles to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Show OMDb details for a single title
    Details {
        #[arg(long)]
        title: String,
    },

    /// Pick titles one at a time from a prompt
    Interactive,

    /// Time similarity lookups for random titles (no network)
    Benchmark {
        /// Number of lookups to make
        #[arg(long, default_value = "1000")]
        requests: usize,
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
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to read configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Commands::Recommend {
        limit: Some(limit), ..
    } = &cli.command
    {
        config.recommendation_limit = *limit;
    }

    let catalog = Arc::new(load_catalog(&config));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { title, .. } => {
            let orchestrator = RecommendationOrchestrator::from_config(catalog, &config)?;
            handle_recommend(&orchestrator, &title).await?
        }
        Commands::Titles { search, limit } => handle_titles(&catalog, search.as_deref(), limit),
        Commands::Details { title } => {
            let orchestrator = RecommendationOrchestrator::from_config(catalog, &config)?;
            handle_details(&orchestrator, &title).await
        }
        Commands::Interactive => {
            let orchestrator = RecommendationOrchestrator::from_config(catalog, &config)?;
            handle_interactive(&orchestrator).await?
        }
        Commands::Benchmark { requests } => {
            let orchestrator = RecommendationOrchestrator::from_config(catalog, &config)?;
            handle_benchmark(&orchestrator, requests)?
        }
    }

    Ok(())
}

/// Load the catalog, or stop the process with a fatal message
///
/// Nothing useful can be shown without the data, so this never returns an error.
fn load_catalog(config: &Config) -> Catalog {
    let paths = config.data_paths();
    println!("Loading recommendation data from {}...", paths.data_dir().display());

    let start = Instant::now();
    match Catalog::bootstrap(&paths) {
        Ok(catalog) => {
            println!(
                "{} Loaded {} movies in {:?}",
                "✓".green(),
                catalog.len(),
                start.elapsed()
            );
            catalog
        }
        Err(e) => {
            let fatal = EngineError::from(e);
            error!("Failed to load recommendation data: {}", fatal);
            eprintln!("{} {}", "Fatal:".red().bold(), fatal);
            eprintln!(
                "Expected {} and {} (or {} / {}) in {}",
                config.movies_file,
                config.similarity_file,
                config.movies_archive,
                config.similarity_archive,
                paths.data_dir().display()
            );
            std::process::exit(1);
        }
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(orchestrator: &RecommendationOrchestrator, title: &str) -> Result<()> {
    match orchestrator.recommend(title).await {
        Ok(report) => {
            print_selected(&report.selected);
            print_recommendations(&report.recommendations);
            Ok(())
        }
        Err(EngineError::Recommend(e)) => {
            print_suggestions(orchestrator.catalog(), title);
            Err(anyhow!(e))
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle the 'titles' command
fn handle_titles(catalog: &Catalog, search: Option<&str>, limit: usize) {
    let movies: Vec<_> = match search {
        Some(query) => catalog.search(query),
        None => catalog.movies().iter().collect(),
    };

    let header = match search {
        Some(query) => format!("Titles matching '{}' ({} found):", query, movies.len()),
        None => format!("Titles ({} total):", movies.len()),
    };
    println!("{}", header.bold().blue());

    for movie in movies.iter().take(limit) {
        println!("{:>6}  {}", movie.row, movie.title);
    }
    if movies.len() > limit {
        println!("  ... and {} more", movies.len() - limit);
    }
}

/// Handle the 'details' command
async fn handle_details(orchestrator: &RecommendationOrchestrator, title: &str) {
    println!("{}", format!("🎥 {}", title).bold().blue());
    match orchestrator.details(title).await {
        MetadataLookup::Found(metadata) => print_full_details(&metadata),
        lookup => print_lookup_warning(&lookup, "Couldn't fetch details for this movie"),
    }
}

/// Handle the 'interactive' command
async fn handle_interactive(orchestrator: &RecommendationOrchestrator) -> Result<()> {
    println!(
        "{}",
        "🎬 Movie Recommender System".bold().blue()
    );
    println!("Type a movie title and press Enter. ':search <text>' lists titles, ':q' quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!();
        println!("{}", "Select or type a movie title:".bold());

        let line = match lines.next_line().await.context("Failed to read from stdin")? {
            Some(line) => line,
            None => break,
        };

        let title = match parse_prompt(orchestrator.catalog(), &line) {
            PromptInput::Empty => continue,
            PromptInput::Quit => break,
            PromptInput::Search(query) => {
                handle_titles(orchestrator.catalog(), Some(query), 20);
                continue;
            }
            PromptInput::Title(title) => title,
        };

        match orchestrator.recommend(title).await {
            Ok(report) => {
                print_selected(&report.selected);
                print_recommendations(&report.recommendations);
            }
            Err(e) => {
                warn!("Interactive lookup failed for '{}': {}", title, e);
                println!("{} {}", "⚠".yellow(), e);
                print_suggestions(orchestrator.catalog(), title);
            }
        }
    }

    Ok(())
}

/// One line typed at the interactive prompt
#[derive(Debug, PartialEq, Eq)]
enum PromptInput<'a> {
    Empty,
    Quit,
    Search(&'a str),
    Title(&'a str),
}

/// Classify a prompt line
///
/// Titles are matched exactly, so the raw line is tried before the trimmed one.
fn parse_prompt<'a>(catalog: &Catalog, line: &'a str) -> PromptInput<'a> {
    if catalog.row_of(line).is_some() {
        return PromptInput::Title(line);
    }

    let input = line.trim();
    let (command, rest) = input
        .split_once(char::is_whitespace)
        .unwrap_or((input, ""));
    match command {
        "" => PromptInput::Empty,
        ":q" | ":quit" if rest.is_empty() => PromptInput::Quit,
        ":search" => PromptInput::Search(rest.trim()),
        _ => PromptInput::Title(input),
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(orchestrator: &RecommendationOrchestrator, requests: usize) -> Result<()> {
    let catalog = orchestrator.catalog();
    if requests == 0 || catalog.is_empty() {
        println!("Nothing to benchmark");
        return Ok(());
    }

    // Pick random titles from the table
    let titles: Vec<&str> = (0..requests)
        .map(|_| {
            let row = rand::random_range(0..catalog.len());
            catalog.movie(row).map(|m| m.title.as_str()).unwrap_or_default()
        })
        .collect();

    let recommender = orchestrator.recommender();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for title in titles {
        let start = Instant::now();
        recommender.recommend(title)?;
        timings.push(start.elapsed());
    }

    // Calculate and display statistics
    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} lookups/second", throughput);

    Ok(())
}

/// Print the selected movie with all of its details
fn print_selected(selected: &SelectedMovie) {
    println!();
    println!("{}", format!("🎥 You selected: {}", selected.title).bold().blue());
    match &selected.metadata {
        MetadataLookup::Found(metadata) => print_full_details(metadata),
        lookup => print_lookup_warning(lookup, "Couldn't fetch details for selected movie"),
    }
}

fn print_full_details(metadata: &MovieMetadata) {
    match metadata.poster_url() {
        Some(url) => println!("{}Poster: {}", "• ".green(), url),
        None => println!("{} Poster not available", "⚠".yellow()),
    }
    println!("{}📅 Year: {}", "• ".green(), metadata.year);
    println!("{}⏱️ Runtime: {}", "• ".green(), metadata.runtime);
    println!("{}🎭 Genre: {}", "• ".green(), metadata.genre);
    println!("{}🎬 Director: {}", "• ".green(), metadata.director);
    println!("{}Actors: {}", "• ".green(), metadata.actors);
    println!("{}⭐ IMDb Rating: {}", "• ".green(), metadata.imdb_rating);
    println!("{}📖 Plot: {}", "• ".green(), metadata.plot);
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation]) {
    println!();
    println!(
        "{}",
        format!("🍿 Top {} Recommendations", recommendations.len()).bold().blue()
    );

    for rec in recommendations {
        println!(
            "{}. {} - Similarity: {:.3}",
            rec.rank.to_string().green(),
            rec.title.bold(),
            rec.score
        );
        match &rec.metadata {
            MetadataLookup::Found(metadata) => {
                match metadata.poster_url() {
                    Some(url) => println!("   Poster: {}", url),
                    None => println!("   No poster available"),
                }
                println!("   Year: {}", metadata.year);
                println!("   Rating: ⭐ {}", metadata.imdb_rating);
                println!("   Genre: {}", metadata.genre);
                println!("   Plot: {}", metadata.short_plot(PLOT_PREVIEW_CHARS));
            }
            lookup => print_lookup_warning(lookup, "Details not available"),
        }
        println!("---");
    }
}

fn print_lookup_warning(lookup: &MetadataLookup, message: &str) {
    if let MetadataLookup::Failed { reason } = lookup {
        println!("{} Error fetching data: {}", "✗".red(), reason);
    }
    println!("{} {}", "⚠".yellow(), message);
}

/// Suggest close titles after a lookup miss
fn print_suggestions(catalog: &Catalog, title: &str) {
    let matches = catalog.search(title);
    if matches.is_empty() {
        return;
    }
    println!("Did you mean:");
    for movie in matches.iter().take(5) {
        println!("  - {}", movie.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, SimilarityMatrix};

    fn catalog(titles: &[&str]) -> Catalog {
        let movies = titles
            .iter()
            .enumerate()
            .map(|(row, title)| Movie {
                row,
                movie_id: None,
                title: title.to_string(),
            })
            .collect();
        let rows = (0..titles.len())
            .map(|i| (0..titles.len()).map(|j| if i == j { 1.0 } else { 0.5 }).collect())
            .collect();
        Catalog::from_parts(movies, SimilarityMatrix::from_rows(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_prompt_commands() {
        let catalog = catalog(&["Heat", "Alien"]);

        assert_eq!(parse_prompt(&catalog, "   "), PromptInput::Empty);
        assert_eq!(parse_prompt(&catalog, ":q"), PromptInput::Quit);
        assert_eq!(parse_prompt(&catalog, " :quit "), PromptInput::Quit);
        assert_eq!(parse_prompt(&catalog, ":search  ali "), PromptInput::Search("ali"));
        assert_eq!(parse_prompt(&catalog, ":search"), PromptInput::Search(""));
        assert_eq!(parse_prompt(&catalog, " Heat "), PromptInput::Title("Heat"));
    }

    #[test]
    fn test_search_needs_a_separator() {
        let catalog = catalog(&["Heat"]);

        assert_eq!(
            parse_prompt(&catalog, ":searchfoo"),
            PromptInput::Title(":searchfoo")
        );
    }

    #[test]
    fn test_title_with_surrounding_whitespace_is_selectable() {
        let catalog = catalog(&[" Heat ", "Alien"]);

        assert_eq!(parse_prompt(&catalog, " Heat "), PromptInput::Title(" Heat "));
        assert_eq!(catalog.row_of(" Heat "), Some(0));
    }

    #[test]
    fn test_title_that_looks_like_a_command() {
        let catalog = catalog(&[":q", "Alien"]);

        assert_eq!(parse_prompt(&catalog, ":q"), PromptInput::Title(":q"));
    }
}
