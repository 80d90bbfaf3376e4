use anyhow::Result;
use clap::{Parser, Subcommand};
use movie_core::persist::{build_artifacts, save_artifacts};
use movie_core::{IndexCache, IndexPaths, VectorizerConfig, DEFAULT_TOP_N};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query the movie similarity index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a movie metadata CSV
    Build {
        /// Input dataset path
        #[arg(long, default_value = "movies.csv")]
        input: String,
        /// Output index directory
        #[arg(long, default_value = "./index")]
        output: String,
        /// Vocabulary size limit
        #[arg(long, default_value_t = 5000)]
        max_features: usize,
    },
    /// Print recommendations for a title from an existing index
    Query {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        /// Dataset used if the index must be rebuilt
        #[arg(long, default_value = "movies.csv")]
        dataset: String,
        /// Movie title to look up
        #[arg(long)]
        movie: String,
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, max_features } => build_index(&input, &output, max_features),
        Commands::Query { index, dataset, movie, top_n } => query(&index, &dataset, &movie, top_n),
    }
}

fn build_index(input: &str, output: &str, max_features: usize) -> Result<()> {
    let config = VectorizerConfig { max_features, ..VectorizerConfig::default() };
    let (corpus, matrix, vectorizer) = build_artifacts(input, config)?;
    save_artifacts(&IndexPaths::new(output), &corpus, &matrix, &vectorizer)?;
    tracing::info!(output, num_movies = corpus.len(), "index build complete");
    Ok(())
}

fn query(index: &str, dataset: &str, movie: &str, top_n: usize) -> Result<()> {
    let recommender = IndexCache::new(index, dataset).open_or_build()?;
    let recs = recommender.recommend_scored(movie, top_n)?;
    println!("{}", serde_json::to_string_pretty(&recs)?);
    Ok(())
}
