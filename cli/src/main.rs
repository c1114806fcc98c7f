use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use engine::{Config, SearchEngine};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search-engine")]
#[command(about = "Boolean and TF-IDF search over a local text corpus", long_about = None)]
struct Cli {
    /// Configuration root directory (corpus under dataset_txt/, lemma
    /// dictionary under resources/lemmas.txt, index files alongside)
    #[arg(default_value = ".")]
    root: String,

    /// Minimum TF-IDF score for ranked results
    #[arg(long, default_value_t = 0.05)]
    min_score: f64,

    /// Number of ranked results to display
    #[arg(long, default_value_t = 10)]
    top_k: usize,

    /// Number of terms in the Zipf report
    #[arg(long, default_value_t = 15)]
    zipf_terms: usize,

    /// Replace tokens with their lemma dictionary image at index and
    /// query time
    #[arg(long, default_value_t = false)]
    apply_lemmas: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut config = Config::from_root(&cli.root);
    config.min_tfidf_score = cli.min_score;
    config.top_k_results = cli.top_k;
    config.zipf_top_terms = cli.zipf_terms;
    config.apply_lemmas = cli.apply_lemmas;

    let mut engine = SearchEngine::new(config);
    engine.initialize()?;

    run(&mut engine)
}

fn run(engine: &mut SearchEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        display_menu()?;
        let Some(line) = lines.next() else { break };

        match line?.trim() {
            "1" => {
                if let Err(err) = engine.index_documents() {
                    eprintln!("Error during indexing: {err:#}");
                    continue;
                }
                if let Err(err) = engine.save_index() {
                    eprintln!("Error saving index: {err:#}");
                }
                display_zipf_analysis(engine);
            }
            "2" => {
                if ensure_index(engine) {
                    boolean_repl(engine, &mut lines)?;
                }
            }
            "3" => {
                if ensure_index(engine) {
                    tfidf_repl(engine, &mut lines)?;
                }
            }
            "4" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }

    Ok(())
}

/// Load the saved index on first use of a search mode.
fn ensure_index(engine: &mut SearchEngine) -> bool {
    if engine.has_index() {
        return true;
    }
    if let Err(err) = engine.load_index() {
        tracing::debug!(%err, "index load failed");
        println!("No index found. Please rebuild (option 1).");
        return false;
    }
    true
}

fn display_menu() -> Result<()> {
    println!();
    println!("=== SEARCH ENGINE ===");
    println!("1. Rebuild index");
    println!("2. Boolean search");
    println!("3. TF-IDF search");
    println!("4. Exit");
    print!("Choice: ");
    io::stdout().flush()?;
    Ok(())
}

fn boolean_repl<I>(engine: &SearchEngine, lines: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!();
    println!("=== BOOLEAN SEARCH ===");
    println!("Syntax: +required -excluded optional");
    println!("Type 'exit' to return to main menu");
    println!();

    loop {
        print!("Bool Query: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        if line == "exit" {
            break;
        }
        if line.trim().is_empty() {
            println!("Results: No documents match.");
            println!();
            continue;
        }

        let results = engine.boolean_search(&line);
        if results.is_empty() {
            println!("Results: No documents match.");
        } else {
            println!("Results: {} document(s) found", results.len());
            for doc_id in &results {
                println!("  {}", engine.document_url(*doc_id));
            }
        }
        println!();
    }

    Ok(())
}

fn tfidf_repl<I>(engine: &SearchEngine, lines: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!();
    println!("=== TF-IDF SEARCH ===");
    println!("Type 'exit' to return to main menu");
    println!();

    loop {
        print!("TF-IDF Query: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        if line == "exit" {
            break;
        }
        if line.trim().is_empty() {
            println!("No query terms.");
            println!();
            continue;
        }

        let results = engine.tfidf_search(&line);
        if results.is_empty() {
            println!("No matching documents found.");
            println!();
            continue;
        }

        let limit = results.len().min(engine.config().top_k_results);
        println!("Top {limit} results:");
        for (i, doc) in results.iter().take(limit).enumerate() {
            println!(
                "{}. {} | Score: {:.6}",
                i + 1,
                engine.document_url(doc.doc_id),
                doc.score
            );
        }
        println!();
    }

    Ok(())
}

fn display_zipf_analysis(engine: &SearchEngine) {
    println!();
    println!("=== ZIPF'S LAW ANALYSIS ===");

    let stats = engine.term_statistics();
    println!("{:<20}{:<15}{:<10}F × R", "Term", "Frequency", "Rank");
    println!("{}", "-".repeat(55));

    for (i, stat) in stats.iter().take(engine.config().zipf_top_terms).enumerate() {
        let rank = (i + 1) as u64;
        println!(
            "{:<20}{:<15}{:<10}{}",
            stat.term,
            stat.total_frequency,
            rank,
            stat.total_frequency * rank
        );
    }

    println!();
    println!("Zipf's law suggests F × R should be approximately constant.");
}
