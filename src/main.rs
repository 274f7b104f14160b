use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;
use subdex::{Engine, EngineConfig, Query};

#[derive(Parser)]
#[command(name = "subdex")]
#[command(about = "Common-substring dictionary search engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a database from a tab-separated dictionary file
    Build {
        /// Dictionary file: one `key TAB value` record per line
        dict: PathBuf,

        /// Output database path
        #[arg(short, long)]
        out: PathBuf,

        /// Minimum indexed suffix length as a fraction of the key length
        #[arg(long)]
        suffix_ratio: Option<f64>,

        /// Global floor on indexed suffix length
        #[arg(long)]
        min_suffix: Option<u32>,

        /// JSON file with build settings (flags override its fields)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Search a database for entries sharing a substring with a word
    Search {
        /// Database file produced by `subdex build`
        db: PathBuf,

        /// Query word; omit it to read queries from stdin
        word: Option<String>,

        /// Minimum common substring length
        #[arg(short = 'm', long, default_value = "4")]
        min_common_len: u32,

        /// Drop dictionary words shorter than this
        #[arg(long, default_value = "0")]
        min_dword_len: u32,

        /// Drop dictionary words longer than this
        #[arg(long, default_value = "64")]
        max_dword_len: u32,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value = "100")]
        limit: u32,

        /// Enumerate trie subtrees depth-first
        #[arg(long)]
        dfs: bool,

        /// Match only substrings starting at the first query byte
        #[arg(long)]
        prefix_only: bool,

        /// Give every starting offset its own result budget
        #[arg(long)]
        average_limit: bool,
    },
    /// Show statistics of a database
    Stats {
        /// Database file
        db: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            dict,
            out,
            suffix_ratio,
            min_suffix,
            config,
        } => build(dict, out, suffix_ratio, min_suffix, config),
        Commands::Search {
            db,
            word,
            min_common_len,
            min_dword_len,
            max_dword_len,
            limit,
            dfs,
            prefix_only,
            average_limit,
        } => {
            let template = Query {
                word: Vec::new(),
                min_common_len,
                min_dword_len,
                max_dword_len,
                limit,
                depth_first_search: dfs,
                com_prefix_only: prefix_only,
                average_limit,
            };
            search(db, word, template)
        }
        Commands::Stats { db } => stats(db),
    }
}

fn load_config(
    path: Option<PathBuf>,
    suffix_ratio: Option<f64>,
    min_suffix: Option<u32>,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("cannot open config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("cannot parse config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(ratio) = suffix_ratio {
        config.suffix_ratio = ratio;
    }
    if let Some(min) = min_suffix {
        config.min_suffix = min;
    }
    Ok(config)
}

fn build(
    dict: PathBuf,
    out: PathBuf,
    suffix_ratio: Option<f64>,
    min_suffix: Option<u32>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config, suffix_ratio, min_suffix)?;
    let mut engine = Engine::with_config(config)?;

    let started = Instant::now();
    engine
        .build(&dict, Some(&out))
        .with_context(|| format!("building from {}", dict.display()))?;
    println!(
        "Built {} words in {:.2?}",
        engine.dwords_num(),
        started.elapsed()
    );
    println!("Database stored at: {}", out.display());
    Ok(())
}

fn open(db: &PathBuf) -> Result<Engine> {
    let mut engine = Engine::new();
    let started = Instant::now();
    let used = engine
        .read(db)
        .with_context(|| format!("loading {}", db.display()))?;
    eprintln!("Loaded {} bytes in {:.2?}", used, started.elapsed());
    Ok(engine)
}

fn search(db: PathBuf, word: Option<String>, template: Query) -> Result<()> {
    let engine = open(&db)?;

    match word {
        Some(word) => {
            let query = Query {
                word: word.into_bytes(),
                ..template
            };
            run_query(&engine, &query);
        }
        None => {
            // Interactive mode: one query per line,
            // `word [min_common] [min_dword] [max_dword] [limit]`.
            eprintln!("Reading queries from stdin...");
            for line in io::stdin().lock().lines() {
                let line = line?;
                let mut fields = line.split_whitespace();
                let Some(word) = fields.next() else { continue };
                let mut query = Query {
                    word: word.as_bytes().to_vec(),
                    ..template.clone()
                };
                if let Some(v) = fields.next().and_then(|s| s.parse().ok()) {
                    query.min_common_len = v;
                }
                if let Some(v) = fields.next().and_then(|s| s.parse().ok()) {
                    query.min_dword_len = v;
                }
                if let Some(v) = fields.next().and_then(|s| s.parse().ok()) {
                    query.max_dword_len = v;
                }
                if let Some(v) = fields.next().and_then(|s| s.parse().ok()) {
                    query.limit = v;
                }
                run_query(&engine, &query);
            }
        }
    }
    Ok(())
}

fn run_query(engine: &Engine, query: &Query) {
    let started = Instant::now();
    let hits = engine.search(query);
    eprintln!(
        "Search '{}' completed in {:.2?} with {} results",
        String::from_utf8_lossy(&query.word),
        started.elapsed(),
        hits.len()
    );
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}\t{}\t{}\t{}",
            i,
            String::from_utf8_lossy(hit.dword),
            bracket_match(hit.dword, hit.start_pos as usize, hit.common_len as usize),
            String::from_utf8_lossy(hit.value)
        );
    }
}

/// Render a hit with the matched span bracketed, e.g. `yout[hful]`.
fn bracket_match(dword: &[u8], start: usize, len: usize) -> String {
    let head = String::from_utf8_lossy(&dword[..start]);
    let matched = String::from_utf8_lossy(&dword[start..start + len]);
    let rest = String::from_utf8_lossy(&dword[start + len..]);
    format!("{head}[{matched}]{rest}")
}

fn stats(db: PathBuf) -> Result<()> {
    let engine = open(&db)?;
    let Some(index) = engine.index() else {
        anyhow::bail!("no index loaded");
    };

    println!("Database Statistics");
    println!("===================");
    println!("Database:         {}", db.display());
    println!("Dictionary words: {}", index.dwords_num());
    println!("Distinct suffixes: {}", index.suffix_count());
    println!("Word pool bytes:  {}", index.pool().len());
    println!("Trie nodes:       {}", index.trie().node_count());
    println!("Trie tail bytes:  {}", index.trie().tail_len());
    Ok(())
}
