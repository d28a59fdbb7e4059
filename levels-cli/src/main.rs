use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use levels::{create_index, Combinator, DocId, Index, SledStore};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize, PartialEq)]
struct InputDoc {
    id: DocId,
    text: String,
}

#[derive(Serialize)]
struct QueryResponse {
    query: String,
    combinator: String,
    took_ms: u128,
    total_hits: usize,
    ids: Vec<DocId>,
}

#[derive(Serialize)]
struct CodesResponse {
    id: DocId,
    codes: Vec<String>,
}

#[derive(Parser)]
#[command(name = "levels")]
#[command(about = "Phonetic full-text index over a sled database", long_about = None)]
struct Cli {
    /// Database directory
    #[arg(long, global = true, env = "LEVELS_DB", default_value = "./levels.db")]
    db: PathBuf,
    /// Key namespace inside the database
    #[arg(long, global = true, env = "LEVELS_NAMESPACE", default_value = "levels")]
    namespace: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index one text under an id
    Index {
        #[arg(long)]
        id: DocId,
        text: String,
    },
    /// Index {"id", "text"} records from a JSON/JSONL file or a directory of them
    Import {
        #[arg(long)]
        input: PathBuf,
    },
    /// Remove every posting of an id
    Remove {
        #[arg(long)]
        id: DocId,
    },
    /// Run a query and print matching ids as JSON
    Query {
        /// and | or (aliases: intersect, intersection, union)
        #[arg(long, default_value = "and")]
        combinator: String,
        text: String,
    },
    /// Print the phonetic codes stored for an id
    Inspect {
        #[arg(long)]
        id: DocId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let store = Arc::new(
        SledStore::open(&cli.db).with_context(|| format!("opening database {}", cli.db.display()))?,
    );
    let index = create_index(Arc::clone(&store), &cli.namespace)?;

    match cli.command {
        Commands::Index { id, text } => {
            index.index(&text, id).await?;
            store.flush()?;
        }
        Commands::Import { input } => {
            let n = import(&index, &input).await?;
            store.flush()?;
            tracing::info!(documents = n, "import complete");
        }
        Commands::Remove { id } => {
            index.remove(id).await?;
            store.flush()?;
        }
        Commands::Query { combinator, text } => {
            let combinator: Combinator = combinator.parse()?;
            let start = std::time::Instant::now();
            let ids = index.query(text.clone()).with_combinator(combinator).execute().await?;
            let resp = QueryResponse {
                query: text,
                combinator: combinator.to_string(),
                took_ms: start.elapsed().as_millis(),
                total_hits: ids.len(),
                ids,
            };
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Commands::Inspect { id } => {
            let codes = index.document_codes(id).await?;
            println!("{}", serde_json::to_string_pretty(&CodesResponse { id, codes })?);
        }
    }
    Ok(())
}

async fn import(index: &Index, input: &Path) -> Result<usize> {
    let mut count = 0;
    for file in input_files(input) {
        let docs = load_docs(&file).with_context(|| format!("reading {}", file.display()))?;
        tracing::debug!(file = %file.display(), docs = docs.len(), "importing");
        for doc in docs {
            index.index(&doc.text, doc.id).await?;
            count += 1;
        }
    }
    Ok(count)
}

fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn load_docs(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            docs.push(serde_json::from_str(&line)?);
        }
        return Ok(docs);
    }
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    if json.is_array() {
        Ok(serde_json::from_value(json)?)
    } else if json.is_object() {
        Ok(vec![serde_json::from_value(json)?])
    } else {
        Ok(Vec::new())
    }
}
