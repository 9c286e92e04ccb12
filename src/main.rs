use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sqlmask::{anonymize_database, map_dataset, AnonymizeOptions, MapOptions};

#[derive(Parser)]
#[command(name = "sqlmask")]
#[command(author, version, about = "Anonymize SQL schemas and rewrite query datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Parse the query and rewrite identifier nodes in the AST
    Structural,
    /// Regex word-boundary substitution on the raw text
    Textual,
}

impl From<StrategyArg> for sqlmask::mapper::MapStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Structural => Self::Structural,
            StrategyArg::Textual => Self::Textual,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Anonymize a schema file and record its name mapping
    Anonymize {
        /// Path to the schema SQL file
        #[arg(short, long)]
        schema: PathBuf,

        /// Database identifier to record the mapping under
        #[arg(short, long)]
        dbid: String,

        /// Path to the JSON mapping store (created if missing)
        #[arg(long)]
        store: PathBuf,

        /// Write the anonymized schema text to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Map the query columns of a CSV dataset using recorded mappings
    Map {
        /// Path to the input CSV dataset
        #[arg(short, long)]
        dataset: PathBuf,

        /// Path to the JSON mapping store
        #[arg(long)]
        store: PathBuf,

        /// Output CSV path (defaults to <input stem>_mapped.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the database-identifier column
        #[arg(long, default_value = "dbid")]
        dbid_column: String,

        /// Query columns to map
        #[arg(short, long, default_values_t = vec!["q1".to_string(), "q2".to_string()])]
        query_columns: Vec<String>,

        /// Rewrite strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::Structural)]
        strategy: StrategyArg,

        /// Pretty-print re-serialized statements
        #[arg(long)]
        pretty: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Anonymize {
            schema,
            dbid,
            store,
            output,
            verbose,
        } => {
            let options = AnonymizeOptions {
                schema_path: schema,
                database_id: dbid,
                store_path: store,
                schema_output_path: output,
                verbose,
            };

            anonymize_database(options)?;
        }
        Commands::Map {
            dataset,
            store,
            output,
            dbid_column,
            query_columns,
            strategy,
            pretty,
            verbose,
        } => {
            let options = MapOptions {
                dataset_path: dataset,
                store_path: store,
                output_path: output,
                dataset: sqlmask::dataset::DatasetOptions {
                    dbid_column,
                    query_columns,
                    strategy: strategy.into(),
                    pretty,
                    verbose,
                },
            };

            map_dataset(options)?;
        }
    }

    Ok(())
}
