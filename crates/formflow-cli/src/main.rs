mod report;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use formflow_core::{
    AnswerSnapshot, Catalog, CatalogStore, Direction, MoveOutcome, SiblingScope, move_entity,
    resolve_visibility,
};
use report::{CatalogPresenter, Detail};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Questionnaire catalog toolbox",
    long_about = "Evaluates conditional visibility, inspects authoring state, and reorders sections and questions in a catalog file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ScopeKind {
    Question,
    Section,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MoveDirection {
    Up,
    Down,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the visibility verdict for every section and question.
    Evaluate {
        /// Path to the catalog JSON file.
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,
        /// Optional JSON object of answers given so far.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Output mode for the verdicts.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the authoring view: sections, questions, options, and rules.
    Inspect {
        /// Path to the catalog JSON file.
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,
    },
    /// Print the JSON Schema that catalog files must satisfy.
    Schema,
    /// Move a section or question one place up or down and rewrite the file.
    Reorder {
        /// Path to the catalog JSON file (rewritten in place).
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,
        /// Id of the section or question to move.
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        direction: MoveDirection,
        /// What kind of entity `id` names. Question moves stay inside the
        /// question's own section.
        #[arg(long, value_enum, default_value_t = ScopeKind::Question)]
        scope: ScopeKind,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Evaluate {
            catalog,
            answers,
            format,
        } => run_evaluate(&catalog, answers.as_deref(), format),
        Command::Inspect { catalog } => run_inspect(&catalog),
        Command::Schema => {
            let schema = schemars::schema_for!(Catalog);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Command::Reorder {
            catalog,
            id,
            direction,
            scope,
        } => run_reorder(&catalog, &id, direction, scope),
    }
}

fn load_store(path: &Path) -> CliResult<CatalogStore> {
    let contents = fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&contents)?;
    Ok(CatalogStore::load(catalog))
}

fn load_answers(path: Option<&Path>) -> CliResult<AnswerSnapshot> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            let value: serde_json::Value = serde_json::from_str(&contents)?;
            Ok(AnswerSnapshot::from_json(&value))
        }
        None => Ok(AnswerSnapshot::new()),
    }
}

fn run_evaluate(catalog: &Path, answers: Option<&Path>, format: OutputFormat) -> CliResult<()> {
    let store = load_store(catalog)?;
    let snapshot = load_answers(answers)?;
    let verdicts = resolve_visibility(&store, &snapshot);

    match format {
        OutputFormat::Text => {
            CatalogPresenter::new(&store, Detail::Verdicts).show_verdicts(&verdicts);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&verdicts)?);
        }
    }
    Ok(())
}

fn run_inspect(catalog: &Path) -> CliResult<()> {
    let store = load_store(catalog)?;
    CatalogPresenter::new(&store, Detail::Authoring).show_catalog();
    Ok(())
}

fn run_reorder(
    catalog: &Path,
    id: &str,
    direction: MoveDirection,
    scope: ScopeKind,
) -> CliResult<()> {
    let mut store = load_store(catalog)?;
    let scope = match scope {
        ScopeKind::Section => SiblingScope::Sections,
        ScopeKind::Question => {
            let question = store
                .question(id)
                .ok_or_else(|| format!("question {id} not found in catalog"))?;
            SiblingScope::Questions {
                section_id: question.section_id.clone(),
            }
        }
    };
    let direction = match direction {
        MoveDirection::Up => Direction::Up,
        MoveDirection::Down => Direction::Down,
    };

    match move_entity(&mut store, &scope, id, direction)? {
        MoveOutcome::Moved => {
            let serialized = serde_json::to_string_pretty(&store.to_catalog())?;
            fs::write(catalog, serialized + "\n")?;
            println!("Moved {}", id);
        }
        MoveOutcome::Boundary => {
            println!("{} is already at the end of its list; nothing to do", id);
        }
    }
    Ok(())
}
