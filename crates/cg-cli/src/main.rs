//! # certigen
//!
//! Command-line access to certificate templates stored on the local disk.
//!
//! ```bash
//! # Write a starter template
//! certigen new award.json --format a4 --orientation landscape
//!
//! # Flatten a template into render-ready elements
//! certigen elements award.json
//!
//! # Check a template for structural problems
//! certigen lint award.json
//!
//! # Save into the local store (uploads inline images)
//! certigen save award.json --owner alice --name "Award"
//! certigen list --owner alice
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for detail.

use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cg_core::lint::LintSeverity;
use cg_core::model::{Document, Orientation, PageSize, PaperFormat};
use cg_core::{lint_document, starter_document, to_elements};
use cg_store::{
    FsStorage, GatewayConfig, InlineResolver, JsonFileRepository, OwnerId, SaveMode, SaveRequest,
    TemplateGateway, TemplateId,
};

/// certigen - certificate template tool
#[derive(Parser, Debug)]
#[command(name = "certigen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter template (background, title, recipient, description)
    New {
        /// Output file
        out: PathBuf,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Print the flattened, z-sorted element list as JSON
    Elements {
        /// Template JSON file
        file: PathBuf,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Report structural problems; exits non-zero on warnings
    Lint {
        /// Template JSON file
        file: PathBuf,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Save a template into the local store
    Save {
        /// Template JSON file
        file: PathBuf,

        /// Owner id
        #[arg(long)]
        owner: String,

        /// Template name, unique per owner
        #[arg(long)]
        name: String,

        /// Overwrite the template with this id instead of creating one
        #[arg(long, value_name = "UUID")]
        update: Option<TemplateId>,

        /// Preview image to store as the thumbnail (data: URL or remote URL)
        #[arg(long)]
        thumbnail: Option<String>,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List an owner's templates
    List {
        /// Owner id
        #[arg(long)]
        owner: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Paper format
    #[arg(long, value_enum, default_value_t = FormatArg::A4)]
    format: FormatArg,

    /// Page orientation
    #[arg(long, value_enum, default_value_t = OrientationArg::Landscape)]
    orientation: OrientationArg,
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// Store directory (records in templates.json, uploads under assets/)
    #[arg(long, default_value = ".certigen")]
    store: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    A4,
    Letter,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    Landscape,
    Portrait,
}

impl PageArgs {
    fn page(&self) -> PageSize {
        let format = match self.format {
            FormatArg::A4 => PaperFormat::A4,
            FormatArg::Letter => PaperFormat::Letter,
        };
        let orientation = match self.orientation {
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::Portrait => Orientation::Portrait,
        };
        PageSize::for_format(format, orientation)
    }
}

type LocalGateway = TemplateGateway<JsonFileRepository, FsStorage, InlineResolver>;

fn open_store(args: &StoreArgs) -> LocalGateway {
    let config = GatewayConfig::from_env();
    log::debug!("gateway config: {config:?}");
    TemplateGateway::new(
        JsonFileRepository::new(args.store.join("templates.json")),
        FsStorage::new(args.store.join("assets"), config.public_base_url.clone()),
        InlineResolver::default(),
        config,
    )
}

fn read_document(path: &Path) -> Result<Document, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(Document::from_json(&text)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Commands::New { out, page } => {
            let doc = starter_document(page.page());
            std::fs::write(&out, doc.to_json())?;
            println!("wrote {}", out.display());
        }

        Commands::Elements { file, page } => {
            let doc = read_document(&file)?;
            let elements = to_elements(&doc, page.page());
            println!("{}", serde_json::to_string_pretty(&elements)?);
        }

        Commands::Lint { file, page } => {
            let doc = read_document(&file)?;
            let diags = lint_document(&doc, page.page());
            for d in &diags {
                let level = match d.severity {
                    LintSeverity::Warning => "warning",
                    LintSeverity::Info => "info",
                };
                println!("{level}[{}] {}: {}", d.rule, d.element_id, d.message);
            }
            if diags.iter().any(|d| d.severity == LintSeverity::Warning) {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Save {
            file,
            owner,
            name,
            update,
            thumbnail,
            page,
            store,
        } => {
            let gateway = open_store(&store);
            let mode = match update {
                Some(id) => SaveMode::Update(Some(id)),
                None => SaveMode::Create,
            };
            let outcome = gateway
                .save(SaveRequest {
                    document: read_document(&file)?,
                    owner_id: OwnerId(owner),
                    name,
                    page: page.page(),
                    mode,
                    thumbnail,
                })
                .await
                .map_err(|e| format!("{} ({})", e, e.error_code()))?;

            println!("saved {} as {}", outcome.record.name, outcome.record.id);
            for dropped in &outcome.dropped {
                eprintln!(
                    "dropped {} image on {}: {}",
                    dropped.slot.as_str(),
                    dropped.element_id,
                    dropped.reason
                );
            }
            if let Some(reason) = &outcome.thumbnail_error {
                eprintln!("thumbnail not stored: {reason}");
            }
        }

        Commands::List { owner, store } => {
            let gateway = open_store(&store);
            for record in gateway.list(&OwnerId(owner)).await? {
                println!(
                    "{}  {}  {}x{}",
                    record.id, record.name, record.width, record.height
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
