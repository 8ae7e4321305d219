//! # Worksheet host
//!
//! Headless host for the worksheet editor. Loads an editor config and an
//! optional document, replays a JSON input script (pointer, keyboard, typed
//! text, insertion requests) and writes the resulting document snapshot.
//!
//! ```bash
//! worksheet script.json --document sheet.json --output result.json
//! ```

mod error;
mod runner;
mod script;

pub use error::{AppError, AppResult};
pub use runner::{RunReport, ScriptRunner};
pub use script::{Script, ScriptStep};

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use worksheet_core::storage::{AutoSaveManager, FileStorage, block_on};
use worksheet_core::{CanvasDocument, EditorConfig};

/// Command-line arguments for the worksheet host.
#[derive(Debug, Clone, Parser)]
#[command(name = "worksheet")]
#[command(about = "Replay an input script through the worksheet editor")]
#[command(version)]
pub struct CliArgs {
    /// Input script (JSON)
    pub script: PathBuf,

    /// Editor config (JSON); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Starting document snapshot (JSON); a blank page when omitted
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Where to write the resulting snapshot; stdout when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also persist the result in the document store under this id
    #[arg(long)]
    pub save_as: Option<String>,

    /// Document store directory; the platform data directory when omitted
    #[arg(long, requires = "save_as")]
    pub store: Option<PathBuf>,
}

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: Option<&Path>) -> AppResult<EditorConfig> {
    match path {
        Some(path) => Ok(EditorConfig::from_json(&read(path)?)?),
        None => Ok(EditorConfig::default()),
    }
}

pub fn load_document(path: Option<&Path>) -> AppResult<Option<CanvasDocument>> {
    path.map(|path| Ok(CanvasDocument::from_json(&read(path)?)?))
        .transpose()
}

pub fn load_script(path: &Path) -> AppResult<Script> {
    Script::from_json(&read(path)?)
}

/// Write `document` to the file store under `id`.
pub fn persist(document: &CanvasDocument, id: &str, store: Option<&Path>) -> AppResult<()> {
    let storage = match store {
        Some(dir) => FileStorage::new(dir.to_path_buf())?,
        None => FileStorage::default_location()?,
    };
    let mut manager = AutoSaveManager::with_id(Arc::new(storage), id);
    block_on(manager.save_now(document))?;
    Ok(())
}

/// Run the host end to end and return the snapshot JSON.
pub fn run(args: &CliArgs) -> AppResult<String> {
    let config = load_config(args.config.as_deref())?;
    let document = load_document(args.document.as_deref())?;
    let script = load_script(&args.script)?;
    log::info!("Loaded script {} ({} step(s))", args.script.display(), script.len());

    let mut runner = ScriptRunner::new(config, document);
    runner.run(&script)?;
    for id in runner.delete_requests() {
        log::info!("Element {} was emptied and removed", id);
    }
    let document = runner.finish();
    if let Some(id) = &args.save_as {
        persist(&document, id, args.store.as_deref())?;
    }
    let json = document.to_json()?;

    if let Some(output) = &args.output {
        std::fs::write(output, &json).map_err(|source| AppError::Write {
            path: output.clone(),
            source,
        })?;
        log::info!("Wrote {}", output.display());
    }
    Ok(json)
}
