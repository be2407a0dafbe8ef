//! CertCraft command line entry point.

use certcraft_app::{AppResult, Script, replay, summarize};
use certcraft_core::{Document, Editor, EditorConfig, Template, Viewport};
use clap::{Parser, Subcommand};
use kurbo::Point;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "certcraft", version, about = "Certificate designer, headless")]
struct Cli {
    /// Editor config (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write an empty document, optionally seeded from a template.
    New {
        output: PathBuf,
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Replay a gesture script against a document.
    Replay {
        script: PathBuf,
        /// Document to start from; an empty one when omitted.
        #[arg(long)]
        document: Option<PathBuf>,
        #[arg(long, short)]
        output: PathBuf,
        /// Screen position of the canvas' top-left corner.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        origin_x: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        origin_y: f64,
        /// Display scale the canvas is drawn at.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// Print a summary of a document.
    Inspect { document: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::New { output, template } => {
            let mut editor = Editor::new(config);
            if let Some(path) = template {
                let json = std::fs::read_to_string(&path)?;
                editor.apply_template(Template::from_json(&json)?)?;
            }
            editor.document().save(&output)?;
            log::info!("Wrote {}", output.display());
        }
        Command::Replay {
            script,
            document,
            output,
            origin_x,
            origin_y,
            scale,
        } => {
            let document = match document {
                Some(path) => Document::load(path)?,
                None => Document::new().with_canvas_size(config.canvas_width, config.canvas_height),
            };
            let mut editor = Editor::from_document(document, config)?;
            editor.set_viewport(Some(Viewport::new(Point::new(origin_x, origin_y), scale)?));

            let script = Script::load(&script)?;
            let report = replay(&mut editor, &script);
            editor.document().save(&output)?;
            println!(
                "{} steps, {} without effect; history {} entries, at {}",
                report.steps,
                report.rejected,
                report.history_len,
                report.history_cursor + 1,
            );
        }
        Command::Inspect { document } => {
            print!("{}", summarize(&Document::load(document)?));
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> AppResult<EditorConfig> {
    Ok(match path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    })
}
