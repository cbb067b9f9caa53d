use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use xmlview::app::{App, Viewer};
use xmlview::config::{Config, DirectoryContext};
use xmlview::export;
use xmlview::model::document::{DocumentSet, DocumentVariant};
use xmlview::services::tracing_setup;

/// A terminal viewer for large XML documents
#[derive(Parser, Debug)]
#[command(name = "xmlview")]
#[command(about = "View query results of up to three document variants with live search", long_about = None)]
#[command(version)]
struct Args {
    /// Document before any transformation ran
    #[arg(value_name = "FILE")]
    raw: Option<PathBuf>,

    /// Document after patches were applied
    #[arg(long, value_name = "FILE")]
    patched: Option<PathBuf>,

    /// Document after inheritance was resolved
    #[arg(long, value_name = "FILE")]
    resolved: Option<PathBuf>,

    /// Query to run at startup, e.g. "//ThingDef[defName='Wall']"
    #[arg(long, short, value_name = "QUERY")]
    query: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the query results as plain XML and exit
    #[arg(long)]
    print: bool,

    /// Print the query results as color markup and exit
    #[arg(long, conflicts_with = "print")]
    markup: bool,

    /// Print the entire document of --variant as indented XML and exit
    #[arg(long, conflicts_with_all = ["print", "markup"])]
    print_document: bool,

    /// Only show the N-th result (1-based) with --print or --markup
    #[arg(long, value_name = "N")]
    select: Option<usize>,

    /// Variant to print: 1 raw, 2 patched, 3 resolved
    #[arg(long, value_name = "N", default_value = "1")]
    variant: usize,
}

fn load_documents(args: &Args) -> Result<DocumentSet> {
    let mut documents = DocumentSet::new();
    let paths = [
        (DocumentVariant::Raw, &args.raw),
        (DocumentVariant::Patched, &args.patched),
        (DocumentVariant::Resolved, &args.resolved),
    ];
    for (variant, path) in paths {
        if let Some(path) = path {
            documents
                .load_file(variant, path)
                .with_context(|| format!("Failed to load {} document", variant.label()))?;
        }
    }
    if documents.is_empty() {
        bail!("No documents given; pass at least one FILE, --patched or --resolved");
    }
    Ok(documents)
}

fn load_config(args: &Args, dirs: &DirectoryContext) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default(&dirs.config_dir)),
    }
}

fn selected_variant(args: &Args) -> Result<DocumentVariant> {
    args.variant
        .checked_sub(1)
        .and_then(DocumentVariant::from_index)
        .with_context(|| format!("--variant must be 1, 2 or 3, got {}", args.variant))
}

/// Non-interactive mode: write a whole document variant to stdout
fn print_document(args: &Args, documents: &DocumentSet) -> Result<()> {
    let variant = selected_variant(args)?;
    let document = documents
        .get(variant)
        .with_context(|| format!("No {} document loaded", variant.label()))?;
    println!("{}", export::document_xml(document));
    Ok(())
}

/// Non-interactive mode: run the query and write the formatted text to stdout
fn print_results(args: &Args, config: &Config, documents: DocumentSet) -> Result<()> {
    let Some(query) = &args.query else {
        bail!("--print and --markup need --query");
    };
    let variant = selected_variant(args)?;

    let mut viewer = Viewer::new(documents, config);
    viewer.switch_variant(variant);
    viewer
        .run_query(query)
        .with_context(|| format!("Invalid query {query:?}"))?;
    if let Some(index) = args.select {
        viewer.set_selection(index);
    }
    if let Some(message) = viewer.status().message() {
        bail!("{message}");
    }

    let text = if args.markup {
        viewer.markup_text()
    } else {
        viewer.export_text()
    };
    println!("{text}");
    Ok(())
}

fn run_event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal
            .draw(|frame| app.render(frame))
            .context("Failed to draw frame")?;

        if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code, key.modifiers);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let dirs = DirectoryContext::from_system().context("Failed to locate config directory")?;
    let config = load_config(&args, &dirs)?;

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    if args.print_document {
        tracing_setup::init_stderr_logging();
        let documents = load_documents(&args)?;
        return print_document(&args, &documents);
    }

    if args.print || args.markup {
        tracing_setup::init_stderr_logging();
        let documents = load_documents(&args)?;
        return print_results(&args, &config, documents);
    }

    // Log to a file so the terminal UI stays clean
    let log_path = args.log_file.clone().unwrap_or_else(|| dirs.log_path());
    tracing_setup::init_file_logging(&log_path);
    tracing::info!("Viewer starting");

    let documents = load_documents(&args)?;
    let mut app = App::new(Viewer::new(documents, &config));
    if let Some(query) = &args.query {
        app.submit_query(query);
    }

    let mut terminal = ratatui::init();
    let result = run_event_loop(&mut terminal, &mut app);
    ratatui::restore();

    tracing::info!("Viewer exiting");
    result
}
