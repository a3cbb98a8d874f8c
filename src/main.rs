use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use moodgraph::aggregate;
use moodgraph::csv_reader;
use moodgraph::dashboard::{self, Dashboard, DashboardConfig};
use moodgraph::graph;
use moodgraph::interaction::Event;
use moodgraph::parser;
use moodgraph::record::{Attribute, RowStore, Variable};
use moodgraph::selection::ChartId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One SVG file per chart
    Svg,
    /// One PNG file per chart
    Png,
    /// A single dashboard.html page
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "moodgraph")]
#[command(about = "Render linked charts of student mental-health survey data", long_about = None)]
struct Args {
    #[arg(help = "Survey CSV file (reads stdin when omitted)")]
    input: Option<PathBuf>,

    #[arg(short = 'o', long = "out", default_value = ".", help = "Output directory")]
    out: PathBuf,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Svg)]
    format: Format,

    #[arg(short = 'a', long = "attribute", help = "Grouping attribute: gpa, year, gender or age")]
    attribute: Option<Attribute>,

    #[arg(long = "uncheck", help = "Hide a parallel-coordinates axis (repeatable)")]
    uncheck: Vec<Variable>,

    #[arg(short = 'e', long = "events", help = "Event script to replay before rendering")]
    events: Option<PathBuf>,

    #[arg(long = "width", help = "Override every chart's width in pixels")]
    width: Option<u32>,

    #[arg(long = "height", help = "Override every chart's height in pixels")]
    height: Option<u32>,

    #[arg(long = "frame-ms", help = "Render transitions this many ms in (default: settled)")]
    frame_ms: Option<u64>,

    #[arg(long = "summary", help = "Print per-category counts for the selected attribute")]
    summary: bool,

    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory '{}'", args.out.display()))?;

    let store = match load(args.input.as_deref()) {
        Ok(store) => store,
        Err(err) => {
            if args.format == Format::Html {
                let path = args.out.join("dashboard.html");
                fs::write(&path, dashboard::failure_html(&format!("{:#}", err)))
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
            }
            return Err(err);
        }
    };

    let config = DashboardConfig::default().with_size(args.width, args.height);
    let mut dashboard = Dashboard::new(store, &config);
    dashboard.open()?;

    let mut events: Vec<Event> = Vec::new();
    if let Some(attribute) = args.attribute {
        events.push(Event::SelectAttribute(attribute));
    }
    events.extend(args.uncheck.iter().map(|variable| Event::SetChecked {
        variable: *variable,
        checked: false,
    }));
    if let Some(path) = &args.events {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read event script '{}'", path.display()))?;
        events.extend(parser::parse_script(&source)?);
    }
    dashboard.dispatch_all(events)?;
    dashboard.settle()?;

    if args.summary {
        let attribute = dashboard.state().selected_attribute;
        println!(
            "{} records, {} with depression",
            dashboard.store().len(),
            dashboard.store().depressed_count()
        );
        for entry in aggregate::count_by_attribute(dashboard.store(), attribute) {
            println!("{}\t{}\t{}", attribute.label(), entry.category, entry.count);
        }
    }

    match args.format {
        Format::Html => {
            let path = args.out.join("dashboard.html");
            fs::write(&path, dashboard.to_html(args.frame_ms)?)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(path = %path.display(), "wrote dashboard");
        }
        Format::Svg | Format::Png => {
            for chart in ChartId::ALL {
                let scene = dashboard.frame(chart, args.frame_ms);
                let (bytes, ext) = if args.format == Format::Svg {
                    (graph::render_svg(&scene)?.into_bytes(), "svg")
                } else {
                    (graph::render_png(&scene)?, "png")
                };
                let path = args.out.join(format!("{}.{}", chart, ext));
                fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
                info!(path = %path.display(), "wrote chart");
            }
        }
    }

    Ok(())
}

fn load(input: Option<&Path>) -> Result<RowStore> {
    let data = match input {
        Some(path) => csv_reader::read_csv_from_path(path)?,
        None => csv_reader::read_csv_from_stdin()?,
    };
    RowStore::from_csv(&data).context("Invalid survey dataset")
}
