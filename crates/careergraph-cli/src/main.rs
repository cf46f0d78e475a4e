use careergraph::date::parse_iso_date;
use careergraph::render::raster::{RasterError, RasterOptions, layout_to_png};
use careergraph::render::{
    HeadlessError, LayoutOptions, RenderError, SvgRenderOptions, layout_career_graph,
    layout_to_json, render_career_graph_svg, sanitize_svg_id,
};
use careergraph::{
    CareerEntry, GraphConfig, SortOrder, chronological_timeline, load_entries_json,
    validate_entries,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_ENV: &str = "CAREERGRAPH_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    InvalidArg(String),
    Io(std::io::Error),
    Load(careergraph::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    /// Validation found problems; the issues were already printed.
    Invalid(usize),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::InvalidArg(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Load(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Invalid(n) => write!(f, "{n} validation issue(s) found"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<careergraph::Error> for CliError {
    fn from(value: careergraph::Error) -> Self {
        Self::Load(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Render(HeadlessError::Render(value))
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Validate,
    #[default]
    Layout,
    Render,
    Timeline,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    strict: bool,
    config: Option<String>,
    present: Option<NaiveDate>,
    order: SortOrder,
    render_format: RenderFormat,
    render_scale: Option<f32>,
    background: Option<String>,
    diagram_id: Option<String>,
    title: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "careergraph-cli\n\
\n\
USAGE:\n\
  careergraph-cli validate [--pretty] [<path>|-]\n\
  careergraph-cli [layout] [--pretty] [--config <path>] [--present <YYYY-MM-DD>] [--strict] [<path>|-]\n\
  careergraph-cli render [--format svg|png] [--scale <n>] [--background <color>] [--id <diagram-id>] [--title <text>] [--config <path>] [--present <YYYY-MM-DD>] [--strict] [--out <path>] [<path>|-]\n\
  careergraph-cli timeline [--order newest|oldest] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON array of entries or an object with an `entries` array.\n\
  - validate prints the issues as JSON and exits with status 3 when there are any.\n\
  - --strict makes layout/render fail the same way instead of drawing degraded input.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - Set CAREERGRAPH_LOG (e.g. debug) to see pipeline logs on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "validate" => args.command = Command::Validate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "timeline" => args.command = Command::Timeline,
            "--pretty" => args.pretty = true,
            "--strict" => args.strict = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--present" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let Some(date) = parse_iso_date(raw) else {
                    return Err(CliError::InvalidArg(format!(
                        "--present expects a YYYY-MM-DD date, got {raw:?}"
                    )));
                };
                args.present = Some(date);
            }
            "--order" => {
                let Some(order) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.order = match order.as_str() {
                    "newest" => SortOrder::NewestFirst,
                    "oldest" => SortOrder::OldestFirst,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.render_scale = Some(scale);
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(sanitize_svg_id(id));
            }
            "--title" => {
                let Some(title) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.title = Some(title.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn layout_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut options = LayoutOptions::new();
    if let Some(path) = args.config.as_deref() {
        let text = std::fs::read_to_string(path)?;
        let overrides: serde_json::Value = serde_json::from_str(&text)?;
        if !overrides.is_object() {
            return Err(CliError::InvalidArg(format!(
                "--config {path}: expected a JSON object"
            )));
        }
        options = options.with_config(GraphConfig::with_overrides(&overrides));
    }
    if let Some(present) = args.present {
        options = options.with_present_date(present)?;
    }
    // Surface config problems before any output is produced.
    options.settings()?;
    Ok(options)
}

/// Prints the issues (to stderr in strict mode) and fails when there are any.
fn check_entries(entries: &[CareerEntry], to_stdout: bool, pretty: bool) -> Result<(), CliError> {
    let issues = validate_entries(entries);
    if to_stdout {
        write_json(&issues, pretty)?;
    } else {
        for issue in &issues {
            eprintln!("{}: {}: {}", issue.entry_id, issue.kind, issue.message);
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::Invalid(issues.len()))
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let entries = load_entries_json(&text)?;
    tracing::debug!(command = ?args.command, entries = entries.len(), "running");

    match args.command {
        Command::Validate => check_entries(&entries, true, args.pretty),
        Command::Timeline => {
            let items = chronological_timeline(&entries, args.order);
            write_json(&items, args.pretty)
        }
        Command::Layout => {
            if args.strict {
                check_entries(&entries, false, args.pretty)?;
            }
            let layout = layout_career_graph(&entries, &layout_options(&args)?)?;
            let json = layout_to_json(&layout, args.pretty)?;
            println!("{json}");
            Ok(())
        }
        Command::Render => {
            if args.strict {
                check_entries(&entries, false, args.pretty)?;
            }
            let layout = layout_career_graph(&entries, &layout_options(&args)?)?;
            let svg_options = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                title: args.title.clone(),
                ..SvgRenderOptions::default()
            };

            match args.render_format {
                RenderFormat::Svg => {
                    let svg = render_career_graph_svg(&layout, &svg_options);
                    write_text(&svg, args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let defaults = RasterOptions::default();
                    let raster = RasterOptions {
                        scale: args.render_scale.unwrap_or(defaults.scale),
                        background: args.background.clone().or(defaults.background),
                    };
                    let bytes = layout_to_png(&layout, &svg_options, &raster)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    setup_logging();

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Invalid(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
