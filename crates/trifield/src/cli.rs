//! Command line parsing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand, value_t};

/// Output format of the `export` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "svg" => Some(ExportFormat::Svg),
            "png" => Some(ExportFormat::Png),
            _ => None,
        }
    }

    /// Guess from a file extension.
    fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

/// Options of the `export` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub width: f64,
    pub height: f64,
    /// Seconds into the animation; the config's static time when absent.
    pub time: Option<f64>,
    pub format: ExportFormat,
    pub output: PathBuf,
    /// Overrides the config's overscan setting when `Some`.
    pub overscan: Option<bool>,
    /// Overrides the backend's default outline width when `Some`.
    pub stroke_width: Option<f64>,
}

/// What to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive terminal view.
    Run,
    /// Render one frame to a file.
    Export(ExportOptions),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub command: Command,
}

fn build() -> App<'static, 'static> {
    App::new("trifield")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Read configuration from PATH instead of the default location"),
        )
        .arg(
            Arg::with_name("log-file")
                .long("log-file")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Write logs to PATH (filter with RUST_LOG)"),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Render a single frame to an SVG or PNG file")
                .arg(
                    Arg::with_name("width")
                        .long("width")
                        .short("W")
                        .value_name("UNITS")
                        .takes_value(true)
                        .required(true)
                        .help("Viewport width"),
                )
                .arg(
                    Arg::with_name("height")
                        .long("height")
                        .short("H")
                        .value_name("UNITS")
                        .takes_value(true)
                        .required(true)
                        .help("Viewport height"),
                )
                .arg(
                    Arg::with_name("time")
                        .long("time")
                        .short("t")
                        .value_name("SECONDS")
                        .takes_value(true)
                        .help("Seconds into the animation"),
                )
                .arg(
                    Arg::with_name("format")
                        .long("format")
                        .short("f")
                        .takes_value(true)
                        .possible_values(&["svg", "png"])
                        .help("Output format (default: from the output extension, else svg)"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .value_name("PATH")
                        .takes_value(true)
                        .help("Output file (default: trifield.<format>)"),
                )
                .arg(
                    Arg::with_name("no-overscan")
                        .long("no-overscan")
                        .help("Start the first row at the top edge"),
                )
                .arg(
                    Arg::with_name("stroke-width")
                        .long("stroke-width")
                        .value_name("UNITS")
                        .takes_value(true)
                        .help("Triangle outline width"),
                ),
        )
}

/// Parse the process arguments, exiting with usage on error.
pub fn parse() -> Cli {
    parse_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
}

/// Parse an explicit argument list.
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build().get_matches_from_safe(args)?;
    from_matches(&matches)
}

fn from_matches(matches: &ArgMatches) -> Result<Cli, clap::Error> {
    let (command, sub) = match matches.subcommand() {
        ("export", Some(sub)) => (Command::Export(export_options(sub)?), Some(sub)),
        _ => (Command::Run, None),
    };
    // Global options may follow the subcommand name.
    let global = |name: &str| {
        matches
            .value_of(name)
            .or_else(|| sub.and_then(|sub| sub.value_of(name)))
            .map(PathBuf::from)
    };

    Ok(Cli {
        config: global("config"),
        log_file: global("log-file"),
        command,
    })
}

fn export_options(matches: &ArgMatches) -> Result<ExportOptions, clap::Error> {
    let width = value_t!(matches, "width", f64)?;
    let height = value_t!(matches, "height", f64)?;
    let time = match matches.value_of("time") {
        Some(_) => Some(value_t!(matches, "time", f64)?),
        None => None,
    };
    let stroke_width = match matches.value_of("stroke-width") {
        Some(_) => Some(value_t!(matches, "stroke-width", f64)?),
        None => None,
    };

    let output = matches.value_of("output").map(PathBuf::from);
    let format = matches
        .value_of("format")
        .and_then(ExportFormat::from_name)
        .or_else(|| output.as_deref().and_then(ExportFormat::from_path))
        .unwrap_or(ExportFormat::Svg);
    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("trifield.{}", format.extension())));

    Ok(ExportOptions {
        width,
        height,
        time,
        format,
        output,
        overscan: matches.is_present("no-overscan").then_some(false),
        stroke_width,
    })
}
