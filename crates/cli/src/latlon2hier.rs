//! latlon2hier - Generate generalization hierarchies for coordinates
//!
//! A command line tool speaking a line-oriented protocol on stdin/stdout:
//! it reads a parameter block and a list of lat/lon points, clusters the
//! points at several granularities, and emits one multi-column hierarchy
//! row per point followed by a terminating DONE line.

use clap::{ArgAction, Parser};
use geohier_core::error::{HierarchyError, Result};
use geohier_core::{
    assemble_rows, build_bottom_up, build_top_down, HierarchyParams, Order, Point, PointSet,
    WeightedKMeans,
};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::io::{self, BufWriter, Write};
use tracing::debug;

/// Parameter keys that must appear in the stdin parameter block.
const REQUIRED_PARAMETERS: [&str; 6] = [
    "Column separator",
    "Accuracy",
    "Order",
    "Preferred cluster amounts",
    "best k means try",
    "Amount of cores",
];

/// A command line tool for generating multi-level generalization
/// hierarchies of latitude/longitude coordinates.
#[derive(Parser, Debug)]
#[command(name = "latlon2hier")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Separator joining the columns of every protocol line
    #[arg(required = true)]
    separator: String,

    /// Print the parameter description block and exit
    #[arg(short = 'p', long, action = ArgAction::SetTrue)]
    parameters: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// Reads protocol lines one at a time, tracking the line number for
/// diagnostics.
struct LineReader<I> {
    lines: I,
    line_no: usize,
}

impl<I: Iterator<Item = io::Result<String>>> LineReader<I> {
    fn new(lines: I) -> Self {
        Self { lines, line_no: 0 }
    }

    fn next_line(&mut self) -> Result<String> {
        self.line_no += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(HierarchyError::MalformedRecord {
                line: self.line_no,
                reason: "unexpected end of input".to_string(),
            }),
        }
    }

    fn next_count(&mut self, what: &str) -> Result<usize> {
        let line = self.next_line()?;
        line.trim().parse::<usize>().map_err(|_| HierarchyError::MalformedRecord {
            line: self.line_no,
            reason: format!("expected {} count, got {:?}", what, line),
        })
    }
}

/// Parses a bracketed, comma-separated list of cluster amounts,
/// e.g. `[5, 10, 25]`.
fn parse_cluster_amounts(value: &str) -> Result<Vec<usize>> {
    let inner = value
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| HierarchyError::InvalidParameter {
            name: "Preferred cluster amounts",
            reason: format!("expected a bracketed list, got {:?}", value),
        })?;

    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| HierarchyError::InvalidParameter {
                    name: "Preferred cluster amounts",
                    reason: format!("invalid cluster amount {:?}", part.trim()),
                })
        })
        .collect()
}

fn parse_usize_parameter(name: &'static str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| HierarchyError::InvalidParameter {
            name,
            reason: format!("expected an integer, got {:?}", value),
        })
}

/// Reads and validates the stdin parameter block.
fn parse_parameters<I: Iterator<Item = io::Result<String>>>(
    reader: &mut LineReader<I>,
    data_separator: &str,
) -> Result<HierarchyParams> {
    let count = reader.next_count("parameter")?;

    let mut raw: FxHashMap<String, String> = FxHashMap::default();
    for _ in 0..count {
        let line = reader.next_line()?;
        if let Some((key, value)) = line.split_once(data_separator) {
            raw.insert(key.to_string(), value.to_string());
        } else {
            return Err(HierarchyError::MalformedRecord {
                line: reader.line_no,
                reason: format!("parameter line has no separator: {:?}", line),
            });
        }
    }

    for key in REQUIRED_PARAMETERS {
        if !raw.contains_key(key) {
            return Err(HierarchyError::MissingParameter(key.to_string()));
        }
    }

    HierarchyParams::new(
        raw["Column separator"].clone(),
        parse_usize_parameter("Accuracy", &raw["Accuracy"])?,
        Order::parse(&raw["Order"])?,
        parse_cluster_amounts(&raw["Preferred cluster amounts"])?,
        parse_usize_parameter("best k means try", &raw["best k means try"])?,
        parse_usize_parameter("Amount of cores", &raw["Amount of cores"])?,
    )
}

/// Reads the point block: a count line followed by `lat<sep>lon` records
/// split on the column separator parameter.
fn read_points<I: Iterator<Item = io::Result<String>>>(
    reader: &mut LineReader<I>,
    column_separator: &str,
) -> Result<PointSet> {
    let count = reader.next_count("point")?;
    let mut points = Vec::with_capacity(count);

    for _ in 0..count {
        let line = reader.next_line()?;
        let (lat, lon) =
            line.split_once(column_separator)
                .ok_or_else(|| HierarchyError::MalformedRecord {
                    line: reader.line_no,
                    reason: format!("coordinate line has no separator: {:?}", line),
                })?;

        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| HierarchyError::MalformedRecord {
                    line: reader.line_no,
                    reason: format!("invalid coordinate {:?}", s.trim()),
                })
        };
        points.push(Point::new(parse(lat)?, parse(lon)?));
    }

    Ok(PointSet::new(points))
}

/// Prints the parameter description block consumed by callers probing the
/// tool's configuration surface.
fn print_parameters<W: Write>(writer: &mut W, data_separator: &str) -> io::Result<()> {
    let rows: [[&str; 4]; 6] = [
        ["Column separator", "String", "::", "Used to split the columns"],
        ["Accuracy", "int", "5", "Digits after the decimal point"],
        ["Order", "String", "TD", "Top down (TD) or bottom up (BU)"],
        [
            "Preferred cluster amounts",
            "array",
            "[5, 10, 25, 50, 100]",
            "Cluster count per level, coarsest first",
        ],
        ["best k means try", "int", "5", "Clustering runs per level"],
        ["Amount of cores", "int", "1", "Cores the clustering may use"],
    ];

    for row in rows {
        writeln!(writer, "{}", row.iter().join(data_separator))?;
    }
    writeln!(
        writer,
        "Generates multi-level generalization hierarchies of lat-lon coordinates. \
         Each level clusters the data into the configured amount of clusters, either \
         top down (recursive splitting) or bottom up (centroid merging). Every output \
         row holds the coordinate followed by its cluster centroid at each level, \
         formatted with the configured accuracy."
    )?;
    writeln!(writer, "DONE")?;
    Ok(())
}

/// Runs the full pipeline: parse parameters and points, build the
/// hierarchy, and emit the assembled rows.
fn run<W: Write>(writer: &mut W, data_separator: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = LineReader::new(stdin.lines());

    let params = parse_parameters(&mut reader, data_separator)?;
    let points = read_points(&mut reader, &params.separator)?;
    debug!(?params, points = points.len(), "input parsed");

    // The capability's thread pool is sized by the pass-through core count.
    if params.cores > 0 {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(params.cores)
            .build_global();
    }

    let mut capability = WeightedKMeans::default();
    let hierarchy = match params.order {
        Order::TopDown => build_top_down(&mut capability, &points, &params.targets, params.retries)?,
        Order::BottomUp => {
            build_bottom_up(&mut capability, &points, &params.targets, params.retries)?
        }
    };

    let rows = assemble_rows(&points, &hierarchy, params.accuracy, &params.separator);
    for row in rows {
        writeln!(writer, "{}", row.iter().join(data_separator))?;
    }
    writeln!(writer, "DONE")?;
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut output = BufWriter::new(io::stdout());

    if args.parameters {
        print_parameters(&mut output, &args.separator)?;
        output.flush()?;
        return Ok(());
    }

    if let Err(e) = run(&mut output, &args.separator) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    output.flush()?;
    Ok(())
}
