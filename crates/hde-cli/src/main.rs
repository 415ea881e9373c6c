use hde::{ArrangeOptions, Dimensions, Layout, NeverCancel, UnreachedPolicy};
use hde_graph::{GraphDocument, GraphRead, MemoryGraph, VertexId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Graph(hde_graph::Error),
    Layout(hde::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<hde_graph::Error> for CliError {
    fn from(value: hde_graph::Error) -> Self {
        Self::Graph(value)
    }
}

impl From<hde::Error> for CliError {
    fn from(value: hde::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Arrange,
    Layout,
}

/// Flags that override the (default or `--config`) options.
#[derive(Debug, Default)]
struct Overrides {
    dimensions: Option<Dimensions>,
    seed: Option<u64>,
    pivots: Option<usize>,
    max_iterations: Option<usize>,
    epsilon: Option<f64>,
    scale: Option<f64>,
    unreached: Option<UnreachedPolicy>,
    preserve_mean: bool,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    out: Option<String>,
    pretty: bool,
    verbose: u8,
    overrides: Overrides,
}

#[derive(Serialize)]
struct PositionOut {
    id: String,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    dimensions: u8,
    pivots: Vec<String>,
    degenerate_axes: &'a [usize],
    positions: Vec<PositionOut>,
}

fn usage() -> &'static str {
    "hde-cli\n\
\n\
USAGE:\n\
  hde-cli [arrange] [OPTIONS] [<path>|-]\n\
  hde-cli layout [OPTIONS] [<path>|-]\n\
\n\
OPTIONS:\n\
  --dimensions 2|3            output dimensionality (default 2)\n\
  --seed <n>                  seed for the eigenvector start vectors\n\
  --pivots <n>                number of pivot axes (default 50)\n\
  --max-iterations <n>        power iteration budget per axis (default 100)\n\
  --epsilon <f>               convergence tolerance (default 0.001)\n\
  --scale <f>                 coordinate scale factor (default 10)\n\
  --unreached sentinel|clamp|exclude\n\
  --preserve-mean             keep the graph's previous centroid\n\
  --config <path>             JSON file with arrange options; flags override it\n\
  --out <path>                write output to a file instead of stdout\n\
  --pretty                    pretty-print JSON\n\
  -v, -vv, -vvv               log at info, debug, trace (default: RUST_LOG or warn)\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a graph document: {\"vertices\": [{\"id\": \"a\"}], \"edges\": [{\"source\": \"a\", \"target\": \"b\"}]}.\n\
  - arrange prints the document with updated coordinates; layout prints the computed layout.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_value<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "arrange" => args.command = Command::Arrange,
            "layout" => args.command = Command::Layout,
            "--pretty" => args.pretty = true,
            "--preserve-mean" => args.overrides.preserve_mean = true,
            "-v" => args.verbose = 1,
            "-vv" => args.verbose = 2,
            "-vvv" => args.verbose = 3,
            "--dimensions" => {
                let n: u8 = parse_value(next_value(&mut it)?)?;
                args.overrides.dimensions =
                    Some(Dimensions::try_from(n).map_err(|_| CliError::Usage(usage()))?);
            }
            "--seed" => args.overrides.seed = Some(parse_value(next_value(&mut it)?)?),
            "--pivots" => args.overrides.pivots = Some(parse_value(next_value(&mut it)?)?),
            "--max-iterations" => {
                args.overrides.max_iterations = Some(parse_value(next_value(&mut it)?)?);
            }
            "--epsilon" => args.overrides.epsilon = Some(parse_value(next_value(&mut it)?)?),
            "--scale" => args.overrides.scale = Some(parse_value(next_value(&mut it)?)?),
            "--unreached" => {
                args.overrides.unreached = Some(parse_value(next_value(&mut it)?)?);
            }
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
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

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
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

fn load_options(args: &Args) -> Result<ArrangeOptions, CliError> {
    let mut opts = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<ArrangeOptions>(&std::fs::read_to_string(path)?)?,
        None => ArrangeOptions::default(),
    };

    let o = &args.overrides;
    if let Some(d) = o.dimensions {
        opts.dimensions = d;
    }
    if let Some(seed) = o.seed {
        opts.random_seed = Some(seed);
    }
    if let Some(p) = o.pivots {
        opts.pivot_count = p;
    }
    if let Some(n) = o.max_iterations {
        opts.max_iterations = n;
    }
    if let Some(e) = o.epsilon {
        opts.epsilon = e;
    }
    if let Some(s) = o.scale {
        opts.scale = s;
    }
    if let Some(u) = o.unreached {
        opts.unreached = u;
    }
    if o.preserve_mean {
        opts.preserve_mean = true;
    }

    opts.validate()?;
    Ok(opts)
}

fn write_output(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
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

fn vertex_name(g: &MemoryGraph, v: VertexId) -> String {
    g.label(v).map_or_else(|| v.to_string(), str::to_string)
}

fn layout_out<'a>(g: &MemoryGraph, layout: &'a Layout) -> LayoutOut<'a> {
    LayoutOut {
        dimensions: layout.dimensions.into(),
        pivots: layout.pivots.iter().map(|&p| vertex_name(g, p)).collect(),
        degenerate_axes: &layout.degenerate_axes,
        positions: layout
            .positions
            .iter()
            .map(|(&v, p)| PositionOut {
                id: vertex_name(g, v),
                x: p.x,
                y: p.y,
                z: p.z,
            })
            .collect(),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let opts = load_options(&args)?;
    let text = read_input(args.input.as_deref())?;
    let doc = GraphDocument::from_json(&text)?;
    let mut graph = doc.to_graph()?;
    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );

    let mut rng = match opts.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match args.command {
        Command::Arrange => {
            hde::arrange_with(&mut graph, &opts, &mut rng, &NeverCancel)?;
            let out = GraphDocument::from_graph(&graph);
            write_output(&out, args.pretty, args.out.as_deref())
        }
        Command::Layout => {
            let layout = hde::compute_layout(&graph, &opts, &mut rng, &NeverCancel)?;
            write_output(
                &layout_out(&graph, &layout),
                args.pretty,
                args.out.as_deref(),
            )
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
