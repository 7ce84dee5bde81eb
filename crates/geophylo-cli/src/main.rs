#![forbid(unsafe_code)]

use geophylo::io::json;
use geophylo::{Algorithm, DpStrategy, Geophylogeny, GreedyOptimizer, LeaderStyle, generate};
use geophylo_render::{SvgRenderOptions, render_geophylogeny_svg};
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Geophylo(geophylo::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Geophylo(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<geophylo::Error> for CliError {
    fn from(value: geophylo::Error) -> Self {
        Self::Geophylo(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Order,
    Generate,
    Render,
    Experiment,
}

/// Ordering heuristic selector. `greedy` is also available as a polish pass
/// after any other heuristic via `--polish`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Heuristic {
    #[default]
    DpCrossings,
    DpEuclidean,
    DpHorizontal,
    DpHops,
    TopDown,
    Greedy,
}

impl Heuristic {
    fn to_algorithm(self, seed: u64) -> Algorithm {
        match self {
            Heuristic::DpCrossings => Algorithm::Dp(DpStrategy::Crossings),
            Heuristic::DpEuclidean => Algorithm::Dp(DpStrategy::EuclideanDistance),
            Heuristic::DpHorizontal => Algorithm::Dp(DpStrategy::HorizontalDistance),
            Heuristic::DpHops => Algorithm::Dp(DpStrategy::Hops),
            Heuristic::TopDown => Algorithm::TopDown,
            Heuristic::Greedy => Algorithm::Greedy { seed },
        }
    }
}

impl FromStr for Heuristic {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crossings" | "dp-crossings" => Ok(Self::DpCrossings),
            "euclidean" | "dp-euclidean" => Ok(Self::DpEuclidean),
            "horizontal" | "dp-horizontal" => Ok(Self::DpHorizontal),
            "hops" | "dp-hops" => Ok(Self::DpHops),
            "top-down" => Ok(Self::TopDown),
            "greedy" => Ok(Self::Greedy),
            _ => Err(()),
        }
    }
}

fn parse_leader_style(s: &str) -> Result<LeaderStyle, ()> {
    match s.trim().to_ascii_lowercase().as_str() {
        "s" => Ok(LeaderStyle::S),
        "po" => Ok(LeaderStyle::Po),
        "none" => Ok(LeaderStyle::None),
        _ => Err(()),
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    out: Option<String>,
    svg_out: Option<String>,
    heuristic: Heuristic,
    polish: bool,
    leader_style: LeaderStyle,
    seed: u64,
    num_leaves: usize,
    map_width: u32,
    map_height: u32,
    name: Option<String>,
    sizes_from: usize,
    sizes_to: usize,
    sizes_step: usize,
    repeats: usize,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::default(),
            input: None,
            out: None,
            svg_out: None,
            heuristic: Heuristic::default(),
            polish: false,
            leader_style: LeaderStyle::S,
            seed: 0,
            num_leaves: 20,
            map_width: 500,
            map_height: 300,
            name: None,
            sizes_from: 10,
            sizes_to: 50,
            sizes_step: 10,
            repeats: 5,
        }
    }
}

fn usage() -> &'static str {
    "geophylo-cli\n\
\n\
USAGE:\n\
  geophylo-cli generate [--leaves <n>] [--seed <n>] [--width <w>] [--height <h>] [--name <s>] [--out <path>]\n\
  geophylo-cli [order] [--algorithm crossings|euclidean|horizontal|hops|top-down|greedy] [--polish] [--seed <n>] [--leaders s|po] [--out <path>] [--svg <path>] [<path>|-]\n\
  geophylo-cli render [--leaders s|po|none] [--svg <path>] [<path>|-]\n\
  geophylo-cli experiment [--sizes <from>:<to>:<step>] [--repeats <n>] [--seed <n>] [--leaders s|po] [--width <w>] [--height <h>]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the instance JSON is read from stdin.\n\
  - order prints `crossings: <before> -> <after>` and writes the reordered\n\
    instance JSON with --out, the SVG drawing with --svg; with neither flag\n\
    the SVG goes to stdout.\n\
  - --polish runs the greedy optimizer after the selected heuristic.\n\
  - experiment prints one CSV row per generated instance to stdout.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "order" => args.command = Command::Order,
            "generate" => args.command = Command::Generate,
            "render" => args.command = Command::Render,
            "experiment" => args.command = Command::Experiment,
            "--polish" => args.polish = true,
            "--algorithm" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.heuristic = name
                    .parse::<Heuristic>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--leaders" => {
                let Some(style) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.leader_style =
                    parse_leader_style(style).map_err(|_| CliError::Usage(usage()))?;
            }
            "--seed" => args.seed = parse_value(it.next())?,
            "--leaves" => args.num_leaves = parse_value(it.next())?,
            "--width" => args.map_width = parse_value(it.next())?,
            "--height" => args.map_height = parse_value(it.next())?,
            "--repeats" => args.repeats = parse_value(it.next())?,
            "--sizes" => {
                let Some(range) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let mut parts = range.split(':');
                let (Some(from), Some(to), Some(step), None) =
                    (parts.next(), parts.next(), parts.next(), parts.next())
                else {
                    return Err(CliError::Usage(usage()));
                };
                args.sizes_from = from.parse().map_err(|_| CliError::Usage(usage()))?;
                args.sizes_to = to.parse().map_err(|_| CliError::Usage(usage()))?;
                args.sizes_step = step.parse().map_err(|_| CliError::Usage(usage()))?;
                if args.sizes_from < 2 || args.sizes_to < args.sizes_from || args.sizes_step == 0 {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--name" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.name = Some(name.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--svg" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.svg_out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
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

fn parse_value<T: FromStr>(raw: Option<&String>) -> Result<T, CliError> {
    raw.ok_or(CliError::Usage(usage()))?
        .parse()
        .map_err(|_| CliError::Usage(usage()))
}

fn read_instance(input: Option<&str>) -> Result<Geophylogeny, CliError> {
    let text = match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    Ok(json::from_json_str(&text)?)
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn render_svg(geophylogeny: &mut Geophylogeny) -> String {
    let options = SvgRenderOptions::default();
    geophylogeny.compute_x_coordinates();
    geophylogeny.compute_y_coordinates(options.y_step);
    render_geophylogeny_svg(geophylogeny, &options)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Generate => {
            let name = args
                .name
                .clone()
                .unwrap_or_else(|| format!("uniform-n{}-s{}", args.num_leaves, args.seed));
            let geophylogeny = generate::uniform_instance(
                args.map_width,
                args.map_height,
                args.num_leaves,
                &name,
                args.seed,
            )?;
            write_text(&json::to_json_string(&geophylogeny)?, args.out.as_deref())
        }
        Command::Order => {
            // Crossing counts need leaders.
            if args.leader_style == LeaderStyle::None {
                return Err(CliError::Usage(usage()));
            }
            let mut geophylogeny = read_instance(args.input.as_deref())?;
            geophylogeny.set_leader_style(args.leader_style);

            geophylogeny.compute_x_coordinates();
            let before = geophylogeny.number_of_crossings();
            geophylo::order_leaves(&mut geophylogeny, args.heuristic.to_algorithm(args.seed))?;
            if args.polish && args.heuristic != Heuristic::Greedy {
                let mut optimizer = GreedyOptimizer::new(&geophylogeny, args.seed)?;
                optimizer.order_leaves(&mut geophylogeny);
            }
            let after = geophylogeny.number_of_crossings();
            eprintln!("crossings: {before} -> {after}");

            if let Some(out) = args.out.as_deref() {
                write_text(&json::to_json_string(&geophylogeny)?, Some(out))?;
            }
            if args.svg_out.is_some() || args.out.is_none() {
                let svg = render_svg(&mut geophylogeny);
                write_text(&svg, args.svg_out.as_deref())?;
            }
            Ok(())
        }
        Command::Render => {
            let mut geophylogeny = read_instance(args.input.as_deref())?;
            geophylogeny.set_leader_style(args.leader_style);
            let svg = render_svg(&mut geophylogeny);
            write_text(&svg, args.svg_out.as_deref())
        }
        Command::Experiment => run_experiment(&args),
    }
}

/// Heuristics compared in the experiment, in column order. Each also gets a
/// `+greedy` column with the optimizer run on the heuristic's output.
const EXPERIMENT_HEURISTICS: &[Heuristic] = &[
    Heuristic::TopDown,
    Heuristic::DpCrossings,
    Heuristic::DpEuclidean,
    Heuristic::DpHorizontal,
    Heuristic::DpHops,
];

/// Benchmarks every heuristic on seeded uniform instances and prints one CSV
/// row per instance. Each heuristic runs on its own copy of the instance, so
/// column order carries no hidden state.
fn run_experiment(args: &Args) -> Result<(), CliError> {
    if args.leader_style == LeaderStyle::None {
        return Err(CliError::Usage(usage()));
    }
    let mut header = String::from("size,repeat,seed,initial,greedy");
    for heuristic in EXPERIMENT_HEURISTICS {
        let name = heuristic_column(*heuristic);
        header.push_str(&format!(",{name},{name}+greedy"));
    }
    println!("{header}");

    for size in (args.sizes_from..=args.sizes_to).step_by(args.sizes_step) {
        for repeat in 0..args.repeats {
            let seed = args
                .seed
                .wrapping_add((size as u64) << 20)
                .wrapping_add(repeat as u64);
            let name = format!("uniform-n{size}-r{repeat}-s{seed}");
            let mut instance =
                generate::uniform_instance(args.map_width, args.map_height, size, &name, seed)?;
            instance.set_leader_style(args.leader_style);
            instance.compute_x_coordinates();

            let mut row = format!(
                "{size},{repeat},{seed},{}",
                instance.number_of_crossings()
            );

            let mut greedy_only = instance.clone();
            let mut optimizer = GreedyOptimizer::new(&greedy_only, seed)?;
            optimizer.order_leaves(&mut greedy_only);
            row.push_str(&format!(",{}", greedy_only.number_of_crossings()));

            for heuristic in EXPERIMENT_HEURISTICS {
                let mut ordered = instance.clone();
                geophylo::order_leaves(&mut ordered, heuristic.to_algorithm(seed))?;
                row.push_str(&format!(",{}", ordered.number_of_crossings()));

                let mut optimizer = GreedyOptimizer::new(&ordered, seed)?;
                optimizer.order_leaves(&mut ordered);
                row.push_str(&format!(",{}", ordered.number_of_crossings()));
            }
            println!("{row}");
        }
    }
    Ok(())
}

fn heuristic_column(heuristic: Heuristic) -> &'static str {
    match heuristic {
        Heuristic::DpCrossings => "crossings",
        Heuristic::DpEuclidean => "euclidean",
        Heuristic::DpHorizontal => "horizontal",
        Heuristic::DpHops => "hops",
        Heuristic::TopDown => "top-down",
        Heuristic::Greedy => "greedy",
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

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

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
