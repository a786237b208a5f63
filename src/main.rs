mod bench;
mod gen_points;
mod results;
mod tour_io;

use std::{
    error::Error,
    fs::File,
    io::{self, BufWriter},
    num::ParseIntError,
    path::{Path, PathBuf},
};

use clap::{Args, Parser};
use fern::colors::{Color, ColoredLevelConfig};
use tsp_cuts::{
    export::write_vertex_table,
    solver::Params,
    vertex::{read_all, RandomPoints},
    Graph, Sampler, Vertex,
};

use bench::{execute_bench, BenchConfig};
use gen_points::write_points;
use results::SolveRow;
use tour_io::export_tour;

#[derive(Parser)]
#[clap(name = "ktsp", about = "Exact TSP tours with lazy subtour elimination")]
enum Cli {
    Solve(Solve),
    Bench(Bench),
    Gen(Gen),
    Export(Export),
}

#[derive(Args)]
struct Solve {
    /// File with coordinates: <x1> <y1> <x2> <y2>. Random points if omitted.
    #[clap(parse(from_os_str))]
    filename: Option<PathBuf>,

    /// Seed for the sampling method, decimal or 0x-prefixed hex. Random if omitted.
    #[clap(short, long, parse(try_from_str = parse_seed))]
    seed: Option<u64>,

    /// Sample size for the subgraph
    #[clap(short, long, default_value = "100")]
    nodes: usize,

    /// Execution timeout in minutes, disabled if zero or negative
    #[clap(short, long, default_value = "30")]
    timeout: f64,

    /// Coordinate range of random points
    #[clap(long, default_value = "1000")]
    extent: f64,

    /// Write the tour ids to this file
    #[clap(short, long, parse(from_os_str))]
    write_tour: Option<PathBuf>,

    /// Append a result row to this CSV file
    #[clap(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct Bench {
    /// File with coordinates: <x1> <y1> <x2> <y2>. Random points if omitted.
    #[clap(parse(from_os_str))]
    filename: Option<PathBuf>,

    /// Number of seeds per instance size
    #[clap(long, default_value = "5")]
    seeds: u64,

    /// First seed, decimal or 0x-prefixed hex
    #[clap(short, long, default_value = "0", parse(try_from_str = parse_seed))]
    seed: u64,

    /// Smallest instance size
    #[clap(short, long, default_value = "5")]
    nodes: usize,

    #[clap(long, default_value = "5")]
    step: usize,

    #[clap(long, default_value = "30")]
    max: usize,

    /// Timeout per instance in minutes, disabled if zero or negative
    #[clap(short, long, default_value = "5")]
    timeout: f64,

    #[clap(long, default_value = "1000")]
    extent: f64,

    #[clap(short, long, default_value = "bench.csv", parse(from_os_str))]
    output: PathBuf,
}

#[derive(Args)]
struct Gen {
    #[clap(short, long, default_value = "1000")]
    nodes: usize,

    #[clap(long, default_value = "1000")]
    extent: f64,

    #[clap(short, long, default_value = "0", parse(try_from_str = parse_seed))]
    seed: u64,

    #[clap(parse(from_os_str))]
    output: PathBuf,
}

#[derive(Args)]
struct Export {
    /// File with coordinates: <x1> <y1> <x2> <y2>
    #[clap(parse(from_os_str))]
    filename: PathBuf,

    /// Header to write, stdout if omitted
    #[clap(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn parse_seed(seed: &str) -> Result<u64, ParseIntError> {
    match seed.strip_prefix("0x").or_else(|| seed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => seed.parse::<u64>(),
    }
}

fn check_extent(extent: f64) -> Result<(), Box<dyn Error>> {
    if !(extent.is_finite() && extent > 0.0) {
        return Err(format!("extent must be positive, got {}", extent).into());
    }
    Ok(())
}

/// The vertices of `filename`, or `count` random points if there is no file.
fn population(
    filename: Option<&Path>,
    count: usize,
    extent: f64,
    sampler: &mut Sampler,
) -> Result<Vec<Vertex>, Box<dyn Error>> {
    match filename {
        Some(filename) => Ok(read_all(filename)?),
        None => {
            check_extent(extent)?;
            log::info!("No input file, generating {} random points.", count);
            Ok(RandomPoints::new(sampler, extent).take(count).collect())
        }
    }
}

fn execute_solve(solve: Solve) -> Result<(), Box<dyn Error>> {
    let seed = solve.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {:#x}.", seed);
    let mut sampler = Sampler::seeded(seed);

    let graph = match &solve.filename {
        Some(filename) => Graph::read(filename, solve.nodes, &mut sampler)?,
        None => {
            let vertices = population(None, solve.nodes, solve.extent, &mut sampler)?;
            Graph::new(vertices)
        }
    };
    let params = Params::default().with_timeout_minutes(solve.timeout);

    let solved = graph.solve(&params)?;
    println!(
        "{:?}",
        solved
            .tour
            .ids()
            .iter()
            .map(|id| id.get())
            .collect::<Vec<usize>>()
    );
    println!("{}", solved.elapsed.as_secs_f64());

    if let Some(write) = &solve.write_tour {
        log::info!("Exporting tour to {:?}.", write);
        export_tour(write, &solved.tour)?;
    }
    if let Some(output) = &solve.output {
        let instance = instance_name(solve.filename.as_deref());
        results::append(&[SolveRow::new(instance, seed, &solved)], output)?;
    }
    Ok(())
}

fn instance_name(filename: Option<&Path>) -> String {
    filename
        .and_then(|f| f.file_stem())
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "random".into())
}

fn set_up_logging() -> Result<(), fern::InitError> {
    std::fs::create_dir_all("logs")?;
    let colors = ColoredLevelConfig::new()
        .warn(Color::Yellow)
        .error(Color::Red);

    let file = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date}][{level}] {message}",
                date = chrono::Local::now().format("%H:%M:%S"),
                level = record.level(),
                message = message
            ));
        })
        .level(log::LevelFilter::Info)
        .chain(fern::log_file(format!(
            "logs/{}.log",
            chrono::Local::now().format("%d%m%Y-%H%M")
        ))?);

    let stderr = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{level}] {message}",
                level = colors.color(record.level()),
                message = message
            ));
        })
        .level(log::LevelFilter::Warn)
        .chain(io::stderr());

    fern::Dispatch::new().chain(file).chain(stderr).apply()?;

    log::info!("Logger set up!");

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    set_up_logging()?;
    let cli = Cli::parse();

    match cli {
        Cli::Solve(solve) => execute_solve(solve)?,
        Cli::Bench(bench) => {
            let mut sampler = Sampler::seeded(bench.seed);
            let vertices = population(
                bench.filename.as_deref(),
                bench.max,
                bench.extent,
                &mut sampler,
            )?;
            let config = BenchConfig {
                instance: instance_name(bench.filename.as_deref()),
                seeds: (0..bench.seeds).map(|i| bench.seed.wrapping_add(i)).collect(),
                sizes: (bench.nodes..=bench.max)
                    .step_by(bench.step.max(1))
                    .collect(),
                params: Params::default().with_timeout_minutes(bench.timeout),
            };
            execute_bench(&vertices, &config, bench.output)?;
        }
        Cli::Gen(gen) => {
            check_extent(gen.extent)?;
            let mut sampler = Sampler::seeded(gen.seed);
            let vertices: Vec<Vertex> = RandomPoints::new(&mut sampler, gen.extent)
                .take(gen.nodes)
                .collect();
            write_points(&gen.output, &vertices)?;
            println!("Wrote {} points to {:?}.", vertices.len(), gen.output);
        }
        Cli::Export(export) => {
            let vertices = read_all(&export.filename)?;
            match &export.output {
                Some(output) => {
                    write_vertex_table(&vertices, BufWriter::new(File::create(output)?))?
                }
                None => {
                    let stdout = io::stdout();
                    write_vertex_table(&vertices, stdout.lock())?
                }
            }
        }
    }
    Ok(())
}
