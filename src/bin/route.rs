/// Route tool
///
/// Compares search strategies between two locations of a saved road network.
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;

use route_search::logging;
use route_search::problems::route::RouteProblem;
use route_search::runner;
use route_search::runner::Comparison;
use route_search::runner::Strategy;
use route_search::snapshot;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = route_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Road network snapshot
    #[arg(short, long, env = "ROUTE_SEARCH_GRAPH")]
    pub graph: PathBuf,

    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,

    /// ucs, astar[:heuristic], greedy[:heuristic] or dfs. Repeat to run
    /// several, defaults to ucs, astar, greedy and dfs.
    ///
    /// dfs tries every simple path when the destination is unreachable,
    /// which can take very long on large networks. Leave it out there.
    #[arg(short, long = "strategy")]
    pub strategies: Vec<Strategy>,

    /// Write the comparison as JSON here
    #[arg(short, long, env = "ROUTE_SEARCH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print how much memory each search used
    #[arg(long)]
    pub memory_stats: bool,

    #[arg(long, env = "ROUTE_SEARCH_LOG", default_value = "info")]
    pub log_level: String,
    /// Log to rotating files in this directory instead of stderr
    #[arg(long, env = "ROUTE_SEARCH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn print_comparison(comparison: &Comparison) {
    println!(
        "{} {} {}",
        comparison.start.bold(),
        "->".dimmed(),
        comparison.goal.bold()
    );
    println!(
        "{:<16} {:>8} {:>12} {:>10} {:>12}",
        "Algorithm", "Success", "Miles", "Expanded", "Time (ms)"
    );
    for result in &comparison.results {
        let r = &result.report;
        let success = if r.success {
            format!("{:>8}", "yes").green().to_string()
        } else {
            format!("{:>8}", "no").red().to_string()
        };
        let miles = if r.success {
            format!("{:.2}", r.total_distance)
        } else {
            "N/A".to_string()
        };
        println!(
            "{:<16} {success} {miles:>12} {:>10} {:>12.2}",
            r.algorithm, r.nodes_expanded, r.execution_time_ms
        );
        if r.success {
            println!("  {}", r.path.join(" → ").dimmed());
        }
    }
}

fn print_summary(comparison: &Comparison) {
    println!();
    println!("{}", "Comparison".bold());

    let ucs = Strategy::UniformCost;
    for result in &comparison.results {
        let strategy = result.strategy;
        if strategy == ucs {
            continue;
        }
        if let Strategy::AStar(_) = strategy
            && let Some(savings) = comparison.expansion_savings(ucs, strategy)
        {
            println!(
                "- {} saved {:.1}% of UCS's expansions",
                result.report.algorithm,
                savings.yellow()
            );
        }
        match comparison.excess_over_optimal(strategy) {
            Some(excess) if excess > 0.0 => println!(
                "- {} is {:.1}% longer than optimal",
                result.report.algorithm,
                excess.red()
            ),
            Some(_) => println!("- {} found an optimal route", result.report.algorithm),
            None => {}
        }
    }
    if let Some(optimal) = comparison.optimal_distance() {
        println!("- Optimal route: {:.2} miles", optimal.green());
    }
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    args.color.write_global();
    let _logger =
        logging::init(&args.log_level, args.log_dir.as_deref()).map_err(std::io::Error::other)?;

    let network = snapshot::load(&args.graph).map_err(std::io::Error::other)?;
    println!("Loaded {} from {:?}", network, args.graph.yellow());

    let strategies = if args.strategies.is_empty() {
        Comparison::default_lineup()
    } else {
        args.strategies.clone()
    };
    let comparison = runner::compare(&network, &args.from, &args.to, &strategies)
        .map_err(std::io::Error::other)?;

    print_comparison(&comparison);
    print_summary(&comparison);

    if args.memory_stats {
        let problem =
            RouteProblem::new(&network, &args.from, &args.to).map_err(std::io::Error::other)?;
        for strategy in &strategies {
            println!();
            runner::write_memory_stats(*strategy, &problem, std::io::stdout().lock())?;
        }
    }

    if let Some(output) = &args.output {
        let mut out = BufWriter::new(File::create(output)?);
        serde_json::to_writer_pretty(&mut out, &comparison)?;
        out.flush()?;
        println!("Wrote comparison to {:?}", output.yellow());
    }

    Ok(())
}
