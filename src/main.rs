use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use altroute::{output, Graph, LandmarkTables, NodeId, Route};
use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] altroute::loader::LoadError);

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The path to the node file
    #[arg(long, default_value = "noder.txt")]
    nodes: PathBuf,

    /// The path to the edge file
    #[arg(long, default_value = "kanter.txt")]
    edges: PathBuf,

    /// Log more details (repeat for even more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a route with Dijkstra's algorithm, and then with ALT
    Route {
        /// Id of the start node
        #[arg(long)]
        from: NodeId,

        /// Id of the end node
        #[arg(long)]
        to: NodeId,

        #[command(flatten)]
        landmarks: LandmarkArgs,

        /// The path to the landmark cache; created if it doesn't exist
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Where to save coordinates of the route found by Dijkstra's algorithm
        #[arg(long)]
        dijkstra_path: Option<PathBuf>,

        /// Where to save coordinates of the route found by ALT
        #[arg(long)]
        alt_path: Option<PathBuf>,
    },

    /// Compute landmark tables and save them, replacing any existing cache
    Preprocess {
        #[command(flatten)]
        landmarks: LandmarkArgs,

        /// The path to the landmark cache
        #[arg(long)]
        cache: PathBuf,
    },

    /// List the closest points of interest of a given category
    Nearest {
        /// The path to the point-of-interest file
        #[arg(long, default_value = "interessepkt.txt")]
        pois: PathBuf,

        /// Id of the start node
        #[arg(long)]
        from: NodeId,

        /// Point-of-interest category (e.g. 2 for fuel stations, 4 for charging stations)
        #[arg(long)]
        category: u32,
    },
}

#[derive(clap::Args)]
struct LandmarkArgs {
    /// Id of a landmark node; may be repeated. If not provided,
    /// landmarks are picked automatically.
    #[arg(long = "landmark")]
    ids: Vec<NodeId>,

    /// Number of automatically picked landmarks
    #[arg(long, default_value_t = 4)]
    landmark_count: usize,
}

impl LandmarkArgs {
    fn resolve(&self, g: &Graph, initial: NodeId) -> Result<Vec<NodeId>, altroute::PreprocessError> {
        if self.ids.is_empty() {
            altroute::farthest_landmarks(g, self.landmark_count, initial)
        } else {
            Ok(self.ids.clone())
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut g = load_graph(&cli.nodes, &cli.edges)?;

    match cli.command {
        Command::Route {
            from,
            to,
            landmarks,
            cache,
            dijkstra_path,
            alt_path,
        } => {
            let mut ctx = altroute::SearchContext::new(g.len());

            let start = Instant::now();
            let route = altroute::find_route(&g, &mut ctx, from, to)?;
            print_route("Dijkstra", &g, route.as_ref(), start.elapsed(), dijkstra_path)?;

            let tables = match cache {
                Some(path) => load_or_build_tables(&g, &path, &landmarks, from)?,
                None => LandmarkTables::build(&g, &landmarks.resolve(&g, from)?)?,
            };

            let start = Instant::now();
            let route = altroute::find_route_alt(&g, &mut ctx, &tables, from, to)?;
            println!();
            print_route("ALT", &g, route.as_ref(), start.elapsed(), alt_path)?;
        }

        Command::Preprocess { landmarks, cache } => {
            let initial = g.iter().next().map(|n| n.id).unwrap_or(0);
            let tables = LandmarkTables::build(&g, &landmarks.resolve(&g, initial)?)?;
            tables.write_file(&cache)?;
        }

        Command::Nearest {
            pois,
            from,
            category,
        } => {
            altroute::loader::apply_pois_from_file(&mut g, &pois)
                .map_err(|e| GraphLoadError(pois.clone(), e))?;

            let mut ctx = altroute::SearchContext::new(g.len());
            let found = altroute::find_nearest_of_category(&g, &mut ctx, from, category)?;

            println!(
                "{} closest nodes of category {} from {}",
                found.len(),
                category,
                from
            );
            for id in found {
                let node = g.node(id);
                println!(
                    "{},{}\t{}",
                    node.lat,
                    node.lon,
                    output::format_driving_time(ctx.distance(id))
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = colog::default_builder();
    builder.filter_level(level);
    builder.init();
}

fn load_graph(nodes: &Path, edges: &Path) -> Result<Graph, GraphLoadError> {
    let nodes_list = altroute::loader::load_nodes_from_file(nodes)
        .map_err(|e| GraphLoadError(nodes.to_path_buf(), e))?;
    let edges_list = altroute::loader::load_edges_from_file(edges)
        .map_err(|e| GraphLoadError(edges.to_path_buf(), e))?;

    let g = Graph::new(nodes_list, edges_list)
        .map_err(|e| GraphLoadError(edges.to_path_buf(), e.into()))?;
    info!("loaded graph with {} nodes and {} edges", g.len(), g.edge_count());
    Ok(g)
}

/// Reads landmark tables from `cache`. If the cache is missing, unreadable
/// or was built for a different graph, the tables are recomputed and saved.
fn load_or_build_tables(
    g: &Graph,
    cache: &Path,
    landmarks: &LandmarkArgs,
    initial: NodeId,
) -> Result<LandmarkTables, Box<dyn Error>> {
    match LandmarkTables::read_file(cache) {
        Ok(Some(tables)) => match tables.check_width(g) {
            Ok(()) => return Ok(tables),
            Err(e) => warn!("{}: {} - recomputing landmark tables", cache.display(), e),
        },
        Ok(None) => info!("{}: no landmark cache", cache.display()),
        Err(e) => warn!("{}: {} - recomputing landmark tables", cache.display(), e),
    }

    let tables = LandmarkTables::build(g, &landmarks.resolve(g, initial)?)?;
    tables.write_file(cache)?;
    Ok(tables)
}

fn print_route(
    title: &str,
    g: &Graph,
    route: Option<&Route>,
    elapsed: Duration,
    path_file: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    println!("{}", title);
    println!("------------");

    let Some(route) = route else {
        println!("Path not found");
        return Ok(());
    };

    println!("Runtime:\t{} ms", elapsed.as_millis());
    println!("Driving time:\t{}", output::format_driving_time(route.distance));
    println!("Settled:\t{}", route.settled);

    if let Some(path) = path_file {
        let f = File::create(&path)?;
        output::write_coordinates(BufWriter::new(f), &route.coordinates(g))?;
        info!("saved route to {}", path.display());
    }

    Ok(())
}
