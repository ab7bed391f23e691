use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use floornav_cli::commands::features::{handle_features_command, FeatureTarget};
use floornav_cli::commands::graph::{handle_graph_command, handle_stats_command};
use floornav_cli::commands::route::{
    handle_alternatives_command, handle_distance_command, handle_route_command, RouteCommandArgs,
};
use floornav_cli::logging::{init_logging, LoggingConfig};
use floornav_cli::output::OutputFormat;
use floornav_cli::terminal::ColorPalette;
use floornav_lib::{
    load_floor_plan, DoorWeight, GraphBuildOptions, NavigationContext, DEFAULT_MAX_RESULTS,
    DEFAULT_PATH_CUTOFF,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest routes between rooms on a floor plan")]
struct Cli {
    /// Floor description (JSON) to load.
    #[arg(long, env = "FLOORNAV_FLOOR", global = true)]
    floor: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable ANSI colors in text output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(flatten)]
    graph: GraphArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Rooms closer than this get an inferred corridor.
    #[arg(long, global = true)]
    corridor_threshold: Option<f64>,

    /// Multiplier applied to inferred corridor lengths.
    #[arg(long, global = true, allow_negative_numbers = true)]
    corridor_penalty: Option<f64>,

    /// Door cost: a fixed number, or `center` for the distance between room centers.
    #[arg(
        long,
        global = true,
        allow_negative_numbers = true,
        value_parser = parse_door_weight
    )]
    door_weight: Option<DoorWeight>,
}

impl GraphArgs {
    fn to_options(&self) -> GraphBuildOptions {
        let defaults = GraphBuildOptions::default();
        GraphBuildOptions {
            corridor_threshold: self.corridor_threshold.unwrap_or(defaults.corridor_threshold),
            corridor_penalty: self.corridor_penalty.unwrap_or(defaults.corridor_penalty),
            door_weight: self.door_weight.unwrap_or(defaults.door_weight),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two rooms.
    Route {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Search algorithm: dijkstra, astar or bfs.
        #[arg(long, default_value = "dijkstra")]
        algorithm: String,
        /// Always reweight with Johnson's algorithm before searching.
        #[arg(long, conflicts_with = "algorithm")]
        johnson: bool,
        /// Print turn-by-turn directions after the route.
        #[arg(long)]
        directions: bool,
    },
    /// List alternative simple routes, fewest hops first.
    Alternatives {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
        /// Longest route considered, in hops.
        #[arg(long, default_value_t = DEFAULT_PATH_CUTOFF)]
        cutoff: usize,
    },
    /// Print the shortest weighted distance, or -1 when unreachable.
    Distance {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
    /// Summarise the graph built from the floor.
    Stats,
    /// Report accessibility and layout metrics.
    Features {
        /// Describe a single room.
        #[arg(long, conflicts_with = "path")]
        room: Option<String>,
        /// Describe a comma-separated route, e.g. 101,102,104.
        #[arg(long, value_delimiter = ',')]
        path: Option<Vec<String>>,
    },
    /// Dump the adjacency list.
    Graph,
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let cli = Cli::parse();

    let floor_path = cli
        .floor
        .context("no floor description given; pass --floor or set FLOORNAV_FLOOR")?;
    let floor = load_floor_plan(&floor_path)
        .with_context(|| format!("failed to load floor from {}", floor_path.display()))?;
    let context = NavigationContext::load(floor, cli.graph.to_options())
        .context("failed to build the floor graph")?;
    let state = context.snapshot();

    let palette = if cli.no_color {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };

    match cli.command {
        Command::Route {
            from,
            to,
            algorithm,
            johnson,
            directions,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                algorithm,
                johnson,
                directions,
            };
            handle_route_command(&state, cli.format, &palette, &args)
        }
        Command::Alternatives {
            from,
            to,
            max_results,
            cutoff,
        } => handle_alternatives_command(&state, cli.format, &from, &to, max_results, cutoff),
        Command::Distance { from, to } => handle_distance_command(&state, cli.format, &from, &to),
        Command::Stats => handle_stats_command(&state, cli.format),
        Command::Features { room, path } => {
            let target = match (room, path) {
                (Some(room), _) => FeatureTarget::Room(room),
                (None, Some(path)) => FeatureTarget::Path(path),
                (None, None) => FeatureTarget::Floor,
            };
            handle_features_command(&state, cli.format, &target)
        }
        Command::Graph => handle_graph_command(&state, cli.format),
    }
}

fn parse_door_weight(value: &str) -> Result<DoorWeight, String> {
    if value.eq_ignore_ascii_case("center") {
        return Ok(DoorWeight::CenterDistance);
    }
    value
        .parse::<f64>()
        .map(DoorWeight::Constant)
        .map_err(|_| format!("expected a number or `center`, got `{value}`"))
}
