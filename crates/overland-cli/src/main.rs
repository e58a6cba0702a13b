//! overland-probe - run the overland movement engine against a scenario file.
//!
//! - `overland-probe grid` - distance map for every cell of both planes
//! - `overland-probe path` - path preview to one destination

mod scenario;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use overland_core::{
    calculate_overland_movement, load_rules, CompiledRules, MovementRequest, OverlandMovement,
    RulesSource,
};
use overland_protocol::{wire, CellDistance, MapCoord, MoveOutcome, Plane};

use crate::scenario::{load_scenario, Scenario};

#[derive(Parser)]
#[command(name = "overland-probe")]
#[command(about = "Overland movement engine probe", version)]
struct Cli {
    /// Rules directory (defaults to the embedded base ruleset)
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the distance grid of both planes
    Grid {
        /// Scenario file (YAML)
        #[arg(short, long)]
        scenario: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the path preview to one destination as JSON
    Path {
        /// Scenario file (YAML)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Destination as `<plane>,<x>,<y>`
        #[arg(long, value_parser = parse_coord)]
        to: MapCoord,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let rules = match &cli.rules {
        Some(dir) => load_rules(RulesSource::Path(dir.display().to_string()))
            .with_context(|| format!("loading rules from {}", dir.display()))?,
        None => load_rules(RulesSource::Embedded).context("loading embedded rules")?,
    };

    match cli.command {
        Commands::Grid { scenario, format } => {
            let scenario = load_scenario(&scenario, &rules)?;
            let movement = run(&rules, &scenario)?;
            match format {
                OutputFormat::Text => print!("{}", render_text(&movement)),
                OutputFormat::Json => {
                    println!("{}", wire::serialize_grids_json(&movement.legacy())?)
                }
            }
            Ok(())
        }
        Commands::Path { scenario, to } => {
            let scenario = load_scenario(&scenario, &rules)?;
            let movement = run(&rules, &scenario)?;
            let preview = movement
                .preview(to)
                .ok_or_else(|| anyhow!("{to} is not reachable from {}", movement.origin()))?;
            println!("{}", wire::serialize_path_preview_json(&preview)?);
            Ok(())
        }
    }
}

fn run(rules: &CompiledRules, scenario: &Scenario) -> Result<OverlandMovement> {
    let mut request = MovementRequest::new(
        &scenario.map,
        &scenario.knowledge,
        &scenario.stack,
        scenario.player,
        scenario.origin,
    )
    .with_spells(&scenario.spells);
    if let Some(budget) = scenario.budget {
        request = request.with_budget(budget);
    }

    let movement = calculate_overland_movement(rules, &request)?;
    tracing::info!(
        origin = %movement.origin(),
        budget = movement.budget(),
        reachable = movement.can_move_in_one_turn().as_slice().iter().filter(|r| **r).count(),
        "movement computed"
    );
    Ok(movement)
}

fn parse_coord(raw: &str) -> Result<MapCoord, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [plane, x, y] = parts.as_slice() else {
        return Err(format!("expected <plane>,<x>,<y>, got `{raw}`"));
    };
    let plane = match plane.to_ascii_lowercase().as_str() {
        "arcanus" | "0" => Plane::Arcanus,
        "myrror" | "1" => Plane::Myrror,
        other => return Err(format!("unknown plane `{other}`")),
    };
    let x = x.parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let y = y.parse().map_err(|e| format!("bad y `{y}`: {e}"))?;
    Ok(MapCoord::new(plane, x, y))
}

fn render_text(movement: &OverlandMovement) -> String {
    let distance = movement.distance();
    let mut out = String::new();
    for plane in Plane::ALL {
        out.push_str(&format!("{plane:?}\n"));
        for y in 0..distance.height() {
            for x in 0..distance.width() {
                let at = MapCoord::new(plane, x, y);
                let value = match movement.distance_at(at) {
                    CellDistance::Impassable => "##".to_string(),
                    CellDistance::Unvisited => "..".to_string(),
                    CellDistance::Settled(cost) => format!("{cost:>2}"),
                };
                let mark = if at == movement.origin() {
                    '@'
                } else {
                    match movement.outcome_at(at) {
                        MoveOutcome::Scout => '?',
                        MoveOutcome::Attack => '!',
                        MoveOutcome::None => ' ',
                    }
                };
                out.push_str(&format!("{value}{mark}"));
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_with_plane_names_or_indices() {
        assert_eq!(
            parse_coord("myrror,20,9"),
            Ok(MapCoord::new(Plane::Myrror, 20, 9))
        );
        assert_eq!(
            parse_coord("0, 3, 4"),
            Ok(MapCoord::new(Plane::Arcanus, 3, 4))
        );
        assert!(parse_coord("2,1,1").is_err());
        assert!(parse_coord("arcanus,1").is_err());
    }

    #[test]
    fn text_grid_marks_origin_and_encounters() {
        let rules = load_rules(RulesSource::Embedded).expect("rules");
        let file = serde_yaml::from_str(include_str!("../scenarios/tower.yaml")).expect("yaml");
        let scenario = scenario::resolve(file, &rules).expect("resolve");
        let movement = run(&rules, &scenario).expect("movement");
        let text = render_text(&movement);

        assert!(text.starts_with("Arcanus\n"));
        assert!(text.contains(" 0@"));
        assert!(text.contains(" 2!"));
        assert!(text.contains(" 2?"));
    }
}
