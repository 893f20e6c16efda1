use std::error::Error;

use cellnet::io_network::IoNetworkRecipe;
use cellnet::params::{IoNetworkParams, RecipeParams};
use cellnet::types::JunctionDraw;
use cellnet::{Recipe, RecipeSummary};
use simple_error::SimpleError;

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let params = match scenario_params::get_scenario_params(RecipeParams::IoNetwork(
        IoNetworkParams::default(),
    ))? {
        RecipeParams::IoNetwork(params) => params,
        RecipeParams::Brunel(_) => {
            return Err(SimpleError::new("expected an IO network scenario").into())
        }
    };

    let recipe = IoNetworkRecipe::new(params)?;

    let mut skipped = 0;
    for gid in 0..recipe.num_cells() {
        let bridge = if recipe.is_bridge(gid) { " (bridge)" } else { "" };

        for draw in recipe.draw_gap_junctions(gid) {
            match draw {
                JunctionDraw::Accepted(junction) => println!(
                    "{}{} -> {} [{} - {}]",
                    gid, bridge, junction.peer_a.gid, junction.peer_b.label, junction.peer_a.label
                ),
                JunctionDraw::OutOfRange { .. } => skipped += 1,
            }
        }
    }

    let summary = RecipeSummary::collect(&recipe);

    println!("recipe summary:");
    println!("...cells: {}", summary.num_cells);
    println!("...gap junctions: {}", summary.num_gap_junctions);
    println!("...skipped peers: {}", skipped);
    println!("...probes: {}", summary.num_probes);

    Ok(())
}
