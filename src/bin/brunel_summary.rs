use std::error::Error;

use cellnet::brunel::BrunelRecipe;
use cellnet::params::{BrunelParams, RecipeParams};
use cellnet::{Recipe, RecipeSummary};
use simple_error::SimpleError;

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let params =
        match scenario_params::get_scenario_params(RecipeParams::Brunel(BrunelParams::default()))? {
            RecipeParams::Brunel(params) => params,
            RecipeParams::IoNetwork(_) => {
                return Err(SimpleError::new("expected a Brunel scenario").into())
            }
        };

    let recipe = BrunelRecipe::new(params)?;
    let summary = RecipeSummary::collect(&recipe);

    println!("recipe summary:");
    println!("...cells: {}", summary.num_cells);
    println!(
        "...in-degree: {} excitatory, {} inhibitory",
        recipe.in_degree_exc(),
        recipe.in_degree_inh()
    );
    println!(
        "...connections: {} ({} inhibitory)",
        summary.num_connections, summary.num_inhibitory_connections
    );
    println!("...external drive: {} kHz per cell", recipe.lambda());
    println!("...connection checksum: {}", summary.connection_checksum);

    let source_checksum: usize = recipe
        .connections_on(0)
        .iter()
        .map(|connection| connection.source.gid)
        .sum();
    println!("...cell 0 source checksum: {}", source_checksum);

    Ok(())
}
