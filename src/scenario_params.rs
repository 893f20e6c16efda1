use std::error::Error;
use std::fs;

use cellnet::params::RecipeParams;

/// Scenario from the YAML file given as first argument, or `default`.
pub fn get_scenario_params(default: RecipeParams) -> Result<RecipeParams, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let params_yaml_str = fs::read_to_string(&path)?;
            log::info!("loading scenario from {}", path);
            Ok(serde_yaml::from_str(&params_yaml_str)?)
        }
        None => Ok(default),
    }
}
