pub mod brunel;
pub mod cable;
pub mod error;
pub mod io_network;
pub mod params;
pub mod recipe;
pub mod sampling;
pub mod schedule;
pub mod single_cell;
pub mod types;

mod util;

pub use error::{RecipeError, RecipeResult};
pub use recipe::{Recipe, RecipeSummary};
