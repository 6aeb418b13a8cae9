pub mod compiler;
pub mod domain;
pub mod formula;
pub mod parser;
pub mod plan;
pub mod problem;
pub mod state;
pub mod types;
pub mod utils;

pub use domain::Domain;
pub use plan::Plan;
pub use problem::Problem;
pub use state::State;
