mod irr_model;
mod recalculation;


pub use irr_model::*;
pub use recalculation::{RecalculationOptions, RecalculationOrchestrator};
