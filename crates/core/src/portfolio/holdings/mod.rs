//! Holdings module - models, lifecycle partitioning and consolidation.

mod consolidation;
mod holdings_model;
mod lifecycle;

pub use consolidation::{approximate_combined_irr, consolidate_previous_funds};
pub use holdings_model::{ConstituentRef, Fund, Holding, HoldingPartition, PreviousFundsHolding};
pub use lifecycle::{is_active, is_inactive, partition_holdings};
