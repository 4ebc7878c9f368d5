pub mod holdings;
pub mod irr;
pub mod performance;
mod portfolio_traits;

pub use portfolio_traits::{ActivityScope, PortfolioDataProvider};
