mod engine;
pub mod format;
pub mod market;
pub mod report;
pub mod scenario;
mod types;

pub use engine::{compute, monthly_mortgage_payment, remaining_mortgage_balance};
pub use market::{MARKETS, MarketDefaults, market_defaults};
pub use report::{DetailedReport, ReportYear, Verdict};
pub use scenario::Scenario;
pub use types::{BuyVsRentInput, BuyVsRentResult, YearlyData};
