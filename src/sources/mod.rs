pub mod factory;
pub mod http;
pub mod memory;
pub mod traits;

pub use factory::{build_sources, SignalSources};
pub use traits::{FinancialSource, MarketSource, TranscriptAnalyst};
