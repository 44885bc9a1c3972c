mod config;
mod model;
mod mutation;
mod reader;
mod region;

pub use config::{CnConfig, CnConfigKind, CnVector};
pub use model::Gene;
pub use mutation::Mutation;
pub use region::{GeneRegion, RegionSpan, PCE_REGION};
