pub mod contract;
pub mod engine;
pub mod irr;
pub mod zoning;

pub use crate::domain::model::{DefaultCosts, IrrParams, IrrResult};
pub use crate::domain::ports::ProFormaService;
pub use crate::utils::error::Result;
