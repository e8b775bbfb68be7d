//! Query plan, join planning and safe SQL rendering: identifiers quoted, values as parameters.

mod builder;
mod join;
pub mod params;
mod plan;

pub use builder::*;
pub use join::plan_joins;
pub use params::*;
pub use plan::*;
