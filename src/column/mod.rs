//! Column metadata: type mapping and per-column config resolution.

mod mapper;
mod resolver;
mod types;

pub use mapper::map_type;
pub use resolver::resolve_columns;
pub use types::*;
