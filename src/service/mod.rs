//! TableBuildService: grid pipeline over pluggable introspection and execution.

mod grid;
pub use grid::{prepare, BuildResult, GridData, PreparedGrid, QueryMutator, TableBuildService};
