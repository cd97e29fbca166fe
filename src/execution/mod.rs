//! Execution Engine Module
//!
//! Validates rename plans against a snapshot of the target directory and
//! applies the accepted operations one at a time, in plan order.
//!
//! # Flow
//!
//! `DirectorySnapshot` + `RenamePlan` -> `PlanValidator` -> `ValidationReport`
//! -> `Decision` -> `PlanExecutor` -> `ExecutionResult`

pub mod decision;
pub mod executor;
pub mod fs_probe;
pub mod snapshot;
pub mod validator;

pub use decision::*;
pub use executor::*;
pub use fs_probe::*;
pub use snapshot::*;
pub use validator::*;
