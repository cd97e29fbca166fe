pub mod confirm;
pub mod rename;

pub use confirm::*;
pub use rename::*;
