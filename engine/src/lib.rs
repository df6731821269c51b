pub mod circuit;
pub mod components;
pub mod ops;
pub mod quine_mccluskey;
pub mod resolver;
pub mod table;
pub mod types;
mod bootstrap;

pub use circuit::Circuit;
pub use types::{CompKind, Mode, Position, ID, PIN};
