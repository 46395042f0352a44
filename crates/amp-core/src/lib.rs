pub mod chain;
mod discovery;
pub mod engine;
pub mod error;
pub mod host;
pub mod registry;
pub mod surface;

pub use chain::*;
pub use engine::*;
pub use error::*;
pub use host::*;
pub use registry::*;
pub use surface::*;
