pub mod axis;
pub mod context;
pub mod macros;
pub mod query;
pub mod record;

pub use axis::*;
pub use context::*;
pub use query::*;
pub use record::*;
