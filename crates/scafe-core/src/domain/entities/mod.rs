pub mod dependencies;
pub mod materialized;
pub mod options;
pub mod plan;

pub use dependencies::*;
pub use materialized::*;
pub use options::*;
pub use plan::*;
