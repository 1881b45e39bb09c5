pub mod fetch;
pub mod summary;

pub use fetch::*;
pub use summary::*;
