pub mod datasets;
pub mod evaluation;
pub mod features;
pub mod models;
pub mod results;
pub mod training;

pub use datasets::*;
pub use evaluation::*;
pub use features::*;
pub use models::*;
pub use results::*;
pub use training::*;
