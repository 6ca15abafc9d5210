pub mod dataset;
pub mod split;
pub mod settings;
pub mod scores;
pub mod error;

pub use dataset::*;
pub use split::*;
pub use settings::*;
pub use scores::*;
pub use error::*;
