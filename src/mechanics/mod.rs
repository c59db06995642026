pub mod ladder;
pub mod linalg;
pub mod stoch;

pub use ladder::*;
pub use linalg::*;
pub use stoch::*;
