mod answer;
mod dedup;
mod error;
mod fewshot;
mod negatives;
mod pairing;
mod ports;
mod prompt;
mod rank;
mod split;
mod tree;
mod types;

pub use answer::*;
pub use dedup::*;
pub use error::*;
pub use fewshot::*;
pub use negatives::*;
pub use pairing::*;
pub use ports::*;
pub use prompt::*;
pub use rank::*;
pub use split::*;
pub use tree::*;
pub use types::*;
