pub mod card;
pub mod corpus;
pub mod export;
pub mod models;
pub mod store;

pub use card::*;
pub use corpus::*;
pub use export::*;
pub use models::*;
pub use store::*;
