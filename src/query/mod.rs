pub mod executor;

pub use executor::{Query, SearchExecutor, SearchHit};
