mod cache;
mod compatibility;
#[cfg(test)]
mod fixtures;
mod recommender;
mod score;

pub use cache::*;
pub use compatibility::*;
pub use recommender::*;
pub use score::*;
