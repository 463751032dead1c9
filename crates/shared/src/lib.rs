mod component;
mod error;
mod store;

pub use component::*;
pub use error::*;
pub use store::*;
