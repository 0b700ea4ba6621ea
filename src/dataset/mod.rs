mod load;
mod model;
mod parse;

pub use load::load_dataset;
#[cfg(test)]
pub(crate) use model::fixtures;
pub use model::{Dataset, Entity, Relation};
