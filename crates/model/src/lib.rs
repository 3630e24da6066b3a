pub mod document;
pub mod node;
pub mod query;

pub use document::{DocumentError, TreeDocument};
pub use node::Node;
pub use query::NodeQuery;
