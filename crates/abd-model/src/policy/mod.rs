mod statement;
pub use statement::{Effect, PolicyStatement};

mod document;
pub use document::{AccessPolicy, PolicyTarget};
