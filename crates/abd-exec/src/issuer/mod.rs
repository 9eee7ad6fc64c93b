mod local;
pub use local::LocalIssuer;
