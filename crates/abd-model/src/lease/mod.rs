mod receipt;
pub use receipt::LeaseReceipt;

mod leased;
pub use leased::LeasedBuild;
