pub mod allocation;
pub mod selection;

pub use allocation::{AllocationResult, FeeShare, ItemShare, allocate};
pub use selection::Selection;
