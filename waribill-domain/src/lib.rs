#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{Apportionment, Bill, BillError, ExtraFee, FeeId, Item, ItemId, Money};
pub use services::{AllocationResult, FeeShare, ItemShare, Selection, allocate};
