//! Delivery-mode selection for checkout: directory loading, relay-point fee
//! resolution, and the selection reported back to the checkout.

pub mod directory;
pub mod display;
pub mod error;
pub mod fee_book;
pub mod mode;
pub mod resolver;
pub mod selection;

pub use directory::{Directory, DirectoryKind, DirectoryState};
pub use error::FlowError;
pub use fee_book::{FeeBook, FeeState};
pub use mode::{CheckoutDelivery, DeliveryKind, HomeAddress, LocationPicker};
pub use resolver::{BatchOutcome, BatchReport, FeeResolver, SkipReason};
pub use selection::{SelectionChanged, SelectionState};
