pub mod client;
pub mod error;
mod fee;
pub mod policy;
pub mod types;

pub use client::{DeliveryClient, Endpoints};
pub use error::ClientError;
pub use fee::FeeQuote;
pub use policy::{action_for_status, failure_action, FailureAction};
pub use types::{ApiEnvelope, DeliveryAddress, FeeRequest, FeeResponse};
