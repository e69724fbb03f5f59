use relaypick_core::LocationId;
use thiserror::Error;

use crate::mode::DeliveryKind;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("location {0} is not in the current directory")]
    UnknownLocation(LocationId),

    /// The active mode has no location list to pick from.
    #[error("{0} mode has no location selector")]
    NoLocationSelector(DeliveryKind),

    #[error("{0} mode has no address form")]
    NoAddressForm(DeliveryKind),
}
