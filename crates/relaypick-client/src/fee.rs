//! Two-attempt fee quote: store-specific pricing, then default pricing.

use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;

use crate::client::DeliveryClient;
use crate::error::ClientError;
use crate::policy::{failure_action, FailureAction};
use crate::types::FeeRequest;

/// A successful fee answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// `None` when the backend answered without either fee field.
    pub fee: Option<Decimal>,
    /// `true` when the store-specific attempt was refused and default pricing
    /// answered instead.
    pub used_fallback: bool,
}

impl DeliveryClient {
    /// Quotes `request`, retrying once with `store_id: null` when the first
    /// attempt is refused with 400 or 422.
    ///
    /// The second attempt is skipped when `halted` is set by the time the
    /// first one fails; the first error is returned instead.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`ClientError`]: the first attempt's error for
    /// anything but 400/422, otherwise the fallback's error. Classify it with
    /// [`failure_action`].
    pub async fn quote_fee(
        &self,
        request: &FeeRequest,
        halted: &AtomicBool,
    ) -> Result<FeeQuote, ClientError> {
        let first = match self.calculate_fee(request).await {
            Ok(response) => {
                return Ok(FeeQuote {
                    fee: response.fee(),
                    used_fallback: false,
                })
            }
            Err(err) => err,
        };

        if failure_action(&first) != FailureAction::RetryWithoutStore
            || halted.load(Ordering::SeqCst)
        {
            return Err(first);
        }

        tracing::warn!(
            store_id = ?request.store_id,
            error = %first,
            "no pricing rule for store, retrying with default pricing"
        );
        let response = self.calculate_fee(&request.without_store()).await?;
        Ok(FeeQuote {
            fee: response.fee(),
            used_fallback: true,
        })
    }
}
