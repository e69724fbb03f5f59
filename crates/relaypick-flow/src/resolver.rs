//! Relay-point fee resolution.
//!
//! [`FeeResolver::resolve`] claims every location that has no fee for the
//! current cart yet, then quotes them all concurrently. Each quote goes through
//! [`DeliveryClient::quote_fee`] (store pricing, then default pricing on
//! 400/422) and settles its own entry in the [`FeeBook`].
//!
//! An authorization failure on any quote expires the session: the pending
//! fallback attempts are skipped, later batches are refused, and late answers
//! for other locations are dropped, leaving them `Pending`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use relaypick_client::{failure_action, DeliveryClient, FailureAction, FeeRequest};
use relaypick_core::{
    relay_pricing_mode, CartItem, CartSnapshot, DeliveryMode, Location, LocationId, ModeId,
};
use rust_decimal::Decimal;

use crate::fee_book::{FeeBook, FeeState};

/// Why a batch was not run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No cart, a zero total, or no cart lines.
    CartNotPriceable,
    NoDeliveryModes,
    SessionExpired,
}

/// Tally of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Locations claimed and quoted in this batch.
    pub requested: usize,
    pub resolved: usize,
    pub failed: usize,
    /// Answers dropped because the cart changed or the session expired meanwhile.
    pub discarded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Skipped(SkipReason),
    Ran(BatchReport),
}

enum Settled {
    Resolved,
    Failed,
    Discarded,
}

#[derive(Debug, Default)]
struct Inputs {
    cart: Option<CartSnapshot>,
    modes: Vec<DeliveryMode>,
}

struct Priced {
    total: Decimal,
    items: Vec<CartItem>,
    mode: ModeId,
}

pub struct FeeResolver {
    client: Arc<DeliveryClient>,
    book: Mutex<FeeBook>,
    inputs: Mutex<Inputs>,
    session_expired: AtomicBool,
}

impl FeeResolver {
    #[must_use]
    pub fn new(
        client: Arc<DeliveryClient>,
        cart: Option<CartSnapshot>,
        modes: Vec<DeliveryMode>,
    ) -> Self {
        Self {
            client,
            book: Mutex::new(FeeBook::new()),
            inputs: Mutex::new(Inputs { cart, modes }),
            session_expired: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn fee_state(&self, id: LocationId) -> FeeState {
        self.book().state(id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.book().pending_count()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.book().generation()
    }

    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        self.session_expired.load(Ordering::SeqCst)
    }

    /// Replaces the cart. A different cart starts a new generation: every fee
    /// must be quoted again and answers still in flight are dropped.
    ///
    /// Returns `true` when the cart actually changed.
    pub fn update_cart(&self, cart: Option<CartSnapshot>) -> bool {
        let mut inputs = self.inputs();
        if inputs.cart == cart {
            return false;
        }
        inputs.cart = cart;
        let generation = self.book().advance_generation();
        tracing::debug!(generation, "cart changed, fee book invalidated");
        true
    }

    /// Replaces the delivery modes. Fees already settled are kept.
    pub fn update_modes(&self, modes: Vec<DeliveryMode>) {
        self.inputs().modes = modes;
    }

    /// Quotes every location in `locations` that has no fee for the current
    /// cart and no request in flight, and waits for all of them.
    pub async fn resolve(&self, locations: &[Location]) -> BatchOutcome {
        let priced = match self.priced_inputs() {
            Ok(priced) => priced,
            Err(reason) => {
                tracing::debug!(?reason, "fee resolution skipped");
                return BatchOutcome::Skipped(reason);
            }
        };

        let claimed: Vec<(&Location, u64)> = {
            let mut book = self.book();
            locations
                .iter()
                .filter_map(|loc| book.try_begin(loc.id).map(|generation| (loc, generation)))
                .collect()
        };

        let settled = join_all(
            claimed
                .iter()
                .map(|(location, generation)| self.resolve_one(location, *generation, &priced)),
        )
        .await;

        let mut report = BatchReport {
            requested: claimed.len(),
            ..BatchReport::default()
        };
        for outcome in settled {
            match outcome {
                Settled::Resolved => report.resolved += 1,
                Settled::Failed => report.failed += 1,
                Settled::Discarded => report.discarded += 1,
            }
        }
        tracing::info!(
            requested = report.requested,
            resolved = report.resolved,
            failed = report.failed,
            discarded = report.discarded,
            "fee batch finished"
        );
        BatchOutcome::Ran(report)
    }

    async fn resolve_one(&self, location: &Location, generation: u64, priced: &Priced) -> Settled {
        if self.is_session_expired() {
            return Settled::Discarded;
        }

        let request =
            FeeRequest::for_location(location, priced.total, priced.mode.clone(), &priced.items);
        let (state, expired_here) = match self
            .client
            .quote_fee(&request, &self.session_expired)
            .await
        {
            Ok(quote) => {
                tracing::debug!(
                    location_id = location.id,
                    fee = ?quote.fee,
                    fallback = quote.used_fallback,
                    "fee resolved"
                );
                (FeeState::Resolved(quote.fee), false)
            }
            Err(err) => {
                let action = failure_action(&err);
                let expired_here = action == FailureAction::FailSession
                    && !self.session_expired.swap(true, Ordering::SeqCst);
                if action == FailureAction::FailSession {
                    tracing::warn!(
                        location_id = location.id,
                        error = %err,
                        "authorization rejected, halting fee resolution"
                    );
                } else {
                    tracing::warn!(
                        location_id = location.id,
                        error = %err,
                        "fee resolution failed"
                    );
                }
                (FeeState::Failed, expired_here)
            }
        };

        // Once the session is gone only the request that expired it is recorded.
        if self.is_session_expired() && !expired_here {
            return Settled::Discarded;
        }

        if self.book().complete(location.id, generation, state) {
            match state {
                FeeState::Failed => Settled::Failed,
                _ => Settled::Resolved,
            }
        } else {
            tracing::debug!(location_id = location.id, generation, "stale fee answer dropped");
            Settled::Discarded
        }
    }

    fn priced_inputs(&self) -> Result<Priced, SkipReason> {
        if self.is_session_expired() {
            return Err(SkipReason::SessionExpired);
        }
        let inputs = self.inputs();
        let cart = inputs.cart.as_ref().ok_or(SkipReason::CartNotPriceable)?;
        let total = cart.priceable_total().ok_or(SkipReason::CartNotPriceable)?;
        if inputs.modes.is_empty() {
            return Err(SkipReason::NoDeliveryModes);
        }
        Ok(Priced {
            total,
            items: cart.items.clone(),
            mode: relay_pricing_mode(&inputs.modes),
        })
    }

    fn book(&self) -> MutexGuard<'_, FeeBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn inputs(&self) -> MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
