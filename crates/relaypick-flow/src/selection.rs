//! The location the customer picked, published to the checkout on every click.

use relaypick_core::{Location, LocationId};
use rust_decimal::Decimal;
use tokio::sync::watch;

use crate::fee_book::FeeState;
use crate::mode::DeliveryKind;

/// Event sent to the checkout when a location is picked.
///
/// `fee` is the known fee, or zero while it is unknown; `fee_state` tells the
/// two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChanged {
    pub kind: DeliveryKind,
    pub location: Location,
    pub fee: Decimal,
    pub fee_state: FeeState,
}

#[derive(Debug)]
pub struct SelectionState {
    kind: DeliveryKind,
    selected: Option<LocationId>,
    notify: watch::Sender<Option<SelectionChanged>>,
}

impl SelectionState {
    #[must_use]
    pub fn new(kind: DeliveryKind, notify: watch::Sender<Option<SelectionChanged>>) -> Self {
        Self {
            kind,
            selected: None,
            notify,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<LocationId> {
        self.selected
    }

    /// Records `location` as chosen and notifies the checkout right away,
    /// whether or not its fee has settled.
    pub fn select(&mut self, location: &Location, fee_state: FeeState) -> SelectionChanged {
        self.selected = Some(location.id);
        let event = SelectionChanged {
            kind: self.kind,
            location: location.clone(),
            fee: fee_state.amount().unwrap_or(Decimal::ZERO),
            fee_state,
        };
        if fee_state == FeeState::Pending {
            tracing::debug!(location_id = location.id, "selected before fee settled");
        }
        self.notify.send_replace(Some(event.clone()));
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: LocationId) -> Location {
        Location {
            id,
            name: format!("Relais {id}"),
            address: None,
            city: None,
            region: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn select_records_choice_and_notifies() {
        let (tx, rx) = watch::channel(None);
        let mut selection = SelectionState::new(DeliveryKind::RelayPoint, tx);
        assert_eq!(selection.selected(), None);

        let event = selection.select(&location(4), FeeState::Resolved(Some(Decimal::from(7))));
        assert_eq!(selection.selected(), Some(4));
        assert_eq!(event.fee, Decimal::from(7));
        assert_eq!(rx.borrow().as_ref(), Some(&event));
    }

    #[test]
    fn unresolved_fee_is_reported_as_zero() {
        let (tx, _rx) = watch::channel(None);
        let mut selection = SelectionState::new(DeliveryKind::RelayPoint, tx);
        for state in [
            FeeState::Pending,
            FeeState::NotRequested,
            FeeState::Failed,
            FeeState::Resolved(None),
        ] {
            let event = selection.select(&location(1), state);
            assert_eq!(event.fee, Decimal::ZERO);
            assert_eq!(event.fee_state, state);
        }
    }

    #[test]
    fn selecting_again_replaces_previous_choice() {
        let (tx, rx) = watch::channel(None);
        let mut selection = SelectionState::new(DeliveryKind::Pickup, tx);
        selection.select(&location(1), FeeState::Resolved(Some(Decimal::ZERO)));
        selection.select(&location(2), FeeState::Resolved(Some(Decimal::ZERO)));
        assert_eq!(selection.selected(), Some(2));
        let current = rx.borrow().clone().expect("selection published");
        assert_eq!(current.location.id, 2);
        assert_eq!(current.kind, DeliveryKind::Pickup);
    }

    #[test]
    fn notifying_without_subscribers_does_not_fail() {
        let (tx, rx) = watch::channel(None);
        drop(rx);
        let mut selection = SelectionState::new(DeliveryKind::Pickup, tx);
        let event = selection.select(&location(1), FeeState::Resolved(Some(Decimal::ZERO)));
        assert_eq!(event.location.id, 1);
    }
}
