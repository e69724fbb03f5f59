//! Delivery mode switcher for the order-confirmation step.
//!
//! Home delivery shows an address form; store pickup and relay points show a
//! location list with a selection. Pickup is always free and never calls the
//! fee endpoint; relay points are priced by a [`FeeResolver`].

use std::sync::Arc;

use relaypick_client::DeliveryClient;
use relaypick_core::{CartSnapshot, DeliveryMode, LocationId};
use rust_decimal::Decimal;
use tokio::sync::watch;

use crate::directory::{Directory, DirectoryKind};
use crate::error::FlowError;
use crate::fee_book::FeeState;
use crate::resolver::{BatchOutcome, FeeResolver};
use crate::selection::{SelectionChanged, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    Delivery,
    Pickup,
    RelayPoint,
}

impl std::fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryKind::Delivery => write!(f, "home delivery"),
            DeliveryKind::Pickup => write!(f, "store pickup"),
            DeliveryKind::RelayPoint => write!(f, "relay point"),
        }
    }
}

/// Home delivery address as typed by the customer. Its fee is computed by the
/// checkout, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeAddress {
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub phone: String,
}

impl HomeAddress {
    /// Names of the required fields that are still blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("recipient", &self.recipient),
            ("street", &self.street),
            ("city", &self.city),
            ("region", &self.region),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Location list plus selection for pickup or relay-point mode.
pub struct LocationPicker {
    directory: Directory,
    /// `None` in pickup mode, where every location is free.
    resolver: Option<FeeResolver>,
    selection: SelectionState,
}

impl LocationPicker {
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    #[must_use]
    pub fn selected(&self) -> Option<LocationId> {
        self.selection.selected()
    }

    #[must_use]
    pub fn fee_state(&self, id: LocationId) -> FeeState {
        match &self.resolver {
            Some(resolver) => resolver.fee_state(id),
            None => FeeState::Resolved(Some(Decimal::ZERO)),
        }
    }

    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.resolver
            .as_ref()
            .is_some_and(FeeResolver::is_session_expired)
    }

    async fn resolve_fees(&self) -> Option<BatchOutcome> {
        let resolver = self.resolver.as_ref()?;
        Some(resolver.resolve(self.directory.locations()).await)
    }
}

enum ActiveMode {
    Delivery(HomeAddress),
    Pickup(LocationPicker),
    RelayPoint(LocationPicker),
}

impl ActiveMode {
    fn kind(&self) -> DeliveryKind {
        match self {
            ActiveMode::Delivery(_) => DeliveryKind::Delivery,
            ActiveMode::Pickup(_) => DeliveryKind::Pickup,
            ActiveMode::RelayPoint(_) => DeliveryKind::RelayPoint,
        }
    }

    fn picker(&self) -> Option<&LocationPicker> {
        match self {
            ActiveMode::Delivery(_) => None,
            ActiveMode::Pickup(p) | ActiveMode::RelayPoint(p) => Some(p),
        }
    }

    fn picker_mut(&mut self) -> Option<&mut LocationPicker> {
        match self {
            ActiveMode::Delivery(_) => None,
            ActiveMode::Pickup(p) | ActiveMode::RelayPoint(p) => Some(p),
        }
    }
}

/// Delivery step of the checkout. Starts in home-delivery mode; only
/// [`CheckoutDelivery::switch_mode`] changes mode.
pub struct CheckoutDelivery {
    client: Arc<DeliveryClient>,
    cart: Option<CartSnapshot>,
    modes: Vec<DeliveryMode>,
    active: ActiveMode,
    notify: watch::Sender<Option<SelectionChanged>>,
}

impl CheckoutDelivery {
    #[must_use]
    pub fn new(client: Arc<DeliveryClient>) -> Self {
        let (notify, _) = watch::channel(None);
        Self {
            client,
            cart: None,
            modes: Vec::new(),
            active: ActiveMode::Delivery(HomeAddress::default()),
            notify,
        }
    }

    /// Receiver for the selection events sent to the checkout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SelectionChanged>> {
        self.notify.subscribe()
    }

    #[must_use]
    pub fn kind(&self) -> DeliveryKind {
        self.active.kind()
    }

    #[must_use]
    pub fn picker(&self) -> Option<&LocationPicker> {
        self.active.picker()
    }

    /// `true` once a fee request was refused for authorization; the customer
    /// has to sign in again.
    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.active
            .picker()
            .is_some_and(LocationPicker::session_expired)
    }

    /// The home-delivery address form.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NoAddressForm`] outside home-delivery mode.
    pub fn address_mut(&mut self) -> Result<&mut HomeAddress, FlowError> {
        match &mut self.active {
            ActiveMode::Delivery(address) => Ok(address),
            other => Err(FlowError::NoAddressForm(other.kind())),
        }
    }

    /// Switches to `kind`, mounting a fresh selector: a new directory load, no
    /// selection, and a new fee book for relay points. Switching to the active
    /// mode does nothing.
    ///
    /// Returns the fee batch run for relay points.
    pub async fn switch_mode(&mut self, kind: DeliveryKind) -> Option<BatchOutcome> {
        if kind == self.kind() {
            return None;
        }
        tracing::info!(from = %self.kind(), to = %kind, "switching delivery mode");
        self.notify.send_replace(None);

        self.active = match kind {
            DeliveryKind::Delivery => ActiveMode::Delivery(HomeAddress::default()),
            DeliveryKind::Pickup => ActiveMode::Pickup(self.mount_picker(kind, None).await),
            DeliveryKind::RelayPoint => {
                let resolver = FeeResolver::new(
                    Arc::clone(&self.client),
                    self.cart.clone(),
                    self.modes.clone(),
                );
                ActiveMode::RelayPoint(self.mount_picker(kind, Some(resolver)).await)
            }
        };
        self.refresh_fees().await
    }

    /// Hands a new cart to the active selector and quotes whatever it
    /// invalidated. `None` clears the cart; relay fees are then skipped.
    pub async fn update_cart(&mut self, cart: Option<CartSnapshot>) -> Option<BatchOutcome> {
        self.cart.clone_from(&cart);
        if let Some(resolver) = self.active.picker().and_then(|p| p.resolver.as_ref()) {
            resolver.update_cart(cart);
        }
        self.refresh_fees().await
    }

    /// Hands new delivery modes to the active selector and quotes locations
    /// that were skipped for lack of them.
    pub async fn set_delivery_modes(&mut self, modes: Vec<DeliveryMode>) -> Option<BatchOutcome> {
        self.modes.clone_from(&modes);
        if let Some(resolver) = self.active.picker().and_then(|p| p.resolver.as_ref()) {
            resolver.update_modes(modes);
        }
        self.refresh_fees().await
    }

    /// Runs a fee batch for the relay-point list; `None` in other modes.
    pub async fn refresh_fees(&self) -> Option<BatchOutcome> {
        self.active.picker()?.resolve_fees().await
    }

    #[must_use]
    pub fn fee_state(&self, id: LocationId) -> FeeState {
        self.active
            .picker()
            .map_or(FeeState::NotRequested, |p| p.fee_state(id))
    }

    /// Selects a location of the active list and notifies the checkout.
    ///
    /// # Errors
    ///
    /// - [`FlowError::NoLocationSelector`] in home-delivery mode.
    /// - [`FlowError::UnknownLocation`] if `id` is not in the loaded list.
    pub fn select(&mut self, id: LocationId) -> Result<SelectionChanged, FlowError> {
        let kind = self.kind();
        let picker = self
            .active
            .picker_mut()
            .ok_or(FlowError::NoLocationSelector(kind))?;
        let location = picker
            .directory
            .find(id)
            .cloned()
            .ok_or(FlowError::UnknownLocation(id))?;
        let fee_state = picker.fee_state(id);
        Ok(picker.selection.select(&location, fee_state))
    }

    async fn mount_picker(
        &self,
        kind: DeliveryKind,
        resolver: Option<FeeResolver>,
    ) -> LocationPicker {
        let directory_kind = match kind {
            DeliveryKind::RelayPoint => DirectoryKind::RelayPoints,
            DeliveryKind::Pickup | DeliveryKind::Delivery => DirectoryKind::Stores,
        };
        let mut directory = Directory::new(directory_kind);
        directory.load(&self.client).await;
        LocationPicker {
            directory,
            resolver,
            selection: SelectionState::new(kind, self.notify.clone()),
        }
    }
}
