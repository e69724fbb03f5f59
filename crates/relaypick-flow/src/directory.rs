//! Candidate locations for pickup or relay delivery, loaded once per mount.

use relaypick_client::DeliveryClient;
use relaypick_core::{Location, LocationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    Stores,
    RelayPoints,
}

impl std::fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryKind::Stores => write!(f, "stores"),
            DirectoryKind::RelayPoints => write!(f, "relay points"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryState {
    Loading,
    Empty,
    Populated(Vec<Location>),
}

#[derive(Debug, Clone)]
pub struct Directory {
    kind: DirectoryKind,
    state: DirectoryState,
}

impl Directory {
    #[must_use]
    pub fn new(kind: DirectoryKind) -> Self {
        Self {
            kind,
            state: DirectoryState::Loading,
        }
    }

    #[must_use]
    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    /// Fetches the locations if this directory has not loaded yet.
    ///
    /// Failures are logged and leave the directory empty; there is no retry.
    pub async fn load(&mut self, client: &DeliveryClient) -> &DirectoryState {
        if self.state != DirectoryState::Loading {
            return &self.state;
        }

        let result = match self.kind {
            DirectoryKind::Stores => client.list_stores().await,
            DirectoryKind::RelayPoints => client.list_relay_points().await,
        };

        self.state = match result {
            Ok(locations) if locations.is_empty() => DirectoryState::Empty,
            Ok(locations) => {
                tracing::debug!(kind = %self.kind, count = locations.len(), "directory loaded");
                DirectoryState::Populated(locations)
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "failed to load directory");
                DirectoryState::Empty
            }
        };
        &self.state
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        match &self.state {
            DirectoryState::Populated(locations) => locations,
            DirectoryState::Loading | DirectoryState::Empty => &[],
        }
    }

    #[must_use]
    pub fn find(&self, id: LocationId) -> Option<&Location> {
        self.locations().iter().find(|l| l.id == id)
    }
}
