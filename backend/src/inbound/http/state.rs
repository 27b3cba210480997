//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data<HttpState>` and only ever see
//! driving ports, so they can be exercised against mocks or the in-memory
//! store without any I/O.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;

use crate::domain::ports::{
    AccessTokenRepository, AccountCommand, BookingLedger, BookingLifecycle, BookingQuery,
    InventoryCommand, InventoryQuery, InventoryRepository, ProfileQuery, TokenVerifier,
    UserRepository,
};
use crate::domain::{AccountService, BookingLifecycleService, CredentialPrimitives, InventoryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub lifecycle: Arc<dyn BookingLifecycle>,
    pub bookings: Arc<dyn BookingQuery>,
    pub inventory: Arc<dyn InventoryCommand>,
    pub inventory_query: Arc<dyn InventoryQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Driven adapters and primitives the services are built from.
pub struct StateAdapters<L, I, U, T> {
    pub ledger: Arc<L>,
    pub inventory: Arc<I>,
    pub users: Arc<U>,
    pub tokens: Arc<T>,
    pub credentials: CredentialPrimitives,
    pub clock: Arc<dyn Clock>,
    pub token_ttl: Duration,
}

impl HttpState {
    /// Build every service over explicitly supplied adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use hotel_booking::domain::CredentialPrimitives;
    /// use hotel_booking::inbound::http::state::{HttpState, StateAdapters};
    /// use hotel_booking::outbound::crypto::{RandomTokenIssuer, Sha256PasswordHasher};
    /// use hotel_booking::outbound::memory::MemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(MemoryStore::default());
    /// let state = HttpState::from_adapters(StateAdapters {
    ///     ledger: store.clone(),
    ///     inventory: store.clone(),
    ///     users: store.clone(),
    ///     tokens: store,
    ///     credentials: CredentialPrimitives {
    ///         hasher: Arc::new(Sha256PasswordHasher),
    ///         issuer: Arc::new(RandomTokenIssuer),
    ///     },
    ///     clock: Arc::new(DefaultClock),
    ///     token_ttl: chrono::Duration::hours(24),
    /// });
    /// let _lifecycle = state.lifecycle.clone();
    /// ```
    pub fn from_adapters<L, I, U, T>(adapters: StateAdapters<L, I, U, T>) -> Self
    where
        L: BookingLedger + 'static,
        I: InventoryRepository + 'static,
        U: UserRepository + 'static,
        T: AccessTokenRepository + 'static,
    {
        let StateAdapters {
            ledger,
            inventory,
            users,
            tokens,
            credentials,
            clock,
            token_ttl,
        } = adapters;

        let lifecycle = Arc::new(BookingLifecycleService::new(ledger, clock.clone()));
        let inventory = Arc::new(InventoryService::new(inventory));
        let accounts = Arc::new(
            AccountService::new(users, tokens, credentials, clock).with_token_ttl(token_ttl),
        );

        Self {
            lifecycle: lifecycle.clone(),
            bookings: lifecycle,
            inventory: inventory.clone(),
            inventory_query: inventory,
            accounts: accounts.clone(),
            profiles: accounts.clone(),
            tokens: accounts,
        }
    }
}
