//! Builders wiring driven adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use hotel_booking::domain::CredentialPrimitives;
use hotel_booking::inbound::http::state::{HttpState, StateAdapters};
use hotel_booking::outbound::crypto::{RandomTokenIssuer, Sha256PasswordHasher};
use hotel_booking::outbound::memory::MemoryStore;
use hotel_booking::outbound::persistence::{
    DieselBookingLedger, DieselInventoryRepository, DieselUserRepository,
};

use super::ServerConfig;

fn credentials() -> CredentialPrimitives {
    CredentialPrimitives {
        hasher: Arc::new(Sha256PasswordHasher),
        issuer: Arc::new(RandomTokenIssuer),
    }
}

/// Build the HTTP state, using PostgreSQL when a pool is configured and the
/// in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL booking store");
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            HttpState::from_adapters(StateAdapters {
                ledger: Arc::new(DieselBookingLedger::new(pool.clone())),
                inventory: Arc::new(DieselInventoryRepository::new(pool.clone())),
                users: users.clone(),
                tokens: users,
                credentials: credentials(),
                clock,
                token_ttl: config.token_ttl,
            })
        }
        None => {
            info!("no database configured; using in-memory booking store");
            let store = Arc::new(MemoryStore::default());
            HttpState::from_adapters(StateAdapters {
                ledger: store.clone(),
                inventory: store.clone(),
                users: store.clone(),
                tokens: store,
                credentials: credentials(),
                clock,
                token_ttl: config.token_ttl,
            })
        }
    };
    web::Data::new(state)
}
