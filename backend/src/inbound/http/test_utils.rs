//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::Trace;
use crate::domain::{
    CredentialPrimitives, DEFAULT_TOKEN_TTL_HOURS, Hotel, HotelDetails, LoginCredentials,
    Registration, Room, RoomDetails, RoomDraft, User,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, StateAdapters};
use crate::outbound::crypto::{RandomTokenIssuer, Sha256PasswordHasher};
use crate::outbound::memory::MemoryStore;

/// HTTP state over a fresh in-memory store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: HttpState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let state = HttpState::from_adapters(StateAdapters {
            ledger: store.clone(),
            inventory: store.clone(),
            users: store.clone(),
            tokens: store.clone(),
            credentials: CredentialPrimitives {
                hasher: Arc::new(Sha256PasswordHasher),
                issuer: Arc::new(RandomTokenIssuer),
            },
            clock: Arc::new(DefaultClock),
            token_ttl: chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        });
        Self { store, state }
    }

    /// Full `/api/v1` application wired to this context.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure))
    }

    /// Register a guest and return the user with a valid bearer token.
    pub async fn signed_in_guest(&self, email: &str) -> (User, String) {
        let registration =
            Registration::try_from_parts("Asha Rao", email, "secret-pass", "+919876543210")
                .expect("valid registration");
        let user = self
            .state
            .accounts
            .register(registration)
            .await
            .expect("register guest");
        let session = self
            .state
            .accounts
            .login(LoginCredentials::try_from_parts(email, "secret-pass").expect("credentials"))
            .await
            .expect("login guest");
        (user, session.token.as_str().to_owned())
    }

    /// Seed a hotel with one room type.
    pub async fn hotel_with_room(&self, total_rooms: i64, price: i64) -> (Hotel, Room) {
        let hotel = self
            .state
            .inventory
            .add_hotel(HotelDetails::try_from_parts("Lakeview", "Udaipur").expect("details"))
            .await
            .expect("add hotel");
        let room = self
            .state
            .inventory
            .add_room(RoomDraft {
                hotel_id: hotel.id,
                details: RoomDetails::try_from_parts("Deluxe", price, total_rooms)
                    .expect("details"),
            })
            .await
            .expect("add room");
        (hotel, room)
    }
}

/// `Authorization` header pair for a bearer token.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
