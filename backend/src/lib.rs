//! Hotel booking backend.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the booking
//! lifecycle engine and its ports, [`inbound`] adapts HTTP requests onto the
//! driving ports and [`outbound`] implements the driven ports over
//! PostgreSQL or an in-process store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
