//! Backend library modules.
//!
//! Hexagonal layout: `domain` holds the types, services and ports;
//! `inbound` adapts HTTP onto the driving ports; `outbound` implements the
//! driven ports over PostgreSQL, memory, argon2 and the classifier artifact.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
