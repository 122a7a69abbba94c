//! Backend library modules.
//!
//! The crate is laid out hexagonally: [`domain`] holds the entities, token
//! service, aggregation engine, and ports; [`inbound`] adapts HTTP requests
//! onto the domain; [`outbound`] implements the persistence ports; and
//! [`middleware`] carries cross-cutting request concerns.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a per-request trace id.
pub use middleware::Trace;
