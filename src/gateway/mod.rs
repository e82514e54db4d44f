//! API gateway: info and health endpoints plus the `/goals` reverse proxy.

pub mod handlers;
pub mod proxy;
pub mod routes;

pub use handlers::GatewayState;
pub use routes::create_router;
