//! Console relay: stateless pass-through between the browser console and
//! the agent backend service.
mod config;
mod forward;
mod routes;

pub use config::{RelayConfig, DEFAULT_BACKEND_URL, DEFAULT_BIND_ADDR};
pub use forward::RelayState;
pub use routes::router;
