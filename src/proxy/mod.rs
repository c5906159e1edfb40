//! Edge proxy — forwards dashboard API calls to the SalesQuest backend.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────────┐
//! │ Browser  │ ───────> │  server.rs  (axum Router, ServerConfig)          │
//! │ / CLI    │ <─────── │    └─ api.rs  (proxy_handler, ProxyState)        │
//! └──────────┘          │         │                                        │
//!                       │         │ OPTIONS → cors.rs preflight (local)    │
//!                       │         │                                        │
//!                       │         │ route.rs: /api/<rest>?<q>              │
//!                       │         │   → <base><prefix>/<rest>?<q>          │
//!                       │         v                                        │
//!                       │  forward.rs  (Forwarder, reqwest, one attempt)   │
//!                       └─────────┼────────────────────────────────────────┘
//!                                 v
//!                           Backend API
//! ```
//!
//! ## Response guarantees
//!
//! | Case                      | Status            | Body                         |
//! |---------------------------|-------------------|------------------------------|
//! | `OPTIONS`                 | 204               | empty                        |
//! | backend answered          | backend's status  | backend's bytes, streamed    |
//! | backend unreachable       | 502 (configurable)| `{"error", "timestamp"}`     |
//! | body over limit           | 413               | `{"error"}`                  |
//! | path outside the mount    | 404               | `{"error"}`                  |
//!
//! Every row carries `Access-Control-Allow-Origin: *`.

pub mod api;
pub mod cors;
pub mod forward;
pub mod route;
pub mod server;
