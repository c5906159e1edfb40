//! CLI command implementations.
//!
//! | Module    | Commands handled |
//! |-----------|------------------|
//! | `serve`   | `Serve`          |
//! | `fetch`   | `Fetch`          |
//! | `config`  | `Config`         |

pub mod config;
pub mod fetch;
pub mod serve;

pub use config::cmd_config;
pub use fetch::cmd_fetch;
pub use serve::cmd_serve;
