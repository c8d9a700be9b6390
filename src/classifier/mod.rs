//! Packet classification.
//!
//! Stateless mappings from parsed fields to a service name and a
//! LAN/INTERNET scope.

mod scope;
mod service;

pub use scope::{classify_scope, is_private_addr, is_private_ip};
pub use service::service_name;
