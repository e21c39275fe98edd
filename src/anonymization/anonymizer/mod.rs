//! Redactors
//!
//! Pure functions turning a detected value into a safe surrogate.

pub mod network;
pub mod surrogate;

pub use network::{
    is_reserved_ipv4, is_reserved_ipv6, redact_ip, redact_ipv4, redact_ipv6, NetworkPolicy,
};
pub use surrogate::{
    generate_surrogate_email, generate_surrogate_password, remove_email, SURROGATE_EMAIL_DOMAIN,
};
