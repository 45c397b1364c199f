//! Delegation certificates.
//!
//! A [`Delegation`] is a principal's signed, time-bounded statement that an
//! agent may act on its behalf. The principal signs the UTF-8 concatenation
//!
//! ```text
//! agent_id ‖ issued_at ‖ expires_at
//! ```
//!
//! with no separators. `principal_id` and the signature itself are not part
//! of the signed message.
//!
//! Whether a delegation is usable is two independent questions: is the
//! principal signature valid ([`verify_delegation`]), and has it expired
//! ([`is_expired`])?

#![warn(missing_docs)]

mod delegation;
mod error;
mod manager;

pub use chrono::TimeDelta;
pub use delegation::*;
pub use error::DelegationError;
pub use manager::*;
