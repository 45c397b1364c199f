//! Verifiable agent delegations.
//!
//! A principal (a human or organization holding an ed25519 key) signs a
//! time-bounded [`Delegation`] naming an agent's key. The agent then signs
//! each outgoing request with its own key and attaches the delegation. A
//! relying party checks both: the request signature proves who sent the
//! request, the delegation proves the sender was authorized.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use valet::{
//!     DelegationManager, KeyPair, RequestSigner, TimeDelta, verify_authorized_request,
//! };
//!
//! let principal = DelegationManager::new(KeyPair::generate()?);
//! let agent = RequestSigner::new(KeyPair::generate()?);
//!
//! let delegation = principal.create_delegation(&agent.public_key(), TimeDelta::hours(24))?;
//! let request = agent.sign_request("GET", "/api/data", &delegation, "https://example.com/record")?;
//!
//! let authorized = verify_authorized_request(
//!     "GET",
//!     "/api/data",
//!     &request,
//!     &principal.principal_public_key(),
//! )?;
//! assert_eq!(authorized.agent_id, *agent.agent_id());
//! # Ok(())
//! # }
//! ```
//!
//! The pieces live in their own crates and are re-exported here:
//! [`valet_credentials`] (keys and identifiers), [`valet_delegation`],
//! [`valet_signer`] (the request envelope), [`valet_storage`] and
//! [`valet_activity`].

#![warn(missing_docs)]

mod agent;
pub mod config;
mod error;

pub use agent::*;
pub use error::*;

pub use valet_activity as activity;
pub use valet_credentials as credentials;
pub use valet_delegation as delegation;
pub use valet_signer as signer;
pub use valet_storage as storage;

pub use valet_credentials::{AgentId, KeyPair, PrincipalId};
pub use valet_delegation::{
    DEFAULT_DURATION_HOURS, Delegation, DelegationManager, TimeDelta, duration_from_hours,
    verify_delegation,
};
pub use valet_signer::{
    AuthorizationError, AuthorizedRequest, RequestSigner, SignedRequest, verify_authorized_request,
    verify_request,
};
