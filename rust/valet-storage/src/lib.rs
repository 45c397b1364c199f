//! Persistence collaborators for VALET.
//!
//! Delegations and activity logs are stored as immutable blocks addressed by
//! their [`ContentId`], and the latest delegation is announced under a stable
//! name through a [`NamePublisher`]. Both seams are async traits so a network
//! backed store can stand in for the built-in ones.

#![warn(missing_docs)]

mod block;
mod content;
mod error;
mod publisher;
mod registry;

pub use block::*;
pub use content::*;
pub use error::*;
pub use publisher::*;
pub use registry::*;
