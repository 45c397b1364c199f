//! Signed-request envelopes.
//!
//! An agent proves, per request, that it holds the key named in its
//! signature parameters. Four header values travel with each request:
//!
//! | Header | Value |
//! |---|---|
//! | `VALET-Authorization` | base64 of the delegation JSON |
//! | `VALET-Agent` | `record=<url>` |
//! | `Signature-Input` | `valet=("@method" "@path" "valet-authorization");created=…;keyid="…";alg="ed25519";v="1.0"` |
//! | `Signature` | `valet=:<base64 signature>:` |
//!
//! The signature covers a four-line [`SignatureBase`]. Verifying it
//! ([`verify_request`]) only authenticates the holder of `keyid`. Whether
//! that holder is *authorized* is the delegation's job; the composition of
//! both checks lives in [`verify_authorized_request`].

#![warn(missing_docs)]

mod authorize;
mod base;
mod envelope;
mod error;
mod params;
mod signer;

pub use authorize::*;
pub use base::*;
pub use envelope::*;
pub use error::*;
pub use params::*;
pub use signer::*;
