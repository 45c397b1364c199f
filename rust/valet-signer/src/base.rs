//! The canonical signature base.

use std::fmt;

use crate::SignatureParams;

/// The string an agent signs for a request.
///
/// ```text
/// "@method": GET
/// "@path": /api/data
/// "valet-authorization": eyJhZ2VudF9pZCI6...
/// "@signature-params": ("@method" "@path" "valet-authorization");created=…;keyid="…";alg="ed25519";v="1.0"
/// ```
///
/// Lines are joined by a single `\n` with no trailing newline. The method is
/// used exactly as given; callers that normalize casing must do so on both
/// sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBase(String);

impl SignatureBase {
    /// Build the base for a request.
    #[must_use]
    pub fn new(
        method: &str,
        path: &str,
        valet_authorization: &str,
        params: &SignatureParams,
    ) -> Self {
        Self(format!(
            "\"@method\": {method}\n\"@path\": {path}\n\"valet-authorization\": {valet_authorization}\n\"@signature-params\": {params}"
        ))
    }

    /// The base as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The UTF-8 bytes that are signed.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for SignatureBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_renders_four_lines_without_a_trailing_newline() {
        let params = SignatureParams::new(1_771_056_000, "agent:ed25519:abc");
        let base = SignatureBase::new("GET", "/api/data", "eyJ9", &params);

        assert_eq!(
            base.as_str(),
            concat!(
                "\"@method\": GET\n",
                "\"@path\": /api/data\n",
                "\"valet-authorization\": eyJ9\n",
                "\"@signature-params\": (\"@method\" \"@path\" \"valet-authorization\");",
                "created=1771056000;keyid=\"agent:ed25519:abc\";alg=\"ed25519\";v=\"1.0\""
            )
        );
        assert_eq!(base.as_str().lines().count(), 4);
        assert!(!base.as_str().ends_with('\n'));
    }

    #[test]
    fn method_casing_is_preserved() {
        let params = SignatureParams::new(1, "agent:ed25519:abc");
        let lower = SignatureBase::new("get", "/", "", &params);
        let upper = SignatureBase::new("GET", "/", "", &params);

        assert!(lower.as_str().starts_with("\"@method\": get\n"));
        assert_ne!(lower, upper);
    }
}
