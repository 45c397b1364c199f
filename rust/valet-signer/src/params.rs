//! The `Signature-Input` parameter string.
//!
//! Grammar accepted by [`SignatureParams::parse_header`] (a strict subset of
//! RFC 8941 structured fields):
//!
//! ```text
//! signature-input = "valet=" inner-list *( ";" key "=" bare-item )
//! inner-list      = "(" sf-string *( SP sf-string ) ")"
//! bare-item       = sf-integer / sf-string
//! ```

use std::fmt;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair},
};

use crate::SignatureInputError;

/// The signature label used in `Signature-Input` and `Signature`.
pub const SIGNATURE_LABEL: &str = "valet";

/// The components every VALET signature covers, in order.
pub const COVERED_COMPONENTS: [&str; 3] = ["@method", "@path", "valet-authorization"];

/// The only supported `alg` parameter.
pub const SIGNATURE_ALGORITHM: &str = "ed25519";

/// The envelope version carried in the `v` parameter.
pub const ENVELOPE_VERSION: &str = "1.0";

/// The variable parameters of a VALET signature.
///
/// The covered components, `alg` and `v` are fixed and rendered by
/// [`fmt::Display`]; only `created` and `keyid` vary between requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureParams {
    /// Creation time in unix seconds.
    pub created: u64,
    /// The signer's agent identifier.
    pub keyid: String,
}

impl SignatureParams {
    /// Construct parameters for a signature created at `created`.
    pub fn new(created: u64, keyid: impl Into<String>) -> Self {
        Self {
            created,
            keyid: keyid.into(),
        }
    }

    /// Render the full `Signature-Input` header value.
    #[must_use]
    pub fn to_header(&self) -> String {
        format!("{SIGNATURE_LABEL}={self}")
    }

    /// Parse a `Signature-Input` header value.
    ///
    /// # Errors
    ///
    /// Fails on any grammar violation, on covered components other than
    /// [`COVERED_COMPONENTS`], on unknown or repeated parameters, and when
    /// `created` or `keyid` is missing.
    pub fn parse_header(input: &str) -> Result<Self, SignatureInputError> {
        let (_, (components, parameters)) =
            all_consuming(signature_input)(input).map_err(|_| SignatureInputError::Malformed)?;

        if components != COVERED_COMPONENTS {
            return Err(SignatureInputError::UnexpectedComponents(
                components.into_iter().map(str::to_owned).collect(),
            ));
        }

        let mut created = None;
        let mut keyid = None;
        let mut seen: Vec<&str> = Vec::with_capacity(parameters.len());

        for (key, value) in parameters {
            if seen.contains(&key) {
                return Err(SignatureInputError::DuplicateParameter(key.to_owned()));
            }
            seen.push(key);

            match (key, value) {
                ("created", BareItem::Integer(value)) => created = Some(value),
                ("created", _) => return Err(SignatureInputError::InvalidParameter("created")),
                ("keyid", BareItem::String(value)) => keyid = Some(value),
                ("keyid", _) => return Err(SignatureInputError::InvalidParameter("keyid")),
                ("alg", BareItem::String(SIGNATURE_ALGORITHM)) => {}
                ("alg", BareItem::String(other)) => {
                    return Err(SignatureInputError::UnsupportedAlgorithm(other.to_owned()));
                }
                ("alg", _) => return Err(SignatureInputError::InvalidParameter("alg")),
                ("v", BareItem::String(ENVELOPE_VERSION)) => {}
                ("v", BareItem::String(other)) => {
                    return Err(SignatureInputError::UnsupportedVersion(other.to_owned()));
                }
                ("v", _) => return Err(SignatureInputError::InvalidParameter("v")),
                (other, _) => {
                    return Err(SignatureInputError::UnexpectedParameter(other.to_owned()));
                }
            }
        }

        Ok(Self {
            created: created.ok_or(SignatureInputError::MissingParameter("created"))?,
            keyid: keyid
                .ok_or(SignatureInputError::MissingParameter("keyid"))?
                .to_owned(),
        })
    }
}

impl fmt::Display for SignatureParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, component) in COVERED_COMPONENTS.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "\"{component}\"")?;
        }
        write!(
            f,
            ");created={};keyid=\"{}\";alg=\"{SIGNATURE_ALGORITHM}\";v=\"{ENVELOPE_VERSION}\"",
            self.created, self.keyid
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BareItem<'a> {
    Integer(u64),
    String(&'a str),
}

fn sf_string(input: &str) -> IResult<&str, &str> {
    delimited(
        char('"'),
        take_while(|c: char| c != '"' && c != '\\'),
        char('"'),
    )(input)
}

fn inner_list(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(char('('), separated_list1(char(' '), sf_string), char(')'))(input)
}

fn bare_item(input: &str) -> IResult<&str, BareItem<'_>> {
    alt((
        map(sf_string, BareItem::String),
        map_res(digit1, |digits: &str| digits.parse().map(BareItem::Integer)),
    ))(input)
}

fn parameter_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.' | '*')
    })(input)
}

fn parameter(input: &str) -> IResult<&str, (&str, BareItem<'_>)> {
    preceded(
        char(';'),
        separated_pair(parameter_key, char('='), bare_item),
    )(input)
}

#[allow(clippy::type_complexity)]
fn signature_input(input: &str) -> IResult<&str, (Vec<&str>, Vec<(&str, BareItem<'_>)>)> {
    preceded(
        pair(tag(SIGNATURE_LABEL), char('=')),
        pair(inner_list, many0(parameter)),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEYID: &str = "agent:ed25519:8o3Wq5r2bSmKLeYszTjwW9XVGgLQdMVwQWvyEmiD4eGv";

    fn header() -> String {
        format!(
            r#"valet=("@method" "@path" "valet-authorization");created=1771056000;keyid="{KEYID}";alg="ed25519";v="1.0""#
        )
    }

    #[test]
    fn it_renders_the_fixed_parameter_string() {
        let params = SignatureParams::new(1_771_056_000, KEYID);
        assert_eq!(params.to_header(), header());
    }

    #[test]
    fn it_parses_its_own_rendering() {
        let params = SignatureParams::parse_header(&header()).unwrap();
        assert_eq!(params, SignatureParams::new(1_771_056_000, KEYID));
    }

    #[test]
    fn parameter_order_is_not_significant() {
        let input = format!(
            r#"valet=("@method" "@path" "valet-authorization");v="1.0";keyid="{KEYID}";alg="ed25519";created=5"#
        );
        assert_eq!(
            SignatureParams::parse_header(&input).unwrap(),
            SignatureParams::new(5, KEYID)
        );
    }

    #[test]
    fn created_and_keyid_are_required() {
        let input = format!(r#"valet=("@method" "@path" "valet-authorization");keyid="{KEYID}""#);
        assert_eq!(
            SignatureParams::parse_header(&input),
            Err(SignatureInputError::MissingParameter("created"))
        );

        let input = r#"valet=("@method" "@path" "valet-authorization");created=1"#;
        assert_eq!(
            SignatureParams::parse_header(input),
            Err(SignatureInputError::MissingParameter("keyid"))
        );
    }

    #[test]
    fn it_rejects_grammar_violations() {
        for input in [
            "",
            "valet",
            "other=(\"@method\");created=1;keyid=\"x\"",
            "valet=(\"@method\" \"@path\" \"valet-authorization\");created=-1;keyid=\"x\"",
            "valet=(\"@method\" \"@path\" \"valet-authorization\");created=1;keyid=\"x",
            "valet=(\"@method\" \"@path\" \"valet-authorization\");created=1;keyid=\"x\";",
            "valet=(\"@method\" \"@path\" \"valet-authorization\")created=1",
            "valet=(\"@method\" \"@path\" \"valet-authorization\");created=1;keyid=\"x\" trailing",
            "valet=(\"@method\" \"@path\" \"valet-authorization\");created=99999999999999999999999;keyid=\"x\"",
        ] {
            assert_eq!(
                SignatureParams::parse_header(input),
                Err(SignatureInputError::Malformed),
                "{input}"
            );
        }
    }

    #[test]
    fn it_requires_the_fixed_component_list() {
        let input = format!(r#"valet=("@method" "@path");created=1;keyid="{KEYID}""#);
        assert_eq!(
            SignatureParams::parse_header(&input),
            Err(SignatureInputError::UnexpectedComponents(vec![
                "@method".into(),
                "@path".into()
            ]))
        );
    }

    #[test]
    fn it_rejects_other_algorithms_and_versions() {
        let input = format!(
            r#"valet=("@method" "@path" "valet-authorization");created=1;keyid="{KEYID}";alg="rsa-pss-sha512""#
        );
        assert_eq!(
            SignatureParams::parse_header(&input),
            Err(SignatureInputError::UnsupportedAlgorithm(
                "rsa-pss-sha512".into()
            ))
        );

        let input = format!(
            r#"valet=("@method" "@path" "valet-authorization");created=1;keyid="{KEYID}";v="2.0""#
        );
        assert_eq!(
            SignatureParams::parse_header(&input),
            Err(SignatureInputError::UnsupportedVersion("2.0".into()))
        );
    }

    #[test]
    fn it_rejects_repeated_and_unknown_parameters() {
        let input = format!(
            r#"valet=("@method" "@path" "valet-authorization");created=1;created=2;keyid="{KEYID}""#
        );
        assert_eq!(
            SignatureParams::parse_header(&input),
            Err(SignatureInputError::DuplicateParameter("created".into()))
        );

        let input = format!(
            r#"valet=("@method" "@path" "valet-authorization");created=1;keyid="{KEYID}";nonce="abc""#
        );
        assert_eq!(
            SignatureParams::parse_header(&input),
            Err(SignatureInputError::UnexpectedParameter("nonce".into()))
        );
    }

    #[test]
    fn it_rejects_mistyped_parameters() {
        let input = r#"valet=("@method" "@path" "valet-authorization");created="1";keyid="x""#;
        assert_eq!(
            SignatureParams::parse_header(input),
            Err(SignatureInputError::InvalidParameter("created"))
        );
    }
}
