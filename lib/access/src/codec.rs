//! Bearer token decoding.
//!
//! Tokens use the JWT compact serialization: `header.payload.signature`,
//! each segment base64url encoded. Only the structure is checked here.
//! Signature validity and expiry are the identity provider's and the API
//! server's business; the client trusts the shape and nothing more.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rootcause::Report;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{MalformedToken, Segment};

/// Claims carried by a decoded token.
///
/// There is no public constructor: the only way to obtain `Claims` is a
/// successful [`decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    subject: String,
    role: String,
    display_name: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Claims {
    /// The subject claim (`sub`), which is the user's email address.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The role claim.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The display name, if the token carries one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The `exp` claim, if present. Informational only.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub(crate) fn into_parts(self) -> (String, String, Option<String>) {
        (self.subject, self.role, self.display_name)
    }
}

/// Payload fields as they appear on the wire. Validated into [`Claims`].
#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    role: Option<String>,
    full_name: Option<String>,
    name: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    exp: Option<f64>,
}

/// Decodes a bearer token into its claims.
///
/// # Errors
///
/// Returns [`MalformedToken`] when the token is not three base64url segments,
/// when the header or payload is not a JSON object, when a claim has the
/// wrong type, or when `sub` or `role` is missing or empty.
pub fn decode(token: &str) -> Result<Claims, Report<MalformedToken>> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [header, payload, _signature] = segments.as_slice() else {
        return Err(MalformedToken::SegmentCount {
            found: segments.len(),
        }
        .into());
    };

    // Header content is not used, but it must be well formed.
    decode_object(header, Segment::Header)?;
    let payload = decode_object(payload, Segment::Payload)?;
    let raw: RawClaims =
        serde_json::from_value(Value::Object(payload)).map_err(|e| MalformedToken::Json {
            segment: Segment::Payload,
            details: e.to_string(),
        })?;

    let expires_at = raw.exp.map(expiry).transpose()?;

    Ok(Claims {
        subject: required(raw.sub, "sub")?,
        role: required(raw.role, "role")?,
        display_name: raw.full_name.or(raw.name).or(raw.display_name),
        expires_at,
    })
}

fn decode_object(segment: &str, which: Segment) -> Result<Map<String, Value>, MalformedToken> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| MalformedToken::Encoding { segment: which })?;

    serde_json::from_slice(&bytes).map_err(|e| MalformedToken::Json {
        segment: which,
        details: e.to_string(),
    })
}

fn required(value: Option<String>, claim: &'static str) -> Result<String, MalformedToken> {
    let value = value.ok_or(MalformedToken::MissingClaim { claim })?;
    if value.trim().is_empty() {
        return Err(MalformedToken::InvalidClaim {
            claim,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

#[allow(clippy::cast_possible_truncation)]
fn expiry(seconds: f64) -> Result<DateTime<Utc>, MalformedToken> {
    DateTime::from_timestamp(seconds.trunc() as i64, 0).ok_or_else(|| MalformedToken::InvalidClaim {
        claim: "exp",
        reason: "expected seconds since the Unix epoch".to_string(),
    })
}
