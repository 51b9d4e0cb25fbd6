use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// A decoded JWT header or payload. Keys are sorted at every level for display.
pub type Claims = BTreeMap<String, Value>;

/// The two JWT components we decode. The signature is never looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Header => f.write_str("header"),
            Segment::Payload => f.write_str("payload"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid JWT: must have 3 parts, found {segments}")]
    InvalidToken { segments: usize },
    #[error("failed to decode {segment}: {source}")]
    Decode {
        segment: Segment,
        #[source]
        source: base64::DecodeError,
    },
    #[error("JWT payload has no `sub` claim")]
    MissingSubject,
    #[error("failed to write decoded JWT: {0}")]
    Write(#[from] io::Error),
}

/// The encoded header and payload of a token.
struct Components<'a> {
    header: &'a str,
    payload: &'a str,
}

/// There's three components to a JWT: its header, its payload, and signature.
/// These are separated by `.`s.
fn split(token: &str) -> Result<Components<'_>, TokenError> {
    let components: Vec<&str> = token.split('.').collect();
    match components[..] {
        [header, payload, _signature] => Ok(Components { header, payload }),
        _ => Err(TokenError::InvalidToken {
            segments: components.len(),
        }),
    }
}

/// Decodes a single component as URL-safe, non-padded base64 JSON.
///
/// Only the base64 layer can fail. Anything that doesn't parse as a JSON
/// object comes back as empty claims.
pub fn decode_segment(encoded: &str, segment: Segment) -> Result<Claims, TokenError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|source| TokenError::Decode { segment, source })?;
    let claims: Claims = serde_json::from_slice(&decoded).unwrap_or_default();
    Ok(claims
        .into_iter()
        .map(|(name, value)| (name, sort_keys(value)))
        .collect())
}

/// Rebuilds nested objects with their keys in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Pretty-print the header and payload of `token` to `out`.
///
/// We don't validate anything beyond the token's shape; the API does all of
/// that for us.
pub fn decode_and_print<W: Write>(token: &str, out: &mut W) -> Result<(), TokenError> {
    let components = split(token)?;

    let header = decode_segment(components.header, Segment::Header)?;
    writeln!(out, "JWT Header:")?;
    write_claims(out, &header)?;

    let payload = decode_segment(components.payload, Segment::Payload)?;
    writeln!(out, "\nJWT Payload:")?;
    write_claims(out, &payload)?;

    Ok(())
}

fn write_claims<W: Write>(out: &mut W, claims: &Claims) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, claims).map_err(io::Error::from)?;
    writeln!(out)
}

/// The `sub` claim of the token, which the platform uses as the user's id.
pub fn subject(token: &str) -> Result<String, TokenError> {
    let components = split(token)?;
    let payload = decode_segment(components.payload, Segment::Payload)?;

    match payload.get("sub") {
        Some(Value::String(sub)) => Ok(sub.clone()),
        Some(Value::Number(sub)) => Ok(sub.to_string()),
        _ => Err(TokenError::MissingSubject),
    }
}
