//! # Configuration Codec
//!
//! Share tokens are the URL-safe base64 (no padding) of a configuration's
//! JSON form. Decoding also accepts padded and standard-alphabet base64 so
//! hand-edited links keep working.
//!
//! ```rust
//! use beam_core::codec::{decode, encode};
//! use beam_core::configuration::BeamConfiguration;
//!
//! let config = BeamConfiguration::default();
//! let token = encode(&config).unwrap();
//! assert_eq!(decode(&token).unwrap(), config);
//! ```
//!
//! Malformed input never reaches the caller as a failure through
//! [`decode_or`] and [`configuration_from_query`]; they log and fall back.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::configuration::BeamConfiguration;
use crate::errors::{CalcError, CalcResult};

/// Encode a configuration as a share token
pub fn encode(config: &BeamConfiguration) -> CalcResult<String> {
    let json = serde_json::to_vec(config)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a share token
pub fn decode(token: &str) -> CalcResult<BeamConfiguration> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CalcError::invalid_share_token("empty token"));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .or_else(|_| URL_SAFE.decode(token))
        .or_else(|_| STANDARD.decode(token))
        .map_err(|e| CalcError::invalid_share_token(format!("not base64: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| CalcError::invalid_share_token(format!("not a beam configuration: {}", e)))
}

/// Decode a share token, returning `fallback` if it is malformed
pub fn decode_or(token: &str, fallback: &BeamConfiguration) -> BeamConfiguration {
    match decode(token) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed share token");
            fallback.clone()
        }
    }
}

/// Build a share link: `base_url` with `param=<token>` appended
pub fn share_link(base_url: &str, config: &BeamConfiguration, param: &str) -> CalcResult<String> {
    let token = encode(config)?;
    let separator = if base_url.contains('?') {
        if base_url.ends_with('?') || base_url.ends_with('&') {
            ""
        } else {
            "&"
        }
    } else {
        "?"
    };
    Ok(format!("{}{}{}={}", base_url, separator, param, token))
}

/// Extract the share token for `param` from a URL or bare query string
pub fn token_from_query<'a>(query: &'a str, param: &str) -> Option<&'a str> {
    let query = match query.split_once('?') {
        Some((_, q)) => q,
        None => query,
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .map(|(_, value)| value)
}

/// Configuration carried by a share link.
///
/// `None` if the parameter is absent. A present but malformed token also
/// gives `None`, after logging; the caller keeps its current configuration.
pub fn configuration_from_query(query: &str, param: &str) -> Option<BeamConfiguration> {
    let token = token_from_query(query, param)?;
    match decode(token) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(error = %e, param, "Ignoring malformed share link");
            None
        }
    }
}

/// Configuration for a bare token, a query string or a full share link.
///
/// The `param` value is used when present; otherwise the whole input is
/// treated as a token, so padded tokens ending in `=` still decode.
/// Anything malformed gives `fallback`.
pub fn open_shared(input: &str, param: &str, fallback: &BeamConfiguration) -> BeamConfiguration {
    let token = token_from_query(input, param).unwrap_or(input);
    decode_or(token, fallback)
}
