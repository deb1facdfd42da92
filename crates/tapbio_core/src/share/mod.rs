//! Shareable state tokens and public URLs.
//!
//! # Responsibility
//! - Encode a snapshot into a URL-safe token (`JSON -> deflate -> base64url`).
//! - Decode tokens found in a page query, ignoring anything malformed.
//! - Build the public view URL and the self-hosting redirect file.
//!
//! # Invariants
//! - `decode_share_token` never fails loudly: any decode, inflate or parse
//!   problem yields `None`.
//! - Every snapshot `encode_share_token` accepts decodes back unchanged.
//! - Inflated payloads larger than `MAX_DECODED_BYTES` are rejected.

use crate::model::snapshot::Snapshot;
use crate::render::html::escape_html;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// Query parameter carrying a share token.
pub const SHARE_QUERY_PARAM: &str = "data";
/// Upper bound for an inflated token payload.
pub const MAX_DECODED_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug)]
pub enum ShareError {
    Encode(serde_json::Error),
    Compress(std::io::Error),
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Compress(err) => write!(f, "failed to compress snapshot: {err}"),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Compress(err) => Some(err),
        }
    }
}

/// Encodes `snapshot` as a URL-safe share token.
pub fn encode_share_token(snapshot: &Snapshot) -> Result<String, ShareError> {
    let json = serde_json::to_vec(snapshot).map_err(ShareError::Encode)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json).map_err(ShareError::Compress)?;
    let compressed = encoder.finish().map_err(ShareError::Compress)?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decodes a share token; malformed tokens yield `None`.
pub fn decode_share_token(token: &str) -> Option<Snapshot> {
    match try_decode(token.trim()) {
        Ok(snapshot) => Some(snapshot),
        Err(reason) => {
            debug!(
                "event=share_decode module=share status=ignored reason={} token_len={}",
                reason,
                token.len()
            );
            None
        }
    }
}

fn try_decode(token: &str) -> Result<Snapshot, String> {
    if token.is_empty() {
        return Err("empty_token".to_string());
    }

    let compressed = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|err| format!("base64:{err}"))?;

    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_DECODED_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|err| format!("inflate:{err}"))?;
    if json.len() as u64 > MAX_DECODED_BYTES {
        return Err("payload_too_large".to_string());
    }

    let snapshot: Snapshot =
        serde_json::from_slice(&json).map_err(|err| format!("json:{err}"))?;
    if let Err(err) = snapshot.validate() {
        warn!(
            "event=share_decode module=share status=degraded reason={}",
            err
        );
    }
    Ok(snapshot)
}

/// Public view URL for the page served from `base_url`.
///
/// One trailing `/` is dropped before the query is appended.
pub fn public_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    let clean = trimmed.strip_suffix('/').unwrap_or(trimmed);
    format!("{clean}?view=public")
}

/// Public view URL that also carries the full state as a token.
pub fn share_url(base_url: &str, snapshot: &Snapshot) -> Result<String, ShareError> {
    let token = encode_share_token(snapshot)?;
    Ok(format!(
        "{}&{SHARE_QUERY_PARAM}={token}",
        public_url(base_url)
    ))
}

/// Extracts the share token from a query string (`?a=b&data=...`).
pub fn token_from_query(query: &str) -> Option<&str> {
    query_param(query, SHARE_QUERY_PARAM).filter(|value| !value.is_empty())
}

/// Whether the query asks for the read-only public view.
pub fn is_public_view(query: &str) -> bool {
    query_param(query, "view") == Some("public")
}

fn query_param<'q>(query: &'q str, name: &str) -> Option<&'q str> {
    query
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Standalone `index.html` that redirects to `url`, for self-hosting.
pub fn standalone_redirect_html(url: &str) -> String {
    let escaped = escape_html(url);
    let script_url = serde_json::to_string(url)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Redirecting...</title>
    <meta http-equiv="refresh" content="0;url={escaped}">
    <script>window.location.href = {script_url};</script>
    <style>body{{font-family:sans-serif;display:flex;justify-content:center;align-items:center;height:100vh;background:#fafafa;color:#333}}</style>
</head>
<body><p>Loading...</p></body>
</html>"#
    )
}
