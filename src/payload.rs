//! Rendered payload – the frozen result of one render, and the public embed
//! response built from it.
//!
//! A [`RenderedPayload`] is byte-stable for identical inputs, so persisting
//! it and serving it later is equivalent to re-rendering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::schema::FaqSchema;

/// Characters of the base64 digest kept as the integrity token.
pub const INTEGRITY_LEN: usize = 16;

/// Self-contained HTML, combined CSS and FAQPage JSON-LD for one FAQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPayload {
    pub html: String,
    pub css: String,
    pub schema: FaqSchema,
}

impl RenderedPayload {
    /// Compact JSON, the form the integrity digest is computed over.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// First [`INTEGRITY_LEN`] characters of base64(SHA-256(compact JSON)).
    ///
    /// The embed loader recomputes this with `JSON.stringify({html, css,
    /// schema})` over the parsed response, which yields the same bytes.
    pub fn integrity(&self) -> String {
        let digest = Sha256::digest(self.to_json().as_bytes());
        let mut token = STANDARD.encode(digest);
        token.truncate(INTEGRITY_LEN);
        token
    }
}

/// Body of the public embed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub html: String,
    pub css: String,
    pub schema: FaqSchema,
    pub integrity: String,
}

impl EmbedResponse {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Whether `integrity` matches the payload fields.
    pub fn verify(&self) -> bool {
        let payload = RenderedPayload {
            html: self.html.clone(),
            css: self.css.clone(),
            schema: self.schema.clone(),
        };
        payload.integrity() == self.integrity
    }
}

impl From<RenderedPayload> for EmbedResponse {
    fn from(payload: RenderedPayload) -> Self {
        let integrity = payload.integrity();
        Self {
            html: payload.html,
            css: payload.css,
            schema: payload.schema,
            integrity,
        }
    }
}
