//! Signature algorithm for the partner API.
//!
//! Every authenticated request carries three headers:
//!
//! ```text
//! x-api-key:   {api_key}
//! x-timestamp: {unix_millis}
//! x-signature: hex(HMAC-SHA256("{body}{timestamp}", api_secret))
//! ```
//!
//! `body` is the exact JSON string sent on the wire, or the empty string for
//! bodiless `GET` requests. Signing and transmission must use the same
//! string; re-serializing between the two invalidates the request.

/// Header name carrying the public API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header name for the hex-encoded HMAC signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header name for the millisecond timestamp covered by the signature.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

/// Maximum allowed age of a signature (in milliseconds).
pub const MAX_SIGNATURE_AGE_MS: i64 = 5 * 60 * 1000;

/// Errors produced by signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid timestamp")]
    InvalidTimestamp,
    #[error("invalid hex encoding")]
    InvalidHex,
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("signature expired")]
    Expired,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

impl From<hex::FromHexError> for SignatureError {
    fn from(_: hex::FromHexError) -> Self {
        Self::InvalidHex
    }
}

// ---------------------------------------------------------------------------
// SignedRequest
// ---------------------------------------------------------------------------

/// The per-call authentication material: the body string, the timestamp
/// string and the signature computed over both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp: String,
    pub body: String,
    pub signature: String,
}

impl SignedRequest {
    /// Sign `body` with the current time.
    ///
    /// Call this immediately before dispatch: the partner may reject stale
    /// timestamps.
    pub fn new(body: String, secret: &[u8]) -> Self {
        Self::with_timestamp(body, now_millis().to_string(), secret)
    }

    /// Sign `body` with an explicit timestamp string.
    pub fn with_timestamp(body: String, timestamp: String, secret: &[u8]) -> Self {
        let signature = sign(secret, &body, &timestamp);
        Self {
            timestamp,
            body,
            signature,
        }
    }

    /// Check this request against `secret`, as the partner would.
    pub fn verify(&self, secret: &[u8]) -> Result<(), SignatureError> {
        verify(secret, &self.body, &self.timestamp, &self.signature)
    }
}

// ---------------------------------------------------------------------------
// Signing / verification
// ---------------------------------------------------------------------------

/// Compute `hex(HMAC-SHA256("{body}{timestamp}", secret))`.
pub fn sign(secret: &[u8], body: &str, timestamp: &str) -> String {
    let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret);
    let mut ctx = ring::hmac::Context::with_key(&key);
    ctx.update(body.as_bytes());
    ctx.update(timestamp.as_bytes());
    hex::encode(ctx.sign().as_ref())
}

/// Verify a hex signature over `body` and `timestamp` in constant time.
///
/// Freshness is not checked here; see [`check_timestamp`].
pub fn verify(
    secret: &[u8],
    body: &str,
    timestamp: &str,
    signature_hex: &str,
) -> Result<(), SignatureError> {
    let signature = hex::decode(signature_hex)?;
    let data = format!("{body}{timestamp}");
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret),
        data.as_bytes(),
        &signature,
    )?;
    Ok(())
}

/// Check that a millisecond timestamp string is within
/// [`MAX_SIGNATURE_AGE_MS`] of `now_ms`.
pub fn check_timestamp(timestamp: &str, now_ms: i64) -> Result<(), SignatureError> {
    let timestamp: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;
    if (now_ms - timestamp).abs() > MAX_SIGNATURE_AGE_MS {
        return Err(SignatureError::Expired);
    }
    Ok(())
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
