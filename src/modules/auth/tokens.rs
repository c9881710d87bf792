use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::Mac;
use serde::{Deserialize, Serialize};

use crate::{
    HmacSha256, ACCESS_TOKEN_DURATION, REFRESH_TOKEN_DURATION, RESET_TOKEN_DURATION,
    VERIFICATION_TOKEN_DURATION,
};

/// The four token kinds issued by the credential service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    EmailVerification,
    Access,
    Refresh,
    PasswordReset,
}

impl TokenKind {
    /// Lifetime in seconds for each kind; fixed constants, not per-call
    pub fn lifetime(&self) -> u64 {
        match self {
            TokenKind::EmailVerification => VERIFICATION_TOKEN_DURATION,
            TokenKind::Access => ACCESS_TOKEN_DURATION,
            TokenKind::Refresh => REFRESH_TOKEN_DURATION,
            TokenKind::PasswordReset => RESET_TOKEN_DURATION,
        }
    }
}

/// Claims carried by every signed token. The kind claim is checked on
/// verification so a token minted for one purpose cannot be replayed for
/// another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub kind: TokenKind,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    pub iat: u64,
    pub exp: u64,
}

/// Token decode and verification failures
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    BadSignature,
    Expired,
    WrongKind,
}

#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Signs and verifies HS256 tokens with the process-wide secret.
/// Tokens are three base64url segments (no padding): header.claims.signature.
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Issue a signed token of the given kind, expiring after the kind's
    /// fixed lifetime
    pub fn issue(
        &self,
        kind: TokenKind,
        email: &str,
        user_id: Option<u64>,
        is_admin: Option<bool>,
        now: u64,
    ) -> String {
        let claims = Claims {
            kind,
            email: email.to_string(),
            user_id,
            is_admin,
            iat: now,
            exp: now + kind.lifetime(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> String {
        let header = Header {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };

        // Serialization of plain structs cannot fail
        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Decode a token, check its signature and expiry, and require the
    /// expected kind. Returns the claims on success.
    pub fn verify(&self, token: &str, expected: TokenKind, now: u64) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (header_b64, claims_b64, sig_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(c), Some(s), None) => (h, c, s),
                _ => return Err(TokenError::Malformed),
            };

        let header_raw = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_raw).map_err(|_| TokenError::Malformed)?;
        if header.alg != "HS256" {
            return Err(TokenError::Malformed);
        }

        // Signature is checked before the claims are even parsed
        let signature = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims_raw = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&claims_raw).map_err(|_| TokenError::Malformed)?;

        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.kind != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(claims)
    }
}
