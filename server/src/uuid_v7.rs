use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use types::{Result, err};
use uuid::Uuid;

use crate::CONFIG;

type HmacSha256 = Hmac<Sha256>;

/// Signed cookie tokens of the form `<uuid simple>.<base64 hmac>`.
pub trait UuidV7Ext: Sized {
    fn from_signed_token(token: &str, secret: &SecretString) -> Result<Self>;
    fn as_signed_token(&self, secret: &SecretString) -> Result<String>;

    /// Creation time embedded in a v7 id.
    fn jiff_timestamp(&self) -> Option<Timestamp>;

    fn from_token(token: &str) -> Result<Self> {
        Self::from_signed_token(token, &CONFIG.signing_secret)
    }

    fn as_token(&self) -> Result<String> {
        self.as_signed_token(&CONFIG.signing_secret)
    }
}

impl UuidV7Ext for Uuid {
    fn from_signed_token(token: &str, secret: &SecretString) -> Result<Self> {
        let Some((uuid_simple, signature_b64)) = token.split_once('.') else {
            return Err(err!("invalid token format"));
        };

        let mut mac = keyed_mac(secret)?;
        mac.update(uuid_simple.as_bytes());
        let signature = BASE64_URL_SAFE_NO_PAD.decode(signature_b64)?;
        mac.verify_slice(&signature)
            .map_err(|_| err!("invalid token signature"))?;

        Ok(Uuid::parse_str(uuid_simple)?)
    }

    fn as_signed_token(&self, secret: &SecretString) -> Result<String> {
        let id_str = self.simple().to_string();
        let mut mac = keyed_mac(secret)?;
        mac.update(id_str.as_bytes());
        let signature = BASE64_URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", id_str, signature))
    }

    fn jiff_timestamp(&self) -> Option<Timestamp> {
        let (seconds, nanos) = self.get_timestamp()?.to_unix();
        Timestamp::new(seconds as i64, nanos as i32).ok()
    }
}

fn keyed_mac(secret: &SecretString) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| err!("invalid signing secret"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        s.to_string().into()
    }

    #[test]
    fn signed_token_verifies() {
        let id = Uuid::now_v7();
        let token = id.as_signed_token(&secret("k1")).unwrap();

        assert_eq!(Uuid::from_signed_token(&token, &secret("k1")).unwrap(), id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = Uuid::now_v7().as_signed_token(&secret("k1")).unwrap();

        assert!(Uuid::from_signed_token(&token, &secret("k2")).is_err());
    }

    #[test]
    fn tampered_id_is_rejected() {
        let token = Uuid::now_v7().as_signed_token(&secret("k1")).unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::now_v7().simple(), signature);

        assert!(Uuid::from_signed_token(&forged, &secret("k1")).is_err());
        assert!(Uuid::from_signed_token("no-dot", &secret("k1")).is_err());
    }

    #[test]
    fn v7_ids_carry_their_creation_time() {
        let before = Timestamp::now();
        let created = Uuid::now_v7().jiff_timestamp().unwrap();

        // v7 keeps millisecond precision.
        assert!(created.as_millisecond() >= before.as_millisecond());
        assert!(Uuid::nil().jiff_timestamp().is_none());
    }
}
