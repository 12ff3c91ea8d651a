//! Authentication in both directions: the bearer token we present to Slack,
//! and the two ways Slack proves to us that a slash command is genuine.
//!
//! The legacy verification token is a static shared secret sent in the form
//! body. The signing secret is used to sign the raw request body, the result
//! of which is included in a header alongside a timestamp.
//!
//! <https://api.slack.com/authentication/verifying-requests-from-slack>

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// A newtype wrapper around Slack access tokens.
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct SlackAccessToken(pub String);

/// Convert a Slack access token to a `Bearer` `Authorization` header value.
///
/// ```
/// let token = SlackAccessToken("xoxb-foo".into());
/// assert_eq!(to_auth_header_val(&token), "Bearer xoxb-foo");
/// ```
pub fn to_auth_header_val(t: &SlackAccessToken) -> String {
    format!("Bearer {}", t.0)
}

/// The static verification token configured for the slash command.
#[derive(Clone)]
pub struct VerificationToken(pub String);

/// With no expected token configured every request passes; that's only
/// intended for local testing, and is warned about at startup.
pub fn is_valid_token(expected: Option<&VerificationToken>, offered: &str) -> bool {
    match expected {
        Some(t) => t.0 == offered,
        None => true,
    }
}

/// A newtype wrapper around the Slack signing secret.
#[derive(Clone)]
pub struct SigningSecret(pub String);

/// How far the request timestamp may drift from our clock, in seconds,
/// before we consider it a replay.
pub const MAX_TIMESTAMP_SKEW: u64 = 60 * 5;

/// Compare a valid signature for a payload against that offered alongside it
/// in a request. Requests which fail this predicate, or whose timestamp is
/// too far from `now` (seconds since the epoch), should be considered
/// unauthenticated.
pub fn is_valid_signature(
    secret: &SigningSecret,
    timestamp: &str,
    payload: &[u8],
    sig: &str,
    now: u64,
) -> bool {
    let Ok(ts) = timestamp.parse::<u64>() else {
        return false;
    };

    if ts.abs_diff(now) > MAX_TIMESTAMP_SKEW {
        return false;
    }

    let Some(hex_sig) = sig.strip_prefix("v0=") else {
        return false;
    };

    let Ok(raw_sig) = hex::decode(hex_sig) else {
        return false;
    };

    signer(secret, timestamp, payload)
        .map(|mac| mac.verify_slice(&raw_sig).is_ok())
        .unwrap_or(false)
}

/// Generate a valid signature with our secret for a payload.
#[cfg(test)]
fn gen_signature(secret: &SigningSecret, timestamp: &str, payload: &[u8]) -> Option<String> {
    signer(secret, timestamp, payload)
        .map(|mac| format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

fn signer(secret: &SigningSecret, timestamp: &str, payload: &[u8]) -> Option<Hmac<Sha256>> {
    type HmacSha256 = Hmac<Sha256>;

    HmacSha256::new_from_slice(secret.0.as_bytes())
        .map(|mut mac| {
            mac.update(b"v0:");
            mac.update(timestamp.as_bytes());
            mac.update(b":");
            mac.update(payload);
            mac
        })
        .ok()
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Sign a body as Slack would, for use in router tests.
    pub fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        gen_signature(&SigningSecret(secret.into()), timestamp, payload).unwrap()
    }

    #[test]
    fn test_is_valid_token() {
        let expected = VerificationToken("foobar".into());

        assert!(is_valid_token(Some(&expected), "foobar"));
        assert!(!is_valid_token(Some(&expected), "foobaz"));
        assert!(!is_valid_token(Some(&expected), ""));
        assert!(!is_valid_token(Some(&expected), "foobar "));
        assert!(is_valid_token(None, "anything"));
        assert!(is_valid_token(None, ""));
    }

    /// The example from Slack's documentation on verifying requests.
    #[test]
    fn test_gen_signature() {
        let secret = SigningSecret("8f742231b10e8888abcd99yyyzzz85a5".into());
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";

        assert_eq!(
            gen_signature(&secret, "1531420618", body),
            Some("v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503".into())
        );
    }

    #[test]
    fn test_is_valid_signature() {
        let secret = SigningSecret("foobar".into());
        let body = b"token=t&text=octocat";
        let sig = sign("foobar", "1700000000", body);

        assert!(is_valid_signature(&secret, "1700000000", body, &sig, 1700000000));
        assert!(is_valid_signature(&secret, "1700000000", body, &sig, 1700000300));

        // Stale.
        assert!(!is_valid_signature(&secret, "1700000000", body, &sig, 1700000301));
        // Tampered body.
        assert!(!is_valid_signature(&secret, "1700000000", b"token=t&text=other", &sig, 1700000000));
        // Wrong secret.
        let other = SigningSecret("not foobar".into());
        assert!(!is_valid_signature(&other, "1700000000", body, &sig, 1700000000));
        // Garbage.
        assert!(!is_valid_signature(&secret, "yesterday", body, &sig, 1700000000));
        assert!(!is_valid_signature(&secret, "1700000000", body, "v0=zz", 1700000000));
        assert!(!is_valid_signature(&secret, "1700000000", body, &sig[3..], 1700000000));
    }
}
