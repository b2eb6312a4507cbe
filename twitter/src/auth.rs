use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use itertools::Itertools;
use sha1::Sha1;
use time::OffsetDateTime;
use urlencoding::encode;
use uuid::Uuid;

use crate::config::Credentials;

/// Builds the `Authorization` header for each request.
#[derive(Clone)]
pub(crate) enum Auth {
    OAuth1(OAuth1Keys),
    Bearer(String),
}

#[derive(Clone)]
pub(crate) struct OAuth1Keys {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl From<&Credentials> for Auth {
    fn from(credentials: &Credentials) -> Self {
        match credentials {
            Credentials::OAuth1 {
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
            } => Self::OAuth1(OAuth1Keys {
                consumer_key: consumer_key.clone(),
                consumer_secret: consumer_secret.clone(),
                token: access_token.clone(),
                token_secret: access_token_secret.clone(),
            }),
            Credentials::Bearer { bearer } => Self::Bearer(bearer.clone()),
        }
    }
}

impl Auth {
    /// `url` must not carry a query string; query parameters go in `params`.
    pub(crate) fn header(&self, method: &str, url: &str, params: &[(&str, String)]) -> String {
        match self {
            Self::Bearer(token) => format!("Bearer {token}"),
            Self::OAuth1(keys) => {
                let nonce = Uuid::new_v4().simple().to_string();
                let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
                keys.header(method, url, params, &nonce, &timestamp)
            }
        }
    }
}

impl OAuth1Keys {
    fn header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let all_params = params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(oauth_params.iter().copied());
        let signature = signature(
            method,
            url,
            all_params,
            &self.consumer_secret,
            &self.token_secret,
        );
        oauth_params.push(("oauth_signature", signature.as_str()));

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .join(", ");
        format!("OAuth {fields}")
    }
}

/// HMAC-SHA1 request signature as described in RFC 5849 section 3.4.
fn signature<'a>(
    method: &str,
    url: &str,
    params: impl Iterator<Item = (&'a str, &'a str)>,
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let param_string = params
        .map(|(k, v)| (encode(k), encode(v)))
        .sorted()
        .map(|(k, v)| format!("{k}={v}"))
        .join("&");
    let base = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    let mut mac =
        Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
