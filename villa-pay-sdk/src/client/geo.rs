//! IP geolocation client.

use std::net::IpAddr;

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::config::GeolocationConfig;
use crate::objects::GeoLookup;

/// Typed HTTP client for the IP geolocation service.
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: Client,
    base_url: Url,
}

impl GeoClient {
    pub fn new(config: &GeolocationConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET {base}/{ip}/json/`, or `GET {base}/json/` for the address the
    /// request itself comes from.
    pub async fn lookup(&self, ip: Option<IpAddr>) -> Result<GeoLookup, ClientError> {
        let resp = self.http.get(self.lookup_url(ip)?).send().await?;
        parse_response(resp).await
    }

    fn lookup_url(&self, ip: Option<IpAddr>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty();
            if let Some(ip) = ip {
                segments.push(&ip.to_string());
            }
            segments.push("json").push("");
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GeoClient {
        GeoClient::new(&GeolocationConfig {
            base_url: Url::parse(base).unwrap(),
        })
    }

    #[test]
    fn test_lookup_url_per_address() {
        let geo = client("https://ipapi.co/");
        assert_eq!(geo.lookup_url(None).unwrap().as_str(), "https://ipapi.co/json/");
        assert_eq!(
            geo.lookup_url(Some("203.0.113.9".parse().unwrap()))
                .unwrap()
                .as_str(),
            "https://ipapi.co/203.0.113.9/json/"
        );
        assert_eq!(
            geo.lookup_url(Some("fe80::1".parse().unwrap()))
                .unwrap()
                .as_str(),
            "https://ipapi.co/fe80::1/json/"
        );

        let geo = client("http://geo.internal/v1");
        assert_eq!(
            geo.lookup_url(Some("198.51.100.4".parse().unwrap()))
                .unwrap()
                .as_str(),
            "http://geo.internal/v1/198.51.100.4/json/"
        );
    }
}
