//! Custom Axum extractors.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

/// Header a reverse proxy uses to pass on the original client address.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Address of the customer behind the request.
///
/// The first `X-Forwarded-For` entry when a proxy set one, else the peer
/// address of the connection. `None` when neither is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientIp(forwarded.or(peer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> ClientIp {
        let (mut parts, ()) = request.into_parts();
        let Ok(ip) = ClientIp::from_request_parts(&mut parts, &()).await;
        ip
    }

    #[tokio::test]
    async fn test_forwarded_address_wins() {
        let mut request = Request::builder()
            .header(FORWARDED_FOR_HEADER, "203.0.113.9, 10.0.0.2")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 2], 51000))));
        assert_eq!(extract(request).await, ClientIp(Some("203.0.113.9".parse().unwrap())));
    }

    #[tokio::test]
    async fn test_peer_address_without_proxy() {
        let mut request = Request::builder()
            .header(FORWARDED_FOR_HEADER, "unknown")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 4], 51000))));
        assert_eq!(extract(request).await, ClientIp(Some("198.51.100.4".parse().unwrap())));

        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await, ClientIp(None));
    }
}
