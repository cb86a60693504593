use actix_web::HttpRequest;

/// Extract the client's IP address for rate-limit keying.
///
/// Behind a reverse proxy the peer address is the proxy itself, so when
/// `trust_proxy_headers` is set the forwarded headers win: first entry of
/// `X-Forwarded-For`, then `X-Real-IP`, then the socket peer.
pub fn get_client_ip(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = header_ip(req, "x-forwarded-for") {
            return ip;
        }
        if let Some(ip) = header_ip(req, "x-real-ip") {
            return ip;
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_ip(req: &HttpRequest, name: &str) -> Option<String> {
    let value = req.headers().get(name)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_header_wins_when_trusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .peer_addr("10.0.0.1:443".parse().unwrap())
            .to_http_request();

        assert_eq!(get_client_ip(&req, true), "203.0.113.7");
    }

    #[test]
    fn forwarded_header_ignored_when_untrusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .peer_addr("10.0.0.1:443".parse().unwrap())
            .to_http_request();

        assert_eq!(get_client_ip(&req, false), "10.0.0.1");
    }

    #[test]
    fn falls_back_to_real_ip_header() {
        let req = TestRequest::default()
            .insert_header(("x-real-ip", "198.51.100.9"))
            .peer_addr("10.0.0.1:443".parse().unwrap())
            .to_http_request();

        assert_eq!(get_client_ip(&req, true), "198.51.100.9");
    }
}
