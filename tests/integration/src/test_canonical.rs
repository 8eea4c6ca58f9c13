//! Base string construction from received requests.

#[cfg(test)]
mod tests {
    use http::header::{CONTENT_TYPE, HOST};
    use oauthsig_auth::params::{
        OAUTH_CONSUMER_KEY, OAUTH_NONCE, OAUTH_SIGNATURE, OAUTH_SIGNATURE_METHOD, OAUTH_TIMESTAMP,
        OAUTH_TOKEN, REALM,
    };
    use oauthsig_auth::{
        OAuthParams, RequestDescriptor, build_signature_base_string, canonicalize_url,
        normalize_parameters,
    };

    fn rfc_request() -> RequestDescriptor {
        let (parts, ()) = http::Request::builder()
            .method("POST")
            .uri("/request?b5=%3D%253D&a3=a&c%40=&a2=r%20b")
            .header(HOST, "Example.com:80")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(())
            .unwrap()
            .into_parts();
        RequestDescriptor::from_parts(&parts, "http", b"c2&a3=2+q").unwrap()
    }

    fn rfc_params() -> OAuthParams {
        let mut params = OAuthParams::new();
        params.insert(REALM, "Example");
        params.insert(OAUTH_CONSUMER_KEY, "9djdj82h48djs9d2");
        params.insert(OAUTH_TOKEN, "kkk9d7dh3k39sjv7");
        params.insert(OAUTH_SIGNATURE_METHOD, "HMAC-SHA1");
        params.insert(OAUTH_TIMESTAMP, "137131201");
        params.insert(OAUTH_NONCE, "7d8f3e4a");
        params.insert(OAUTH_SIGNATURE, "djosJKDKJSD8743243%2Fjdk33klY%3D");
        params
    }

    #[test]
    fn test_should_build_base_string_from_received_request() {
        let request = rfc_request();
        let base_string = build_signature_base_string(
            request.method().as_str(),
            request.url(),
            &rfc_params(),
            &request.query_params().unwrap(),
            request.body_params(),
        )
        .unwrap();

        assert_eq!(
            base_string,
            "POST&http%3A%2F%2Fexample.com%2Frequest&a2%3Dr%2520b%26a3%3D2%2520q\
             %26a3%3Da%26b5%3D%253D%25253D%26c%2540%3D%26c2%3D%26oauth_consumer_\
             key%3D9djdj82h48djs9d2%26oauth_nonce%3D7d8f3e4a%26oauth_signature_m\
             ethod%3DHMAC-SHA1%26oauth_timestamp%3D137131201%26oauth_token%3Dkkk\
             9d7dh3k39sjv7"
        );
    }

    #[test]
    fn test_should_normalize_regardless_of_parameter_order() {
        let request = rfc_request();
        let mut query = request.query_params().unwrap();
        let mut body = request.body_params().to_vec();
        let expected = normalize_parameters(&rfc_params(), &query, &body);

        query.reverse();
        body.reverse();
        assert_eq!(normalize_parameters(&rfc_params(), &query, &body), expected);

        // Moving a pair from the query to the body does not change the set.
        let moved = query.pop().unwrap();
        body.push(moved);
        assert_eq!(normalize_parameters(&rfc_params(), &query, &body), expected);
    }

    #[test]
    fn test_should_canonicalize_received_urls() {
        let cases = [
            ("HTTP://Example.COM:80/r%20v?x=1#frag", "http://example.com/r%20v"),
            ("https://example.com:443", "https://example.com/"),
            ("https://user:pw@example.com:8443/a/b", "https://example.com:8443/a/b"),
        ];
        for (input, expected) in cases {
            let canonical = canonicalize_url(input).unwrap();
            assert_eq!(canonical, expected, "input: {input}");
            assert_eq!(canonicalize_url(&canonical).unwrap(), canonical);
        }
    }
}
