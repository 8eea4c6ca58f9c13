//! Signing on one side, verification on the other.

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use http::Method;
    use oauthsig_auth::verify::{ParameterSource, verify_at};
    use oauthsig_auth::{
        AuthError, RequestDescriptor, StaticSecretProvider, SystemNonceSource, VerifyOptions,
        verify,
    };
    use oauthsig_core::{HeaderStyle, SignatureMethod};

    use crate::{CONSUMER_KEY, TOKEN, provider, signer, to_http_parts};

    /// What the server reconstructs from the wire.
    fn received(request: &RequestDescriptor, scheme: &str) -> RequestDescriptor {
        let (parts, body) = to_http_parts(request);
        RequestDescriptor::from_parts(&parts, scheme, &body).unwrap()
    }

    #[test]
    fn test_should_verify_signed_get_from_wire() {
        let mut request = RequestDescriptor::new(Method::GET, "https://photos.example.net/photos")
            .with_query_param("file", "vacation.jpg")
            .with_query_param("size", "original size");
        signer()
            .sign_with(&mut request, SignatureMethod::HmacSha1, &SystemNonceSource)
            .unwrap();

        let verified =
            verify(&received(&request, "https"), &provider(), &VerifyOptions::default()).unwrap();
        assert_eq!(verified.consumer_key, CONSUMER_KEY);
        assert_eq!(verified.token.as_deref(), Some(TOKEN));
        assert_eq!(verified.source, ParameterSource::Query);
    }

    #[test]
    fn test_should_verify_signed_post_from_wire() {
        for style in [HeaderStyle::Quoted, HeaderStyle::Form] {
            let mut request =
                RequestDescriptor::new(Method::POST, "https://api.example.com/status?trim=1")
                    .with_form_param("status", "Hello Ladies + Gentlemen, a signed OAuth request!")
                    .with_form_param("include_entities", "true");
            signer()
                .with_realm("Example")
                .with_header_style(style)
                .sign_with(&mut request, SignatureMethod::HmacSha1, &SystemNonceSource)
                .unwrap();

            let verified =
                verify(&received(&request, "https"), &provider(), &VerifyOptions::default())
                    .unwrap();
            assert_eq!(verified.source, ParameterSource::Header);
            assert_eq!(verified.signature_method, SignatureMethod::HmacSha1);
        }
    }

    #[test]
    fn test_should_verify_origin_form_request() {
        let mut request = RequestDescriptor::new(Method::POST, "http://api.example.com/photos")
            .with_form_param("title", "beach");
        signer()
            .sign(&mut request, SignatureMethod::HmacSha1, "abc123", 1_700_000_000)
            .unwrap();

        let mut builder = http::Request::builder()
            .method(Method::POST)
            .uri("/photos")
            .header(http::header::HOST, "api.example.com");
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        let received =
            RequestDescriptor::from_parts(&parts, "http", request.form_body().as_bytes()).unwrap();

        let verified =
            verify_at(&received, &provider(), &VerifyOptions::default(), 1_700_000_030).unwrap();
        assert_eq!(verified.nonce.as_deref(), Some("abc123"));
        assert_eq!(verified.timestamp, Some(1_700_000_000));
    }

    #[test]
    fn test_should_verify_plaintext_request() {
        let mut request = RequestDescriptor::new(Method::POST, "https://api.example.com/token");
        signer()
            .sign(&mut request, SignatureMethod::Plaintext, "n", 1_700_000_000)
            .unwrap();

        let verified = verify_at(
            &received(&request, "https"),
            &provider(),
            &VerifyOptions::default(),
            1_700_000_000,
        )
        .unwrap();
        assert_eq!(verified.signature_method, SignatureMethod::Plaintext);
    }

    #[test]
    fn test_should_reject_tampered_requests() {
        let mut request = RequestDescriptor::new(Method::POST, "https://api.example.com/pay")
            .with_form_param("amount", "10");
        signer()
            .sign(&mut request, SignatureMethod::HmacSha1, "n", 1_700_000_000)
            .unwrap();
        let options = VerifyOptions::default();

        let body_tampered = request.clone().with_form_body(b"amount=1000").unwrap();
        assert!(matches!(
            verify_at(&body_tampered, &provider(), &options, 1_700_000_000),
            Err(AuthError::SignatureDoesNotMatch)
        ));

        let replayed_elsewhere =
            RequestDescriptor::new(Method::POST, "https://api.example.com/refund")
                .with_form_param("amount", "10")
                .with_header(
                    http::header::AUTHORIZATION,
                    request.headers()[http::header::AUTHORIZATION].clone(),
                );
        assert!(matches!(
            verify_at(&replayed_elsewhere, &provider(), &options, 1_700_000_000),
            Err(AuthError::SignatureDoesNotMatch)
        ));

        let wrong_secret = StaticSecretProvider::new([(
            CONSUMER_KEY.to_owned(),
            "not-the-secret".to_owned(),
        )])
        .with_tokens([(TOKEN.to_owned(), "pfkkdhi9sl3r4s00".to_owned())]);
        assert!(matches!(
            verify_at(&request, &wrong_secret, &options, 1_700_000_000),
            Err(AuthError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_should_enforce_timestamp_window() {
        let mut request = RequestDescriptor::new(Method::GET, "https://api.example.com/feed");
        signer()
            .sign(&mut request, SignatureMethod::HmacSha1, "n", 1_700_000_000)
            .unwrap();

        let strict = VerifyOptions {
            max_skew: Some(TimeDelta::seconds(30)),
        };
        assert!(verify_at(&request, &provider(), &strict, 1_700_000_029).is_ok());
        assert!(matches!(
            verify_at(&request, &provider(), &strict, 1_700_000_031),
            Err(AuthError::RequestExpired)
        ));

        let lenient = VerifyOptions { max_skew: None };
        assert!(verify_at(&request, &provider(), &lenient, 0).is_ok());
    }

    #[test]
    fn test_should_reject_unknown_token() {
        let mut request = RequestDescriptor::new(Method::GET, "https://api.example.com/feed");
        signer()
            .sign(&mut request, SignatureMethod::HmacSha1, "n", 1_700_000_000)
            .unwrap();

        let no_tokens =
            StaticSecretProvider::new([(CONSUMER_KEY.to_owned(), "kd94hf93k423kf44".to_owned())]);
        assert!(matches!(
            verify_at(&request, &no_tokens, &VerifyOptions::default(), 1_700_000_000),
            Err(AuthError::TokenNotFound(ref token)) if token == TOKEN
        ));
    }
}
