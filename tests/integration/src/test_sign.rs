//! Signing behavior as observed by a client.

#[cfg(test)]
mod tests {
    use http::Method;
    use oauthsig_auth::signature::plaintext_signature;
    use oauthsig_auth::{
        AuthError, RequestDescriptor, RequestSigner, StaticNonceSource, SystemNonceSource,
    };
    use oauthsig_core::{Credentials, HeaderStyle, SignatureMethod};

    use crate::{CONSUMER_SECRET, TOKEN_SECRET, authorization, signer};

    #[test]
    fn test_should_sign_photos_request_into_query_string() {
        let mut request = RequestDescriptor::new(Method::GET, "http://photos.example.net/photos")
            .with_query_param("file", "vacation.jpg")
            .with_query_param("size", "original");

        signer()
            .sign_with(
                &mut request,
                SignatureMethod::HmacSha1,
                &StaticNonceSource::new("kllo9940pd9333jh", 1_191_242_096),
            )
            .unwrap();

        assert!(request.url().starts_with(
            "http://photos.example.net/photos?file=vacation.jpg&size=original&oauth_consumer_key="
        ));
        assert!(
            request
                .url()
                .contains("oauth_signature=tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D")
        );
        assert!(authorization(&request).is_none());
    }

    #[test]
    fn test_should_attach_header_only_for_non_get() {
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let mut request = RequestDescriptor::new(method.clone(), "https://api.example.com/x")
                .with_form_param("title", "a+b c");
            let before = request.url().to_owned();

            signer()
                .with_realm("Photos")
                .sign_with(&mut request, SignatureMethod::HmacSha1, &SystemNonceSource)
                .unwrap();

            assert_eq!(request.url(), before, "{method} URL must not change");
            let header = authorization(&request).unwrap();
            assert!(header.starts_with(r#"OAuth realm="Photos", "#), "{header}");
            assert!(header.contains("oauth_signature=\""));
            assert!(header.contains(r#"oauth_version="1.0""#));
        }
    }

    #[test]
    fn test_should_emit_form_style_header() {
        let mut request = RequestDescriptor::new(Method::POST, "https://api.example.com/x");
        signer()
            .with_header_style(HeaderStyle::Form)
            .sign(&mut request, SignatureMethod::HmacSha1, "abc", 1)
            .unwrap();

        let header = authorization(&request).unwrap();
        assert!(header.starts_with("OAuth oauth_consumer_key=dpf43f3p2l4k3l03&"));
        assert!(!header.contains('"'));
    }

    #[test]
    fn test_should_produce_identical_output_for_identical_inputs() {
        let build = || {
            RequestDescriptor::new(Method::POST, "https://api.example.com/x?b=2&a=1")
                .with_form_param("z", "last")
                .with_form_param("a", "first")
        };
        let mut first = build();
        let mut second = build();
        signer()
            .sign(&mut first, SignatureMethod::HmacSha1, "n0nce", 1_700_000_000)
            .unwrap();
        signer()
            .sign(&mut second, SignatureMethod::HmacSha1, "n0nce", 1_700_000_000)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_should_emit_plaintext_signature_without_base_string() {
        let mut request = RequestDescriptor::new(Method::POST, "https://api.example.com/token");
        signer()
            .sign(&mut request, SignatureMethod::Plaintext, "n", 1)
            .unwrap();

        let header = authorization(&request).unwrap();
        // The header value percent-encodes the signature once more.
        assert!(header.contains(r#"oauth_signature="kd94hf93k423kf44%26pfkkdhi9sl3r4s00""#));
        assert_eq!(
            plaintext_signature(CONSUMER_SECRET, TOKEN_SECRET),
            "kd94hf93k423kf44&pfkkdhi9sl3r4s00"
        );
        assert_eq!(plaintext_signature("a b", ""), "a%20b&");
    }

    #[test]
    fn test_should_double_encode_plaintext_secrets_in_header() {
        let mut request = RequestDescriptor::new(Method::POST, "https://api.example.com/token");
        RequestSigner::new(
            Credentials::new("dpf43f3p2l4k3l03", "djr9rjt0jd78jf88")
                .with_token("nnch734d00sl2jdk", "jjd99$tj88uiths3"),
        )
        .sign(&mut request, SignatureMethod::Plaintext, "n", 1)
        .unwrap();

        let header = authorization(&request).unwrap();
        assert!(
            header.contains(r#"oauth_signature="djr9rjt0jd78jf88%26jjd99%2524tj88uiths3""#),
            "{header}"
        );
    }

    #[test]
    fn test_should_leave_request_untouched_on_failure() {
        let mut colliding =
            RequestDescriptor::new(Method::GET, "http://e.com/p?oauth_nonce=mine&x=1");
        let before = colliding.clone();
        let err = signer()
            .sign(&mut colliding, SignatureMethod::HmacSha1, "n", 1)
            .unwrap_err();
        assert!(matches!(err, AuthError::ParameterCollision(ref name) if name == "oauth_nonce"));
        assert_eq!(colliding, before);

        let mut malformed = RequestDescriptor::new(Method::POST, "not a url");
        let before = malformed.clone();
        assert!(matches!(
            signer().sign(&mut malformed, SignatureMethod::HmacSha1, "n", 1),
            Err(AuthError::MalformedUrl(_))
        ));
        assert_eq!(malformed, before);

        let mut rsa = RequestDescriptor::new(Method::POST, "https://e.com/");
        let before = rsa.clone();
        assert!(matches!(
            signer().sign(&mut rsa, SignatureMethod::RsaSha1, "n", 1),
            Err(AuthError::UnsupportedSignatureMethod(_))
        ));
        assert_eq!(rsa, before);
    }

    #[test]
    fn test_should_sign_concurrently_with_shared_signer() {
        let signer = std::sync::Arc::new(signer());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let signer = std::sync::Arc::clone(&signer);
                std::thread::spawn(move || {
                    let mut request =
                        RequestDescriptor::new(Method::GET, format!("https://e.com/item/{i}"));
                    signer
                        .sign_with(&mut request, SignatureMethod::HmacSha1, &SystemNonceSource)
                        .unwrap();
                    request.url().to_owned()
                })
            })
            .collect();

        let mut urls: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), 8);
    }
}
