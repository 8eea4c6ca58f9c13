//! OAuthSig CLI - sign one HTTP request with OAuth 1.0 credentials.
//!
//! The signed request is printed rather than sent: for `GET` the URL with the
//! OAuth parameters appended, otherwise the `Authorization` header and the
//! form body.
//!
//! # Usage
//!
//! ```text
//! OAUTH_CONSUMER_KEY=key OAUTH_CONSUMER_SECRET=secret \
//!     oauthsig [--json] [--signature-method NAME] METHOD URL [name=value ...]
//! ```
//!
//! Extra `name=value` arguments become query parameters for `GET` and form
//! body parameters for every other method.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OAUTH_CONSUMER_KEY` | *(required)* | Consumer key |
//! | `OAUTH_CONSUMER_SECRET` | *(required)* | Consumer secret |
//! | `OAUTH_TOKEN` | *(unset)* | Token key |
//! | `OAUTH_TOKEN_SECRET` | *(unset)* | Token secret |
//! | `OAUTH_SIGNATURE_METHOD` | `HMAC-SHA1` | `HMAC-SHA1` or `PLAINTEXT` |
//! | `OAUTH_CALLBACK` | *(unset)* | `oauth_callback` value |
//! | `OAUTH_REALM` | *(unset)* | `realm` in the header |
//! | `OAUTH_HEADER_STYLE` | `quoted` | `quoted` or `form` |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result, bail};
use http::Method;
use http::header::AUTHORIZATION;
use oauthsig_auth::{RequestDescriptor, RequestSigner, SystemNonceSource};
use oauthsig_core::{OAuthConfig, SignatureMethod};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI version reported by `--version`.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str =
    "usage: oauthsig [--json] [--signature-method NAME] METHOD URL [name=value ...]";

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    signature_method: Option<SignatureMethod>,
    json: bool,
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Parse command-line arguments (without the program name).
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Invocation> {
    let mut json = false;
    let mut signature_method = None;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "-s" | "--signature-method" => {
                let name = args.next().context("--signature-method needs a value")?;
                signature_method = Some(name.parse()?);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(method), Some(url)) = (positional.next(), positional.next()) else {
        bail!("{USAGE}");
    };
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method: {method}"))?;

    let params = positional
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .with_context(|| format!("expected name=value, got {pair}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Invocation {
        method,
        url,
        params,
        signature_method,
        json,
    })
}

/// Build the request to sign from the invocation.
fn build_request(invocation: &Invocation) -> RequestDescriptor {
    let request = RequestDescriptor::new(invocation.method.clone(), invocation.url.clone());
    invocation
        .params
        .iter()
        .fold(request, |request, (name, value)| {
            if invocation.method == Method::GET {
                request.with_query_param(name, value)
            } else {
                request.with_form_param(name.as_str(), value.as_str())
            }
        })
}

/// Render the signed request for stdout.
fn render(request: &RequestDescriptor, json: bool) -> Result<String> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().context("authorization header is not ASCII"))
        .transpose()?;
    let body = (!request.body_params().is_empty()).then(|| request.form_body());

    if json {
        let value = serde_json::json!({
            "method": request.method().as_str(),
            "url": request.url(),
            "authorization": authorization,
            "body": body,
        });
        return serde_json::to_string_pretty(&value).context("failed to serialize output");
    }

    let mut lines = vec![format!("{} {}", request.method(), request.url())];
    if let Some(authorization) = authorization {
        lines.push(format!("Authorization: {authorization}"));
    }
    if let Some(body) = body {
        lines.push(String::new());
        lines.push(body);
    }
    Ok(lines.join("\n"))
}

fn main() -> Result<()> {
    if std::env::args().any(|a| a == "--version") {
        println!("oauthsig {VERSION}");
        return Ok(());
    }
    if std::env::args().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let invocation = parse_args(std::env::args().skip(1))?;
    let config = OAuthConfig::from_env().context("failed to load OAuth configuration")?;

    init_tracing(&config.log_level)?;

    let signature_method = invocation
        .signature_method
        .unwrap_or(config.signature_method);

    info!(
        consumer_key = %config.consumer_key,
        signature_method = %signature_method,
        http_method = %invocation.method,
        version = VERSION,
        "signing request",
    );

    let signer = RequestSigner::from_config(&config);
    let mut request = build_request(&invocation);
    signer
        .sign_with(&mut request, signature_method, &SystemNonceSource)
        .context("failed to sign request")?;

    println!("{}", render(&request, invocation.json)?);
    Ok(())
}
