use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Uri};
#[cfg(not(feature = "rustls-platform-verifier"))]
use hyper_rustls::ConfigBuilderExt;
use hyper_util::{
    client::legacy::{
        connect::{Connect, HttpConnector},
        Client,
    },
    rt::TokioExecutor,
};
use once_cell::sync::Lazy;
use rustls::ClientConfig;
#[cfg(feature = "rustls-platform-verifier")]
use rustls_platform_verifier::BuilderVerifierExt;
use std::{collections::HashMap, fmt, sync::Arc};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status: u16,
    /// Canonical reason phrase of `status`, empty for non-standard codes.
    pub status_text: String,
    pub body: Bytes,
}

impl ResponseData {
    /// True for 2xx codes only.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Display for ResponseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response status: {} {}, body: {}",
            self.status,
            self.status_text,
            String::from_utf8_lossy(&self.body)
        )
    }
}

pub async fn get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError> {
    if url.scheme_str() == Some("https") {
        https_get(url, header_map).await
    } else {
        http_get(url, header_map).await
    }
}

pub async fn http_get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError> {
    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    send_get(&client, url, header_map).await
}

pub async fn https_get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError> {
    let client = Client::builder(TokioExecutor::new()).build(https_connector()?);
    send_get(&client, url, header_map).await
}

async fn send_get<C>(
    client: &Client<C, Empty<Bytes>>,
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    tracing::debug!(%url, "GET");
    let mut req = hyper::Request::builder().method(Method::GET).uri(url);
    for (key, value) in header_map {
        req = req.header(key, value);
    }
    let req = req.body(Empty::<Bytes>::new())?;

    let res = client.request(req).await?;
    let status = res.status();
    let body = res.into_body().collect().await?.to_bytes();
    Ok(ResponseData {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

static TLS_PROVIDER: Lazy<Arc<rustls::crypto::CryptoProvider>> =
    Lazy::new(|| Arc::new(rustls::crypto::ring::default_provider()));

fn https_connector() -> Result<hyper_rustls::HttpsConnector<HttpConnector>, BoxError> {
    let provider = TLS_PROVIDER.clone();
    let tls: ClientConfig;
    #[cfg(feature = "rustls-platform-verifier")]
    {
        tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_platform_verifier()?
            .with_no_client_auth();
    }
    #[cfg(all(feature = "webpki-roots", not(feature = "rustls-platform-verifier")))]
    {
        tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_webpki_roots()
            .with_no_client_auth();
    }
    #[cfg(all(
        feature = "native-tokio",
        not(feature = "webpki-roots"),
        not(feature = "rustls-platform-verifier")
    ))]
    {
        tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_native_roots()?
            .with_no_client_auth();
    }
    #[cfg(all(
        not(feature = "native-tokio"),
        not(feature = "webpki-roots"),
        not(feature = "rustls-platform-verifier")
    ))]
    {
        compile_error!("No TLS backend enabled");
    }
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build())
}
