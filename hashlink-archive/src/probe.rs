//! Existence checks against the archive host.

use std::time::Duration;

use reqwest::Url;

/// Answers whether a candidate URL currently serves a file.
///
/// Implementations must never fail: any error is a miss.
#[allow(async_fn_in_trait)]
pub trait Probe {
    async fn exists(&self, url: &str) -> bool;
}

impl<P: Probe> Probe for &P {
    async fn exists(&self, url: &str) -> bool {
        (**self).exists(url).await
    }
}

/// `HEAD` probe over HTTP. Redirects are followed and any 2xx is a hit.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hashlink/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        let Some(request_url) = request_url(url) else {
            log::debug!("Not a probeable URL: {url}");
            return false;
        };
        match self.client.head(request_url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                log::debug!("HTTP {} for {url}", resp.status());
                false
            }
            Err(e) => {
                log::debug!("Probe failed for {url}: {}", e.without_url());
                false
            }
        }
    }
}

/// Percent-encode a human-readable candidate URL one path segment at a time.
///
/// Characters such as `#`, `?` and `%` in file names stay in the path.
pub fn request_url(candidate: &str) -> Option<Url> {
    let authority_start = candidate.find("://")? + 3;
    let path_start = candidate[authority_start..]
        .find('/')
        .map_or(candidate.len(), |i| authority_start + i);

    let mut url = Url::parse(&candidate[..path_start]).ok()?;
    let path = candidate[path_start..].trim_start_matches('/');
    if !path.is_empty() {
        url.path_segments_mut().ok()?.clear().extend(path.split('/'));
    }
    Some(url)
}
