//! Thumbnail fetch-and-encode.
//!
//! The browser client cannot fetch `img.youtube.com` directly (no CORS
//! headers), so the thumbnail goes through an image proxy that returns
//! plain JPEG bytes. Failure here is never fatal: the generation request
//! simply proceeds without a reference image.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Fetch an image through the proxy and return its bytes base64-encoded.
///
/// On any failure (HTTP error status, network error, body read error) this
/// logs a warning and returns an empty string. Callers must treat `""` as
/// "no reference image available" and continue degraded.
pub async fn fetch_thumbnail_base64(
    client: &reqwest::Client,
    proxy_url: &str,
    image_url: &str,
) -> String {
    let result = async {
        let response = client
            .get(proxy_url)
            .query(&[("url", image_url), ("output", "jpg")])
            .send()
            .await?
            .error_for_status()?;
        response.bytes().await
    }
    .await;

    match result {
        Ok(bytes) => BASE64.encode(&bytes),
        Err(e) => {
            tracing::warn!(image_url, error = %e, "Thumbnail fetch failed, continuing without reference image");
            String::new()
        }
    }
}
