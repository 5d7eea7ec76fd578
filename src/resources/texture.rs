use std::{io::Cursor, path::Path};

use base64::Engine;

use crate::{data_structures::texture::TextureInfo, error::ViewerError};

/// True for sources that have to go through HTTP (or the browser's fetch).
pub fn is_remote(url: &str) -> bool {
    ["http://", "https://", "blob:"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

/// Resolves `uri` (as written inside a glTF document) relative to the model at `model_url`.
pub fn relative_to(model_url: &str, uri: &str) -> String {
    if uri.starts_with("data:") || is_remote(uri) || Path::new(uri).is_absolute() {
        return uri.to_string();
    }
    match model_url.rfind('/') {
        Some(idx) => format!("{}/{}", &model_url[..idx], uri),
        None => uri.to_string(),
    }
}

/// Decodes a base64 `data:` URI. Returns `None` for every other kind of uri.
pub fn decode_data_uri(uri: &str) -> Option<anyhow::Result<Vec<u8>>> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = match rest.split_once(',') {
        Some(parts) => parts,
        None => return Some(Err(anyhow::anyhow!("malformed data uri"))),
    };
    if !header.ends_with(";base64") {
        return Some(Err(anyhow::anyhow!(
            "only base64 data uris are supported, got `{}`",
            header
        )));
    }
    Some(
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(anyhow::Error::from),
    )
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    if is_remote(file_name) {
        return Ok(reqwest::Url::parse(file_name)?);
    }
    let origin = web_sys::window()
        .ok_or_else(|| anyhow::anyhow!("no window available"))?
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("window location has no origin"))?;
    let base = reqwest::Url::parse(&format!("{}/", origin))?;
    Ok(base.join(file_name)?)
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch(url: &str, assets_dir: &Path) -> anyhow::Result<Vec<u8>> {
    if is_remote(url) {
        let response = reqwest::get(url).await?.error_for_status()?;
        return Ok(response.bytes().await?.to_vec());
    }
    let path = assets_dir.join(url);
    Ok(tokio::fs::read(path).await?)
}

#[cfg(target_arch = "wasm32")]
async fn fetch(url: &str, _assets_dir: &Path) -> anyhow::Result<Vec<u8>> {
    let url = format_url(url)?;
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/**
 * Reads the bytes behind `url`. `data:` URIs are decoded in place; remote
 * URLs go through `reqwest`; anything else is a path below `assets_dir`
 * (natively) or below the page origin (on the web).
 */
pub async fn load_binary(url: &str, assets_dir: &Path) -> anyhow::Result<Vec<u8>> {
    if let Some(decoded) = decode_data_uri(url) {
        return decoded;
    }
    fetch(url, assets_dir).await.map_err(|e| {
        ViewerError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Reads the dimensions of an encoded image without decoding its pixels.
/// Returns `None` when the image format is unknown or its header is broken.
pub fn texture_info(name: Option<&str>, bytes: &[u8]) -> Option<TextureInfo> {
    let dimensions = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::from)
        .and_then(|reader| reader.into_dimensions());
    match dimensions {
        Ok((width, height)) => Some(TextureInfo::new(name.map(str::to_string), width, height)),
        Err(e) => {
            log::warn!("Dropping texture {:?}, it could not be decoded: {}", name, e);
            None
        }
    }
}
