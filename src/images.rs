//! Image URL resolution against the content store's asset CDN.
//!
//! Asset references look like `image-<id>-<w>x<h>-<ext>` and map to
//! `https://cdn.sanity.io/images/<project>/<dataset>/<id>-<w>x<h>.<ext>`.
//! Transform parameters (`w`, `h`) are appended as a query string and applied
//! by the CDN, never locally.

use crate::types::ImageRef;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Full-size URL, or `None` if the image carries nothing resolvable.
    pub fn url(&self, image: &ImageRef) -> Option<String> {
        self.resolve(image, None, None)
    }

    /// URL with CDN width/height transform parameters.
    pub fn sized(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        self.resolve(image, Some(width), Some(height))
    }

    pub fn width(&self, image: &ImageRef, width: u32) -> Option<String> {
        self.resolve(image, Some(width), None)
    }

    fn resolve(&self, image: &ImageRef, width: Option<u32>, height: Option<u32>) -> Option<String> {
        let asset = image.asset.as_ref();

        // Direct URLs are already fetchable and are passed through as-is.
        if let Some(url) = asset.and_then(|a| a.url.as_deref()).or(image.url.as_deref()) {
            return Some(url.to_string());
        }

        let reference = asset.and_then(|a| a.reference.as_deref())?;
        let file = asset_file_name(reference)?;
        let mut url = format!("{CDN_BASE}/{}/{}/{file}", self.project_id, self.dataset);

        let params: Vec<String> = [("w", width), ("h", height)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| format!("{k}={v}")))
            .collect();
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        Some(url)
    }
}

/// `image-abc123-800x600-jpg` → `abc123-800x600.jpg`.
fn asset_file_name(reference: &str) -> Option<String> {
    let rest = reference.strip_prefix("image-")?;
    let (stem, ext) = rest.rsplit_once('-')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!("{stem}.{ext}"))
}
