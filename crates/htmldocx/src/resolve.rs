//! Image resolution: fetch, measure and scale every image leaf.
//!
//! Resolution is a pure transform over an owned tree. Image sources are
//! collected in document order, resolved concurrently without touching the
//! tree, and the results are written back once every task has settled.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use htmldocx_core::ImageSize;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::node::{ParseNode, ResolvedImage};
use crate::utilities::is_remote_source;

/// Default bounding box for scaled images
pub const DEFAULT_MAX_IMAGE_SIZE: ImageSize = ImageSize::new(600.0, 600.0);

/// Size used when an image cannot be measured
pub const FALLBACK_IMAGE_SIZE: ImageSize = ImageSize::new(10.0, 10.0);

/// Leading bytes read when measuring; enough for the header of common formats
const HEADER_PREFIX_LEN: u64 = 64 * 1024;

/// Failure to fetch or measure a single image
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {src}")]
    Status { src: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read image header: {0}")]
    Header(#[source] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Where image bytes and intrinsic sizes come from
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Raw bytes of the resource
    async fn fetch(&self, src: &str) -> Result<Bytes, ResolveError>;

    /// Intrinsic pixel size of the resource
    async fn measure(&self, src: &str) -> Result<ImageSize, ResolveError> {
        let bytes = self.fetch(src).await?;
        decode_dimensions(&bytes)
    }
}

/// Decode only the header of an encoded image to read its pixel size
pub fn decode_dimensions(bytes: &[u8]) -> Result<ImageSize, ResolveError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ResolveError::Header)?;
    let (width, height) = reader.into_dimensions()?;
    Ok(ImageSize::new(f64::from(width), f64::from(height)))
}

/// Loads `http(s)` sources over the network and everything else from disk
#[derive(Debug, Clone, Default)]
pub struct DefaultImageSource {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl DefaultImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative file sources against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_dir: None,
        }
    }

    fn local_path(&self, src: &str) -> PathBuf {
        let src = src.strip_prefix("file://").unwrap_or(src);
        let path = Path::new(src);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ImageSource for DefaultImageSource {
    async fn fetch(&self, src: &str) -> Result<Bytes, ResolveError> {
        if is_remote_source(src) {
            let response = self.client.get(src).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ResolveError::Status {
                    src: src.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(response.bytes().await?)
        } else {
            let path = self.local_path(src);
            tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|source| ResolveError::Io { path, source })
        }
    }

    /// Reads only the leading bytes of the resource. When the header does not
    /// fit the prefix the whole resource is fetched and decoded.
    async fn measure(&self, src: &str) -> Result<ImageSize, ResolveError> {
        let prefix = self.fetch_prefix(src).await?;
        match decode_dimensions(&prefix) {
            Ok(size) => Ok(size),
            Err(err) if (prefix.len() as u64) < HEADER_PREFIX_LEN => Err(err),
            Err(err) => {
                debug!(%src, error = %err, "header not in prefix, fetching whole image");
                let bytes = self.fetch(src).await?;
                decode_dimensions(&bytes)
            }
        }
    }
}

impl DefaultImageSource {
    /// At most [`HEADER_PREFIX_LEN`] leading bytes of the resource
    async fn fetch_prefix(&self, src: &str) -> Result<Bytes, ResolveError> {
        let limit = HEADER_PREFIX_LEN as usize;

        if is_remote_source(src) {
            let mut response = self
                .client
                .get(src)
                .header(reqwest::header::RANGE, format!("bytes=0-{}", limit - 1))
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ResolveError::Status {
                    src: src.to_string(),
                    status: status.as_u16(),
                });
            }

            // Servers ignoring the range send the whole body; stop reading early
            let mut buf = Vec::with_capacity(limit);
            while buf.len() < limit {
                match response.chunk().await? {
                    Some(chunk) => buf.extend_from_slice(&chunk),
                    None => break,
                }
            }
            buf.truncate(limit);
            Ok(Bytes::from(buf))
        } else {
            let path = self.local_path(src);
            let file = match tokio::fs::File::open(&path).await {
                Ok(file) => file,
                Err(source) => return Err(ResolveError::Io { path, source }),
            };
            let mut buf = Vec::new();
            match file.take(HEADER_PREFIX_LEN).read_to_end(&mut buf).await {
                Ok(_) => Ok(Bytes::from(buf)),
                Err(source) => Err(ResolveError::Io { path, source }),
            }
        }
    }
}

/// Limits applied while resolving images
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Bounding box images are scaled into
    pub max_size: ImageSize,
    /// Size substituted when measuring fails
    pub fallback_size: ImageSize,
    /// Per-image limit on fetching and measuring, `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_IMAGE_SIZE,
            fallback_size: FALLBACK_IMAGE_SIZE,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Scale `actual` down into `max`.
///
/// Width is clamped first. The height is then checked again against the
/// bound, scaling the width by the same ratio when it still overflows.
pub fn resize(actual: ImageSize, max: ImageSize) -> ImageSize {
    let mut scaled = actual;

    if scaled.width > max.width {
        scaled.width = max.width;
        scaled.height = max.width * actual.height / actual.width;
    }
    if scaled.height > max.height {
        scaled.width = max.height * scaled.width / scaled.height;
        scaled.height = max.height;
    }

    scaled
}

/// Resolve every image leaf of `nodes`.
///
/// All images are fetched and measured concurrently; this returns only once
/// every image has either resolved or fallen back. Failures never abort the
/// batch: an image that could not be fetched keeps `resolved = None`, one that
/// could not be measured gets the fallback size.
pub async fn resolve_images<S>(
    mut nodes: Vec<ParseNode>,
    source: &S,
    options: &ResolveOptions,
) -> Vec<ParseNode>
where
    S: ImageSource + ?Sized,
{
    let mut sources = Vec::new();
    for node in &nodes {
        node.for_each_image(&mut |image| sources.push(image.src.clone()));
    }

    if sources.is_empty() {
        return nodes;
    }

    debug!(count = sources.len(), "resolving images");
    let resolved = join_all(sources.iter().map(|src| resolve_one(source, src, options))).await;

    let mut results = resolved.into_iter();
    for node in &mut nodes {
        node.for_each_image_mut(&mut |image| {
            image.resolved = results.next().flatten();
        });
    }

    nodes
}

async fn resolve_one<S>(source: &S, src: &str, options: &ResolveOptions) -> Option<ResolvedImage>
where
    S: ImageSource + ?Sized,
{
    let work = async { tokio::join!(source.fetch(src), source.measure(src)) };

    let (fetched, measured) = match options.timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(results) => results,
            Err(_) => {
                warn!(%src, error = %ResolveError::Timeout(limit), "image resolution failed");
                return None;
            }
        },
        None => work.await,
    };

    let scaled = match measured {
        Ok(natural) => Some((natural, resize(natural, options.max_size))),
        Err(err) => {
            warn!(%src, error = %err, "failed to measure image, using fallback size");
            None
        }
    };

    let data = match fetched {
        Ok(data) => data,
        Err(err) => {
            warn!(%src, error = %err, "failed to fetch image");
            return None;
        }
    };

    debug!(%src, bytes = data.len(), "image resolved");
    Some(match scaled {
        Some((natural, scaled)) => ResolvedImage {
            data,
            natural: Some(natural),
            scaled,
        },
        None => ResolvedImage {
            data,
            natural: None,
            scaled: options.fallback_size,
        },
    })
}
