//! Materializing remote images as local files.
//!
//! The transpiler asks an [`ImageResolver`] for every image it meets and
//! substitutes a placeholder whenever resolution fails, so implementations
//! only need to report errors, never recover from them.

use std::path::Path;

use url::Url;

use crate::{Qa2TexError, Result};

/// Stores the resource at `url` at `dest`.
#[allow(async_fn_in_trait)]
pub trait ImageResolver {
    /// On failure `dest` must be left as it was before the call.
    async fn resolve(&self, url: &Url, dest: &Path) -> Result<()>;
}

/// Resolver that never touches the network. Every image is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl ImageResolver for OfflineResolver {
    async fn resolve(&self, url: &Url, _dest: &Path) -> Result<()> {
        Err(Qa2TexError::ImageUnavailable { url: url.to_string(), reason: "offline".to_string() })
    }
}

#[cfg(feature = "fetch")]
pub use http::HttpImageResolver;

#[cfg(feature = "fetch")]
mod http {
    use std::path::{Path, PathBuf};

    use reqwest::Client;
    use tokio::io::AsyncWriteExt;
    use url::Url;

    use super::ImageResolver;
    use crate::fetch::{FetchConfig, build_client, get_with_retry};
    use crate::{Qa2TexError, Result};

    /// Downloads images over HTTP.
    ///
    /// The body is streamed into a `.part` file next to the destination and
    /// renamed over it once complete, so a failed download never touches an
    /// existing file.
    pub struct HttpImageResolver {
        client: Client,
        config: FetchConfig,
    }

    impl HttpImageResolver {
        pub fn new(config: FetchConfig) -> Result<Self> {
            let client = build_client(&config)?;
            Ok(Self { client, config })
        }

        async fn download(&self, url: &Url, partial: &Path) -> Result<()> {
            let mut response = get_with_retry(&self.client, url, &self.config).await?;
            let mut file = tokio::fs::File::create(partial).await?;

            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;

            Ok(())
        }
    }

    fn partial_path(dest: &Path) -> PathBuf {
        let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".part");
        dest.with_file_name(name)
    }

    impl ImageResolver for HttpImageResolver {
        async fn resolve(&self, url: &Url, dest: &Path) -> Result<()> {
            let partial = partial_path(dest);

            let outcome = match self.download(url, &partial).await {
                Ok(()) => tokio::fs::rename(&partial, dest).await.map_err(Qa2TexError::from),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(()) => {
                    tracing::debug!(%url, path = %dest.display(), "image saved");
                    Ok(())
                }
                Err(err) => {
                    tokio::fs::remove_file(&partial).await.ok();
                    Err(Qa2TexError::ImageUnavailable { url: url.to_string(), reason: err.to_string() })
                }
            }
        }
    }

}
