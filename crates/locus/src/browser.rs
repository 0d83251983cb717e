//! Chromium-backed document.
//!
//! With the `browser` feature, [`ChromiumBrowser`] launches a headless
//! Chromium over CDP and hands out [`ChromiumDocument`]s that answer selector
//! queries by evaluating [`crate::Selector::to_lookup_script`] in the page.

use std::time::Duration;

/// Default time allowed for a single selector lookup
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Upper bound on one selector lookup
    pub query_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the per-query timeout
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{DocumentQuery, LookupResponse, QueryError, QueryOutcome};
    use crate::element::{ElementStore, DISCOVERY_SCRIPT};
    use crate::result::{LocusError, LocusResult};
    use crate::selector::Selector;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tracing::{debug, warn};

    /// Running Chromium instance
    #[derive(Debug)]
    pub struct ChromiumBrowser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumBrowser {
        /// Launch Chromium
        pub async fn launch(config: BrowserConfig) -> LocusResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| LocusError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| LocusError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(err) = event {
                        warn!(error = %err, "CDP handler stopped");
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Open a blank page
        pub async fn new_document(&self) -> LocusResult<ChromiumDocument> {
            let browser = self.inner.lock().await;
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| LocusError::Page {
                    message: e.to_string(),
                })?;
            Ok(ChromiumDocument {
                page: Arc::new(Mutex::new(page)),
                query_timeout: self.config.query_timeout,
            })
        }

        /// Browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> LocusResult<()> {
            {
                let mut browser = self.inner.lock().await;
                browser.close().await.map_err(|e| LocusError::Page {
                    message: e.to_string(),
                })?;
            }
            self.handle.abort();
            Ok(())
        }
    }

    /// A live page answering selector queries
    #[derive(Debug, Clone)]
    pub struct ChromiumDocument {
        page: Arc<Mutex<CdpPage>>,
        query_timeout: std::time::Duration,
    }

    impl ChromiumDocument {
        /// Navigate the page. Only called before verification starts.
        pub async fn goto(&self, url: &str) -> LocusResult<()> {
            let page = self.page.lock().await;
            page.goto(url).await.map_err(|e| LocusError::Page {
                message: format!("{url}: {e}"),
            })?;
            Ok(())
        }

        /// Collect the page's interactive elements
        pub async fn discover(&self) -> LocusResult<ElementStore> {
            let value: serde_json::Value = {
                let page = self.page.lock().await;
                page.evaluate(DISCOVERY_SCRIPT)
                    .await
                    .map_err(|e| LocusError::Page {
                        message: e.to_string(),
                    })?
                    .into_value()
                    .map_err(|e| LocusError::Page {
                        message: e.to_string(),
                    })?
            };
            ElementStore::from_value(value)
        }

        async fn lookup(&self, selector: &Selector) -> Result<LookupResponse, QueryError> {
            let page = self.page.lock().await;
            let evaluation = page
                .evaluate(selector.to_lookup_script())
                .await
                .map_err(|e| QueryError::Disconnected(e.to_string()))?;
            evaluation
                .into_value()
                .map_err(|e| QueryError::Other(e.to_string()))
        }
    }

    #[async_trait]
    impl DocumentQuery for ChromiumDocument {
        async fn query(&self, selector: &Selector) -> Result<QueryOutcome, QueryError> {
            debug!(selector = %selector, "probing page");
            match tokio::time::timeout(self.query_timeout, self.lookup(selector)).await {
                Ok(response) => response?.into_outcome(),
                Err(_) => Err(QueryError::Timeout(format!(
                    "{selector} after {:?}",
                    self.query_timeout
                ))),
            }
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumBrowser, ChromiumDocument};
