use crate::actions::{extract_domain, PageActions};
use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::Page;
use futures::stream::StreamExt;
use pricewatch_core::BrowserConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How often `wait_for_selector` re-checks the page.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Per-domain politeness delay shared by every session of one engine.
#[derive(Debug)]
struct NavigationThrottle {
    next_slot: HashMap<String, Instant>,
    min_delay: Duration,
}

impl NavigationThrottle {
    fn new(min_delay: Duration) -> Self {
        Self {
            next_slot: HashMap::new(),
            min_delay,
        }
    }

    /// Reserve the next navigation slot for `domain` and return how long the
    /// caller must sleep before using it.
    fn reserve(&mut self, domain: &str, now: Instant) -> Duration {
        let slot = match self.next_slot.get(domain) {
            Some(next) if *next > now => *next,
            _ => now,
        };
        self.next_slot
            .insert(domain.to_string(), slot + self.min_delay);
        slot - now
    }
}

/// Browser automation engine.
///
/// Owns one Chromium process. Each adapter gets its own
/// [`BrowserSession`] (a separate tab), so sessions can run concurrently.
pub struct BrowserEngine {
    browser: Browser,
    handler: JoinHandle<()>,
    throttle: Arc<Mutex<NavigationThrottle>>,
    wait_timeout: Duration,
}

impl BrowserEngine {
    /// Launch a browser with the given settings and a randomized fingerprint
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        Self::with_fingerprint(config, FingerprintConfig::randomized()).await
    }

    /// Launch a browser with a specific fingerprint
    pub async fn with_fingerprint(
        config: &BrowserConfig,
        fingerprint: FingerprintConfig,
    ) -> Result<Self> {
        let mut builder = ChromiumConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .args(fingerprint.launch_args());

        if !config.headless {
            builder = builder.with_head();
        }

        let chromium_config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(chromium_config).await?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("browser handler event error: {}", e);
                }
            }
        });

        tracing::info!(
            headless = config.headless,
            user_agent = %fingerprint.user_agent,
            "launched browser"
        );

        Ok(Self {
            browser,
            handler,
            throttle: Arc::new(Mutex::new(NavigationThrottle::new(Duration::from_millis(
                config.min_navigation_delay_ms,
            )))),
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
        })
    }

    /// Open a fresh tab for one adapter
    pub async fn new_session(&self) -> Result<BrowserSession> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(BrowserSession {
            page,
            throttle: self.throttle.clone(),
        })
    }

    /// Default time to wait for a results grid
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Close the browser and stop its event handler
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        self.handler.abort();
        Ok(())
    }
}

/// One tab, used by exactly one adapter at a time.
pub struct BrowserSession {
    page: Page,
    throttle: Arc<Mutex<NavigationThrottle>>,
}

#[async_trait::async_trait]
impl PageActions for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        let domain = extract_domain(url)?;
        let delay = self.throttle.lock().await.reserve(&domain, Instant::now());
        if !delay.is_zero() {
            tracing::debug!(domain = %domain, ?delay, "throttling navigation");
            tokio::time::sleep(delay).await;
        }

        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn submit_field(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element.press_key("Enter").await?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.element_exists(selector).await? {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(BrowserError::Timeout {
                    selector: selector.to_string(),
                    waited_ms: started.elapsed().as_millis(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn element_exists(&self, selector: &str) -> Result<bool> {
        // find_elements errors when nothing matches
        Ok(self
            .page
            .find_elements(selector)
            .await
            .is_ok_and(|elements| !elements.is_empty()))
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }
}
