//! Chromium renderer via chromiumoxide.
//!
//! One browser process is shared by every render. It is launched on first
//! use, relaunched if its connection drops, and closed once by
//! [`PageRenderer::shutdown`]. Each render gets its own browser context, so
//! cookies and cache never leak between calls.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{PageRenderer, RenderError, RenderRequest};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Default)]
pub struct BrowserLaunchOptions {
    /// Explicit executable; chromiumoxide's own detection is used otherwise.
    pub chromium_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unstarted,
    Running,
    Stopped,
}

struct RunningEngine {
    browser: Arc<Browser>,
    connected: Arc<AtomicBool>,
    handler_task: JoinHandle<()>,
}

enum Engine {
    Unstarted,
    Running(RunningEngine),
    Stopped,
}

/// Owns the shared browser process. The engine mutex doubles as the
/// initialization guard: concurrent first renders launch one process.
pub struct BrowserManager {
    options: BrowserLaunchOptions,
    engine: Mutex<Engine>,
    launches: AtomicU32,
}

impl BrowserManager {
    #[must_use]
    pub fn new(options: BrowserLaunchOptions) -> Self {
        Self {
            options,
            engine: Mutex::new(Engine::Unstarted),
            launches: AtomicU32::new(0),
        }
    }

    pub async fn state(&self) -> EngineState {
        match &*self.engine.lock().await {
            Engine::Unstarted => EngineState::Unstarted,
            Engine::Running(_) => EngineState::Running,
            Engine::Stopped => EngineState::Stopped,
        }
    }

    /// Browser processes launched so far, relaunches included.
    pub fn launch_count(&self) -> u32 {
        self.launches.load(Ordering::SeqCst)
    }

    /// Return the running browser, launching (or relaunching after a
    /// disconnect) while holding the engine lock.
    async fn acquire(&self) -> Result<Arc<Browser>, RenderError> {
        let mut engine = self.engine.lock().await;
        match &*engine {
            Engine::Stopped => return Err(RenderError::Stopped),
            Engine::Running(running) if running.connected.load(Ordering::SeqCst) => {
                return Ok(Arc::clone(&running.browser));
            }
            Engine::Running(_) => {
                tracing::warn!("browser connection lost, relaunching");
            }
            Engine::Unstarted => {
                tracing::info!("launching headless browser");
            }
        }

        let running = launch(&self.options).await?;
        let launches = self.launches.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(launches, "headless browser launched");
        let browser = Arc::clone(&running.browser);
        if let Engine::Running(stale) = std::mem::replace(&mut *engine, Engine::Running(running)) {
            stale.handler_task.abort();
        }
        Ok(browser)
    }
}

async fn launch(options: &BrowserLaunchOptions) -> Result<RunningEngine, RenderError> {
    let mut builder = BrowserConfig::builder()
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg("--disable-background-networking");
    if let Some(path) = &options.chromium_path {
        builder = builder.chrome_executable(path);
    }
    let config = builder.build().map_err(RenderError::Launch)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| RenderError::Launch(e.to_string()))?;

    let connected = Arc::new(AtomicBool::new(true));
    let connected_flag = Arc::clone(&connected);
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(error) = event {
                tracing::debug!(%error, "browser handler error");
            }
        }
        connected_flag.store(false, Ordering::SeqCst);
    });

    Ok(RunningEngine {
        browser: Arc::new(browser),
        connected,
        handler_task,
    })
}

#[async_trait]
impl PageRenderer for BrowserManager {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<String, RenderError> {
        let browser = self.acquire().await?;
        render_isolated(browser.as_ref(), request).await
    }

    async fn shutdown(&self) {
        let mut engine = self.engine.lock().await;
        let Engine::Running(running) = std::mem::replace(&mut *engine, Engine::Stopped) else {
            return;
        };

        match Arc::try_unwrap(running.browser) {
            Ok(mut browser) => {
                if let Err(error) = browser.close().await {
                    tracing::warn!(%error, "failed to close browser cleanly");
                }
                if let Err(error) = browser.wait().await {
                    tracing::debug!(%error, "failed waiting for browser exit");
                }
            }
            Err(_) => {
                tracing::warn!("browser still referenced by an in-flight render; dropping handle");
            }
        }
        running.handler_task.abort();
        tracing::info!("headless browser stopped");
    }
}

/// Something that can open an isolated browsing context, render a page in
/// it and dispose of it again.
#[async_trait]
trait ContextHost: Send + Sync {
    type Context: Send + Sync;

    async fn open_context(&self) -> Result<Self::Context, RenderError>;

    async fn render_in(
        &self,
        context: &Self::Context,
        request: &RenderRequest<'_>,
    ) -> Result<String, RenderError>;

    async fn dispose_context(&self, context: Self::Context);
}

/// Open a context, render into it, and dispose of it whether or not the
/// render succeeded.
async fn render_isolated<H: ContextHost + ?Sized>(
    host: &H,
    request: &RenderRequest<'_>,
) -> Result<String, RenderError> {
    let context = host.open_context().await?;
    let outcome = host.render_in(&context, request).await;
    host.dispose_context(context).await;
    outcome
}

#[async_trait]
impl ContextHost for Browser {
    type Context = BrowserContextId;

    async fn open_context(&self) -> Result<BrowserContextId, RenderError> {
        Ok(self
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| RenderError::Context(e.to_string()))?
            .result
            .browser_context_id)
    }

    async fn render_in(
        &self,
        context: &BrowserContextId,
        request: &RenderRequest<'_>,
    ) -> Result<String, RenderError> {
        render_in_context(self, context, request).await
    }

    async fn dispose_context(&self, context: BrowserContextId) {
        if let Err(error) = self.execute(DisposeBrowserContextParams::new(context)).await {
            tracing::warn!(%error, "failed to dispose browsing context");
        }
    }
}

async fn render_in_context(
    browser: &Browser,
    context_id: &BrowserContextId,
    request: &RenderRequest<'_>,
) -> Result<String, RenderError> {
    let mut params = CreateTargetParams::new("about:blank");
    params.browser_context_id = Some(context_id.clone());
    let page = browser
        .new_page(params)
        .await
        .map_err(|e| RenderError::Context(e.to_string()))?;

    let outcome = load_and_capture(&page, request).await;

    if let Err(error) = page.close().await {
        tracing::debug!(url = request.url, %error, "failed to close page");
    }
    outcome
}

async fn load_and_capture(page: &Page, request: &RenderRequest<'_>) -> Result<String, RenderError> {
    match tokio::time::timeout(request.nav_timeout, page.goto(request.url)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            return Err(RenderError::Navigation {
                url: request.url.to_owned(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(RenderError::NavigationTimeout {
                url: request.url.to_owned(),
                timeout_secs: request.nav_timeout.as_secs(),
            })
        }
    }

    tokio::time::sleep(request.settle).await;

    if let Some(selector) = request.wait_for {
        let appeared = tokio::time::timeout(request.selector_wait, async {
            while page.find_element(selector).await.is_err() {
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        })
        .await;
        if appeared.is_err() {
            tracing::debug!(url = request.url, selector, "selector did not appear; continuing");
        }
    }

    page.evaluate("document.documentElement.outerHTML")
        .await
        .map_err(|e| RenderError::Evaluate(e.to_string()))?
        .into_value::<String>()
        .map_err(|e| RenderError::Evaluate(e.to_string()))
}
