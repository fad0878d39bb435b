use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::Page as CrPage;
use chromiumoxide::page::ScreenshotParams;

use crate::config::WAIT_TIMEOUT;
use crate::element::Element;
use crate::error::{Error, Result};

/// Scroll geometry of the current document.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub scroll_y: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

/// A heading element and whether any part of it is inside the viewport.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingInfo {
    pub text: String,
    pub in_view: bool,
}

/// An element carrying `aria-expanded="false"` (a closed disclosure widget).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CollapsedElement {
    pub role: String,
    pub label: String,
}

/// Wrapper around a chromiumoxide Page with the observation and action
/// surface the commands need.
pub struct Page {
    inner: CrPage,
}

impl Page {
    pub(crate) fn new(inner: CrPage) -> Self {
        Self { inner }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Navigate to the given URL and wait for the load to finish.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Reload the current page.
    pub async fn reload(&self) -> Result<()> {
        self.inner
            .reload()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Get the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.inner
            .url()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .ok_or_else(|| Error::NavigationError("No URL found".into()))
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(result.into_value::<String>().unwrap_or_default())
    }

    /// Get the page's origin (`location.origin`).
    pub async fn origin(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("location.origin")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        result
            .into_value::<String>()
            .map_err(|e| Error::JsError(e.to_string()))
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Click the first element matching the given CSS selector.
    pub async fn click(&self, selector: &str) -> Result<()> {
        let el = self.find_element(selector).await?;
        el.click().await
    }

    /// Click and type text into the first element matching the selector.
    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let el = self.find_element(selector).await?;
        el.click().await?;
        el.type_text(text).await
    }

    /// Press a key (e.g. "Enter", "Tab", "Escape") on the focused element.
    pub async fn press_key(&self, key: &str) -> Result<()> {
        let el = self.find_element("body").await?;
        el.press_key(key).await
    }

    /// Wait for an element matching the selector to appear, polling every
    /// 100ms up to the default wait timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<Element> {
        let interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            match self.find_element(selector).await {
                Ok(el) => return Ok(el),
                Err(_) if start.elapsed() < WAIT_TIMEOUT => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    return Err(Error::Timeout(format!(
                        "selector did not appear: {selector}"
                    )));
                }
            }
        }
    }

    // ── Observations ────────────────────────────────────────────────

    /// Take a full-page screenshot (PNG) and save it to a file.
    pub async fn screenshot_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.inner
            .save_screenshot(params, path)
            .await
            .map_err(|e| Error::ScreenshotError(e.to_string()))?;
        Ok(())
    }

    /// Get the full HTML content of the page.
    pub async fn html(&self) -> Result<String> {
        self.inner
            .content()
            .await
            .map_err(|e| Error::JsError(e.to_string()))
    }

    /// Current scroll offset, document height and viewport height.
    pub async fn metrics(&self) -> Result<PageMetrics> {
        let js = r#"
            JSON.stringify({
                scrollY: window.scrollY,
                documentHeight: document.documentElement.scrollHeight,
                viewportHeight: window.innerHeight
            })
        "#;
        self.eval_json(js).await
    }

    /// All headings on the page with their viewport visibility.
    pub async fn headings(&self) -> Result<Vec<HeadingInfo>> {
        let js = r#"
            JSON.stringify(
                Array.from(document.querySelectorAll('h1,h2,h3,h4,h5,h6,[role="heading"]'))
                    .map(el => {
                        const rect = el.getBoundingClientRect();
                        return {
                            text: (el.innerText || '').trim(),
                            inView: rect.bottom > 0 && rect.top < window.innerHeight
                        };
                    })
                    .filter(h => h.text)
            )
        "#;
        self.eval_json(js).await
    }

    /// Elements flagged `aria-expanded="false"`.
    pub async fn collapsed_elements(&self) -> Result<Vec<CollapsedElement>> {
        let js = r#"
            JSON.stringify(
                Array.from(document.querySelectorAll('[aria-expanded="false"]')).map(el => ({
                    role: el.getAttribute('role') || el.tagName.toLowerCase(),
                    label: (el.getAttribute('aria-label') || el.innerText || '')
                        .trim().replace(/\s+/g, ' ').substring(0, 80)
                }))
            )
        "#;
        self.eval_json(js).await
    }

    /// Build the indented accessibility-tree text for the page.
    ///
    /// One line per semantic element, shaped `- role "name"`, nested at two
    /// spaces per level. Landmarks and other elements with nested content
    /// carry a trailing colon.
    pub async fn aria_snapshot(&self) -> Result<String> {
        let js = r#"
            JSON.stringify((function() {
                const landmarkTags = {
                    nav: 'navigation', header: 'banner', footer: 'contentinfo',
                    main: 'main', aside: 'complementary', section: 'region', form: 'form'
                };
                function roleOf(el) {
                    const explicit = el.getAttribute('role');
                    if (explicit) return explicit;
                    const tag = el.tagName.toLowerCase();
                    if (landmarkTags[tag]) return landmarkTags[tag];
                    if (/^h[1-6]$/.test(tag)) return 'heading';
                    if (tag === 'a' && el.hasAttribute('href')) return 'link';
                    if (tag === 'button') return 'button';
                    if (tag === 'select') return 'combobox';
                    if (tag === 'textarea') return 'textbox';
                    if (tag === 'input') {
                        const type = (el.type || 'text').toLowerCase();
                        if (type === 'hidden') return null;
                        if (type === 'search') return 'searchbox';
                        if (type === 'submit' || type === 'button') return 'button';
                        if (type === 'checkbox') return 'checkbox';
                        if (type === 'radio') return 'radio';
                        return 'textbox';
                    }
                    return null;
                }
                function nameOf(el) {
                    const aria = el.getAttribute('aria-label');
                    if (aria) return aria.trim();
                    const tag = el.tagName.toLowerCase();
                    if (tag === 'input' || tag === 'textarea' || tag === 'select') {
                        if (el.placeholder) return el.placeholder.trim();
                        if (el.id) {
                            const label = document.querySelector('label[for="' + el.id + '"]');
                            if (label) return (label.innerText || '').trim();
                        }
                        return (el.name || '').trim();
                    }
                    return (el.innerText || el.value || el.getAttribute('alt') ||
                            el.getAttribute('title') || '')
                        .trim().replace(/\s+/g, ' ').substring(0, 80);
                }
                function walk(el, depth) {
                    const tag = el.tagName ? el.tagName.toLowerCase() : '';
                    if (['script', 'style', 'noscript', 'template', 'head'].includes(tag)) return [];
                    if (el.nodeType !== Node.ELEMENT_NODE) return [];
                    const style = window.getComputedStyle(el);
                    if (style.display === 'none' || style.visibility === 'hidden') return [];

                    const role = roleOf(el);
                    const childDepth = role ? depth + 1 : depth;
                    const childLines = [];
                    for (const child of el.children) {
                        childLines.push(...walk(child, childDepth));
                    }
                    if (!role) return childLines;

                    const name = nameOf(el);
                    let line = '  '.repeat(depth) + '- ' + role;
                    if (name) line += ' "' + name.replace(/"/g, "'") + '"';
                    if (childLines.length) line += ':';
                    return [line].concat(childLines);
                }
                const root = document.body || document.documentElement;
                return root ? walk(root, 0).join('\n') : '';
            })())
        "#;
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        result
            .into_value::<String>()
            .map_err(|e| Error::JsError(e.to_string()))
    }

    /// Evaluate a JavaScript expression and return the result as a string.
    pub async fn evaluate(&self, expression: &str) -> Result<String> {
        let result = self
            .inner
            .evaluate(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.value() {
            Some(val) => Ok(val.to_string()),
            None => Ok(String::new()),
        }
    }

    /// Evaluate a JavaScript expression, discarding the result.
    pub async fn evaluate_void(&self, expression: &str) -> Result<()> {
        self.inner
            .evaluate(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(())
    }

    // ── Element Queries ─────────────────────────────────────────────

    /// Find the first element matching the given CSS selector.
    pub async fn find_element(&self, selector: &str) -> Result<Element> {
        let el = self
            .inner
            .find_element(selector)
            .await
            .map_err(|_| Error::ElementNotFound(selector.to_string()))?;
        Ok(Element::new(el, selector))
    }

    /// Evaluate JS that returns `JSON.stringify(...)` and deserialize it.
    pub(crate) async fn eval_json<T: serde::de::DeserializeOwned>(&self, js: &str) -> Result<T> {
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        let json_str: String = result
            .into_value()
            .map_err(|e| Error::JsError(e.to_string()))?;
        serde_json::from_str(&json_str).map_err(|e| Error::JsError(e.to_string()))
    }
}
