use std::fs;
use std::path::PathBuf;

use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::storage::{GetCookiesParams, SetCookiesParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::SAVE_SETTLE;
use crate::connection::Attachment;
use crate::error::{Error, Result};
use crate::page::Page;

/// Persisted authentication/state snapshot for one domain, structurally
/// compatible with the standard storage-state import format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub cookies: Vec<Value>,
    pub origins: Vec<OriginState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
    pub origin: String,
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

/// Reduce a URL or bare domain to its profile key: host only, scheme and
/// leading `www.` stripped.
pub fn normalize_domain(target: &str) -> String {
    let host = match url::Url::parse(target) {
        Ok(u) if u.host_str().is_some() => u.host_str().unwrap_or_default().to_string(),
        _ => {
            let t = target.trim();
            let t = t
                .strip_prefix("https://")
                .or_else(|| t.strip_prefix("http://"))
                .unwrap_or(t);
            let t = t.split('/').next().unwrap_or(t);
            t.split(':').next().unwrap_or(t).to_string()
        }
    };
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// One profile file per normalized domain. Each save fully replaces the
/// prior file; profiles are never merged.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn open_default() -> Self {
        Self::new(crate::config::profiles_dir())
    }

    fn profile_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{domain}.json"))
    }

    /// Missing and unparsable files both read as absent.
    pub fn load(&self, domain: &str) -> Option<Profile> {
        let content = fs::read_to_string(self.profile_path(domain)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save(&self, domain: &str, profile: &Profile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(profile)?;
        fs::write(self.profile_path(domain), content)?;
        Ok(())
    }
}

/// Remove object-valued `partitionKey` fields, which do not belong in the
/// persisted format.
fn strip_partition_keys(cookies: &mut [Value]) {
    for cookie in cookies.iter_mut() {
        if let Value::Object(map) = cookie {
            if map.get("partitionKey").is_some_and(Value::is_object) {
                map.remove("partitionKey");
            }
        }
    }
}

const READ_LOCAL_STORAGE_JS: &str = r#"
    JSON.stringify((() => {
        const entries = [];
        for (let i = 0; i < localStorage.length; i++) {
            const name = localStorage.key(i);
            entries.push({ name: name, value: localStorage.getItem(name) });
        }
        return { origin: location.origin, localStorage: entries };
    })())
"#;

/// Capture cookies and per-origin local storage from a live attachment.
///
/// Cookies come from a direct `Storage.getCookies` protocol command issued
/// on the active page; the high-level cookie API does not function over an
/// attached (as opposed to launched) browser handle. Pages that throw while
/// inspected are skipped, not fatal.
pub async fn capture(attachment: &Attachment) -> Result<Profile> {
    // Let pending storage writes flush before reading.
    tokio::time::sleep(SAVE_SETTLE).await;

    let page = attachment.active_page().await?;
    let resp = page
        .inner()
        .execute(GetCookiesParams::builder().build())
        .await
        .map_err(Error::CdpError)?;

    let mut cookies = match serde_json::to_value(&resp.result.cookies)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    strip_partition_keys(&mut cookies);

    let mut origins: Vec<OriginState> = Vec::new();
    for page in attachment.pages().await? {
        let state: OriginState = match page.eval_json(READ_LOCAL_STORAGE_JS).await {
            Ok(state) => state,
            Err(err) => {
                debug!(error = %err, "skipping page during local-storage collection");
                continue;
            }
        };
        if state.local_storage.is_empty() {
            continue;
        }
        if origins.iter().any(|o| o.origin == state.origin) {
            continue;
        }
        origins.push(state);
    }

    Ok(Profile { cookies, origins })
}

/// Apply a saved profile to a freshly launched browser: install cookies,
/// seed local storage for the active page's origin, then reload so the
/// first authenticated render happens before control is handed back.
pub async fn apply(attachment: &Attachment, profile: &Profile) -> Result<()> {
    let page = attachment.active_page().await?;

    let params: Vec<CookieParam> = profile
        .cookies
        .iter()
        .filter_map(|c| serde_json::from_value(c.clone()).ok())
        .collect();
    if !params.is_empty() {
        page.inner()
            .execute(SetCookiesParams::new(params))
            .await
            .map_err(Error::CdpError)?;
    }

    let origin = page.origin().await.unwrap_or_default();
    if let Some(state) = profile.origins.iter().find(|o| o.origin == origin) {
        seed_local_storage(&page, state).await?;
    }

    page.reload().await
}

async fn seed_local_storage(page: &Page, state: &OriginState) -> Result<()> {
    let mut js = String::from("(() => {\n");
    for entry in &state.local_storage {
        js.push_str(&format!(
            "  localStorage.setItem({}, {});\n",
            serde_json::to_string(&entry.name)?,
            serde_json::to_string(&entry.value)?,
        ));
    }
    js.push_str("})()");
    page.evaluate_void(&js).await
}
