use std::path::PathBuf;

use tracing::info;

use crate::config::CONNECT_TIMEOUT;
use crate::connection;
use crate::error::Result;
use crate::session::SessionStore;

pub async fn run(store: &SessionStore, session: &str) -> Result<()> {
    let attachment = connection::attach(store, session, CONNECT_TIMEOUT).await?;
    let page = attachment.active_page().await?;

    let title = page.title().await?;
    let stem = file_stem(&title, &chrono::Utc::now().to_rfc3339());
    let png_path = PathBuf::from(format!("{stem}.png"));
    let html_path = PathBuf::from(format!("{stem}.html"));

    page.screenshot_to_file(&png_path).await?;
    std::fs::write(&html_path, page.html().await?)?;

    info!(session, "screenshot captured");
    println!("Wrote {} and {}", png_path.display(), html_path.display());
    Ok(())
}

/// Build the shared file stem: sanitized title plus the timestamp with
/// `:` and `.` replaced so the name is safe on every filesystem.
fn file_stem(title: &str, timestamp: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('-');
    let title_part = if cleaned.is_empty() { "page" } else { cleaned };
    format!(
        "{title_part}-{}",
        timestamp.replace(':', "-").replace('.', "-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_sanitizes_title_and_timestamp() {
        let stem = file_stem("My Page: Dashboard", "2026-08-05T12:30:45.123456Z");
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
        assert!(stem.starts_with("My-Page--Dashboard-2026-08-05T12-30-45"));
    }

    #[test]
    fn empty_title_falls_back_to_page() {
        let stem = file_stem("", "2026-08-05T00:00:00Z");
        assert!(stem.starts_with("page-"));
    }
}
