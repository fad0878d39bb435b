//! Accessibility-snapshot summarization.
//!
//! Turns the raw indented accessibility-tree text into an enriched report:
//! URL/title/scroll header, a landmark region map cross-referenced with
//! heading visibility, and a ranked shortlist of interactive elements. The
//! raw tree is always appended verbatim — the summary is additive, and the
//! tree stays the ground truth for element targeting.

use std::collections::HashMap;

use crate::error::Result;
use crate::page::{CollapsedElement, HeadingInfo, Page, PageMetrics};

/// Landmark roles that open a region-map section at depth 0.
const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "navigation",
    "main",
    "contentinfo",
    "complementary",
    "region",
];

/// Roles eligible for the action deck.
const ACTION_ROLES: &[&str] = &["button", "link", "textbox", "searchbox", "combobox"];

/// Keywords suggesting an element advances the user's task.
const INTENT_KEYWORDS: &[&str] = &[
    "submit", "continue", "next", "save", "apply", "create", "sign",
];

const BUTTON_BONUS: i32 = 2;
const INTENT_BONUS: i32 = 3;
const DEMO_BONUS: i32 = 1;

const MAX_ACTIONS: usize = 8;
const MAX_COLLAPSED: usize = 5;

/// Remaining scroll distance below which "(more below)" is not shown.
const MORE_BELOW_THRESHOLD: f64 = 100.0;

/// Everything collected from a page in one pass, input to [`build_report`].
pub struct PageObservation {
    pub url: String,
    pub title: String,
    pub metrics: PageMetrics,
    pub tree: String,
    pub headings: Vec<HeadingInfo>,
    pub collapsed: Vec<CollapsedElement>,
}

/// Collect everything the report needs from the live page.
pub async fn observe(page: &Page) -> Result<PageObservation> {
    let url = page.url().await?;
    let title = page.title().await?;
    let metrics = page.metrics().await?;
    let tree = page.aria_snapshot().await?;
    let headings = page.headings().await?;
    let collapsed = page.collapsed_elements().await?;
    Ok(PageObservation {
        url,
        title,
        metrics,
        tree,
        headings,
        collapsed,
    })
}

/// Assemble the full report: header lines, region map, action deck, raw tree.
pub fn build_report(obs: &PageObservation) -> String {
    let mut out = String::new();
    out.push_str("url: ");
    out.push_str(&obs.url);
    out.push('\n');
    out.push_str("title: ");
    out.push_str(&obs.title);
    out.push('\n');
    if let Some(scroll) = scroll_summary(&obs.metrics) {
        out.push_str(&scroll);
        out.push('\n');
    }
    out.push('\n');

    for line in region_map(&obs.tree, &obs.headings, &obs.collapsed) {
        out.push_str(&line);
        out.push('\n');
    }

    let deck = action_deck(&obs.tree);
    if !deck.is_empty() {
        out.push('\n');
        out.push_str("actions:\n");
        for line in deck {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&obs.tree);
    out
}

/// One-line scroll position, emitted only when the document overflows the
/// viewport: `scroll: {y}/{max} px`, plus a marker while more than the
/// threshold remains unseen below.
fn scroll_summary(metrics: &PageMetrics) -> Option<String> {
    if metrics.document_height <= metrics.viewport_height {
        return None;
    }
    let max = metrics.document_height - metrics.viewport_height;
    let mut line = format!(
        "scroll: {}/{} px",
        metrics.scroll_y.round() as i64,
        max.round() as i64
    );
    if max - metrics.scroll_y > MORE_BELOW_THRESHOLD {
        line.push_str(" (more below)");
    }
    Some(line)
}

/// A parsed tree line. Depth is always floor(indentWidth / 2).
struct TreeLine<'a> {
    depth: usize,
    role: &'a str,
    name: Option<&'a str>,
}

fn parse_line(line: &str) -> Option<TreeLine<'_>> {
    let content = line.trim_start_matches(' ');
    if content.is_empty() {
        return None;
    }
    let depth = (line.len() - content.len()) / 2;
    let content = content.strip_prefix("- ").unwrap_or(content);
    let (role_part, rest) = match content.split_once(' ') {
        Some((role, rest)) => (role, Some(rest)),
        None => (content, None),
    };
    let role = role_part.trim_end_matches(':');
    if role.is_empty() {
        return None;
    }
    Some(TreeLine {
        depth,
        role,
        name: rest.and_then(extract_quoted),
    })
}

fn extract_quoted(s: &str) -> Option<&str> {
    let start = s.find('"')? + 1;
    let end = s[start..].find('"')? + start;
    Some(&s[start..end])
}

/// Build the landmark region map.
///
/// A landmark role at depth 0 opens a section, closing the previous one.
/// Headings inside an open section are re-indented relative to it and
/// annotated with their viewport visibility when their text matches the
/// collected heading data. Collapsed elements are appended after the scan.
fn region_map(
    tree: &str,
    headings: &[HeadingInfo],
    collapsed: &[CollapsedElement],
) -> Vec<String> {
    let mut out = Vec::new();

    for line in tree.lines() {
        let Some(parsed) = parse_line(line) else {
            continue;
        };
        if parsed.depth == 0 && LANDMARK_ROLES.contains(&parsed.role) {
            match parsed.name {
                Some(name) => out.push(format!("[{} \"{}\"]", parsed.role, name)),
                None => out.push(format!("[{}]", parsed.role)),
            }
            continue;
        }
        if parsed.role == "heading" && out.iter().any(|l: &String| l.starts_with('[')) {
            let indent = "  ".repeat(parsed.depth);
            let name = parsed.name.unwrap_or("");
            let mut entry = format!("{indent}h \"{name}\"");
            match headings.iter().find(|h| h.text == name) {
                Some(h) if h.in_view => entry.push_str(" ← in view"),
                Some(_) => entry.push_str(" (below)"),
                None => {}
            }
            out.push(entry);
        }
    }

    for item in collapsed.iter().take(MAX_COLLAPSED) {
        out.push(format!("{} \"{}\" (collapsed)", item.role, item.label));
    }

    out
}

struct ActionCandidate {
    role: String,
    name: String,
    score: i32,
}

/// Scan the tree for interactive elements, score them, and render the top
/// entries. Kept actions sharing a role+name pair get a zero-based index
/// prefix so a consumer can target one occurrence.
fn action_deck(tree: &str) -> Vec<String> {
    let mut candidates: Vec<ActionCandidate> = Vec::new();
    for line in tree.lines() {
        let Some(parsed) = parse_line(line) else {
            continue;
        };
        if !ACTION_ROLES.contains(&parsed.role) {
            continue;
        }
        let name = parsed.name.unwrap_or("").to_string();
        let lower = name.to_lowercase();
        let mut score = 0;
        if parsed.role == "button" {
            score += BUTTON_BONUS;
        }
        if INTENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            score += INTENT_BONUS;
        }
        if lower.contains("demo") {
            score += DEMO_BONUS;
        }
        candidates.push(ActionCandidate {
            role: parsed.role.to_string(),
            name,
            score,
        });
    }

    // Stable sort keeps document order among equal scores.
    candidates.sort_by_key(|c| std::cmp::Reverse(c.score));
    candidates.truncate(MAX_ACTIONS);

    let mut totals: HashMap<(&str, &str), usize> = HashMap::new();
    for c in &candidates {
        *totals.entry((c.role.as_str(), c.name.as_str())).or_insert(0) += 1;
    }

    let mut next_index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out = Vec::with_capacity(candidates.len());
    for c in &candidates {
        let key = (c.role.as_str(), c.name.as_str());
        let label = if c.name.is_empty() {
            c.role.clone()
        } else {
            format!("{} \"{}\"", c.role, c.name)
        };
        if totals[&key] > 1 {
            let index = next_index.entry(key).or_insert(0);
            out.push(format!("[{index}] {label}"));
            *index += 1;
        } else {
            out.push(label);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str, in_view: bool) -> HeadingInfo {
        HeadingInfo {
            text: text.to_string(),
            in_view,
        }
    }

    fn metrics(scroll_y: f64, document_height: f64, viewport_height: f64) -> PageMetrics {
        PageMetrics {
            scroll_y,
            document_height,
            viewport_height,
        }
    }

    #[test]
    fn depth_is_derived_from_indent_width() {
        let line = parse_line("    - heading \"Deep\"").unwrap();
        assert_eq!(line.depth, 2);
        assert_eq!(line.role, "heading");
        assert_eq!(line.name, Some("Deep"));
    }

    #[test]
    fn blank_lines_are_discarded() {
        assert!(parse_line("").is_none());
        assert!(parse_line("    ").is_none());
    }

    #[test]
    fn landmark_colon_is_stripped_from_the_role() {
        let line = parse_line("- navigation:").unwrap();
        assert_eq!(line.role, "navigation");
        assert_eq!(line.name, None);
    }

    #[test]
    fn navigation_with_two_headings_yields_one_block_with_two_annotated_lines() {
        let tree = "- navigation:\n  - heading \"First\"\n  - heading \"Second\"";
        let headings = vec![heading("First", true), heading("Second", false)];
        let map = region_map(tree, &headings, &[]);

        assert_eq!(map.len(), 3);
        assert_eq!(map[0], "[navigation]");
        assert_eq!(map[1], "  h \"First\" ← in view");
        assert_eq!(map[2], "  h \"Second\" (below)");
    }

    #[test]
    fn unmatched_heading_gets_no_annotation() {
        let tree = "- main:\n  - heading \"Mystery\"";
        let map = region_map(tree, &[], &[]);
        assert_eq!(map[1], "  h \"Mystery\"");
    }

    #[test]
    fn landmark_with_no_content_is_emitted_alone() {
        let map = region_map("- banner\n- main:", &[], &[]);
        assert_eq!(map, vec!["[banner]".to_string(), "[main]".to_string()]);
    }

    #[test]
    fn collapsed_entries_are_appended_and_capped_at_five() {
        let collapsed: Vec<CollapsedElement> = (0..7)
            .map(|i| CollapsedElement {
                role: "button".into(),
                label: format!("Menu {i}"),
            })
            .collect();
        let map = region_map("- main:", &[], &collapsed);
        assert_eq!(map.len(), 1 + 5);
        assert_eq!(map[1], "button \"Menu 0\" (collapsed)");
        assert_eq!(map[5], "button \"Menu 4\" (collapsed)");
    }

    #[test]
    fn nested_landmarks_do_not_open_sections() {
        let tree = "- main:\n  - navigation \"Sidebar\":\n    - heading \"Links\"";
        let map = region_map(tree, &[heading("Links", true)], &[]);
        assert_eq!(map[0], "[main]");
        // Heading attaches to the open depth-0 section.
        assert_eq!(map[1], "    h \"Links\" ← in view");
    }

    #[test]
    fn deck_keeps_at_most_eight_and_indexes_every_duplicate_from_zero() {
        let mut tree = String::from("- link \"Docs\"\n");
        for _ in 0..9 {
            tree.push_str("- button \"Save\"\n");
        }
        let deck = action_deck(&tree);

        assert_eq!(deck.len(), MAX_ACTIONS);
        // The duplicated buttons outscore the link and fill the deck.
        for (i, line) in deck.iter().enumerate() {
            assert_eq!(line, &format!("[{i}] button \"Save\""));
        }
    }

    #[test]
    fn unique_actions_render_without_an_index() {
        let tree = "- button \"Save\"\n- link \"Home\"";
        let deck = action_deck(tree);
        assert_eq!(deck[0], "button \"Save\"");
        assert_eq!(deck[1], "link \"Home\"");
    }

    #[test]
    fn button_and_intent_bonuses_rank_submit_first() {
        let tree = "- link \"About\"\n- textbox \"Email\"\n- button \"Submit\"";
        let deck = action_deck(tree);
        assert_eq!(deck[0], "button \"Submit\"");
    }

    #[test]
    fn demo_names_get_a_smaller_boost() {
        let tree = "- link \"Pricing\"\n- link \"Try the demo\"";
        let deck = action_deck(tree);
        assert_eq!(deck[0], "link \"Try the demo\"");
    }

    #[test]
    fn non_action_roles_are_ignored() {
        let tree = "- heading \"Title\"\n- checkbox \"Agree\"";
        assert!(action_deck(tree).is_empty());
    }

    #[test]
    fn scroll_summary_is_omitted_when_the_page_fits() {
        assert!(scroll_summary(&metrics(0.0, 700.0, 800.0)).is_none());
        assert!(scroll_summary(&metrics(0.0, 800.0, 800.0)).is_none());
    }

    #[test]
    fn scroll_summary_marks_unseen_content() {
        let line = scroll_summary(&metrics(120.0, 2800.0, 800.0)).unwrap();
        assert_eq!(line, "scroll: 120/2000 px (more below)");
    }

    #[test]
    fn scroll_summary_drops_marker_near_the_bottom() {
        let line = scroll_summary(&metrics(1950.0, 2800.0, 800.0)).unwrap();
        assert_eq!(line, "scroll: 1950/2000 px");
    }

    #[test]
    fn empty_tree_omits_the_action_section_entirely() {
        let obs = PageObservation {
            url: "https://example.com".into(),
            title: "Example".into(),
            metrics: metrics(0.0, 600.0, 800.0),
            tree: String::new(),
            headings: vec![],
            collapsed: vec![],
        };
        let report = build_report(&obs);
        assert!(report.starts_with("url: https://example.com\ntitle: Example\n"));
        assert!(!report.contains("actions:"));
    }

    #[test]
    fn worked_example_produces_region_map_and_ranked_deck() {
        let tree = "- navigation:\n  - heading \"Welcome\"\n- button \"Submit\"";
        let obs = PageObservation {
            url: "https://example.com".into(),
            title: "Example".into(),
            metrics: metrics(0.0, 600.0, 800.0),
            tree: tree.into(),
            headings: vec![heading("Welcome", true)],
            collapsed: vec![],
        };
        let report = build_report(&obs);

        assert!(report.contains("[navigation]\n  h \"Welcome\" ← in view"));
        assert!(report.contains("actions:\nbutton \"Submit\""));
        // The raw tree survives verbatim at the end.
        assert!(report.ends_with(tree));
    }
}
