use pagepilot::page::{CollapsedElement, HeadingInfo, PageMetrics};
use pagepilot::snapshot::{build_report, PageObservation};

fn observation(tree: &str) -> PageObservation {
    PageObservation {
        url: "https://example.com/docs".into(),
        title: "Docs".into(),
        metrics: PageMetrics {
            scroll_y: 0.0,
            document_height: 600.0,
            viewport_height: 800.0,
        },
        tree: tree.into(),
        headings: vec![],
        collapsed: vec![],
    }
}

#[test]
fn report_layers_summary_over_the_verbatim_tree() {
    let tree = "- navigation:\n  - heading \"Welcome\"\n- main:\n  - button \"Submit\"\n  - link \"Read the docs\"";
    let mut obs = observation(tree);
    obs.headings = vec![HeadingInfo {
        text: "Welcome".into(),
        in_view: true,
    }];
    obs.collapsed = vec![CollapsedElement {
        role: "button".into(),
        label: "More options".into(),
    }];

    let report = build_report(&obs);

    // Header block.
    assert!(report.starts_with("url: https://example.com/docs\ntitle: Docs\n\n"));
    // Region map with annotated heading and the collapsed suffix.
    assert!(report.contains("[navigation]\n  h \"Welcome\" ← in view"));
    assert!(report.contains("button \"More options\" (collapsed)"));
    // Ranked deck: the submit button outranks the plain link.
    let actions_at = report.find("actions:").unwrap();
    let submit_at = report[actions_at..].find("button \"Submit\"").unwrap();
    let link_at = report[actions_at..].find("link \"Read the docs\"").unwrap();
    assert!(submit_at < link_at);
    // Ground truth preserved.
    assert!(report.ends_with(tree));
}

#[test]
fn scroll_line_appears_only_for_overflowing_documents() {
    let mut obs = observation("- main:");
    obs.metrics = PageMetrics {
        scroll_y: 0.0,
        document_height: 3000.0,
        viewport_height: 800.0,
    };
    let report = build_report(&obs);
    assert!(report.contains("scroll: 0/2200 px (more below)\n"));

    let obs = observation("- main:");
    let report = build_report(&obs);
    assert!(!report.contains("scroll:"));
}

#[test]
fn duplicate_actions_are_disambiguated_for_targeting() {
    let tree = "- button \"Apply\"\n- button \"Apply\"\n- link \"Home\"";
    let report = build_report(&observation(tree));

    assert!(report.contains("[0] button \"Apply\""));
    assert!(report.contains("[1] button \"Apply\""));
    // The unique link is not indexed.
    assert!(report.contains("\nlink \"Home\"\n"));
    assert!(!report.contains("[0] link"));
}
