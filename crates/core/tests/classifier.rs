mod common;

use bidi_core::domain::severity::SeverityCode;
use bidi_core::page::{classify, extract_detail, DETAIL_FALLBACK};
use common::{CRITICAL_PAGE, MAINTENANCE_PAGE_NO_DESCRIPTION, OK_PAGE};

#[test]
fn unreadable_page_is_unknown() {
    let c = classify(None);
    assert_eq!(c.code, SeverityCode::Unknown);
    assert!(c.detail.is_none());
}

#[test]
fn healthy_page_has_no_detail() {
    let c = classify(Some(OK_PAGE.as_bytes()));
    assert_eq!(c.code, SeverityCode::Ok);
    assert!(c.detail.is_none());
}

#[test]
fn critical_page_carries_description() {
    let c = classify(Some(CRITICAL_PAGE.as_bytes()));
    assert_eq!(c.code, SeverityCode::Critical);
    assert_eq!(c.detail.as_deref(), Some("BankID er nede for alle kunder."));
}

#[test]
fn missing_description_falls_back() {
    let c = classify(Some(MAINTENANCE_PAGE_NO_DESCRIPTION.as_bytes()));
    assert_eq!(c.code, SeverityCode::Maintenance);
    assert_eq!(c.detail.as_deref(), Some(DETAIL_FALLBACK));
}

#[test]
fn page_without_status_section_is_unknown() {
    let page = r#"<html><body><span class="color-dot critical"></span></body></html>"#;
    assert_eq!(classify(Some(page.as_bytes())).code, SeverityCode::Unknown);
}

#[test]
fn lowest_ordinal_marker_wins() {
    let page = r#"<div class="m-statuspage">
<span class="color-dot major"></span>
<span class="color-dot minor"></span>
</div>"#;
    assert_eq!(classify(Some(page.as_bytes())).code, SeverityCode::PartialMinor);
}

#[test]
fn later_sections_are_searched_when_first_has_no_marker() {
    let page = r#"<div class="m-statuspage"><h2>Intro</h2></div>
<div class="m-statuspage"><span class="color-dot major"></span></div>"#;
    assert_eq!(classify(Some(page.as_bytes())).code, SeverityCode::PartialMajor);
}

#[test]
fn detail_text_drops_line_breaks() {
    let page = "<div class=\"m-statuspage-description\"></div><p>Treg\ninnlogging</p>";
    assert_eq!(extract_detail(page.as_bytes()), "Treginnlogging");
}
