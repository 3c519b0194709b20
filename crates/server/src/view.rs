//! Server-rendered status page.
use std::borrow::Cow;

use bidi_core::domain::model::StatusSnapshot;
use bidi_core::domain::timeline::BucketResult;
use html_escape::{encode_double_quoted_attribute, encode_text};

const TEMPLATE: &str = include_str!("../res/bankid.html");

pub fn render_status_page(
    snapshot: &StatusSnapshot,
    buckets: &[BucketResult],
    updated: &str,
) -> String {
    let timeline: String = buckets
        .iter()
        .map(|b| {
            format!(
                "    <li class=\"{color}\"><time>{time}</time> {text}</li>\n",
                color = encode_double_quoted_attribute(b.color.as_str()),
                time = encode_text(&b.time),
                text = encode_text(&b.text),
            )
        })
        .collect();

    fill_template(TEMPLATE, |name| match name {
        "color" => Some(encode_double_quoted_attribute(snapshot.color.as_str())),
        "text" => Some(encode_text(&snapshot.text)),
        "meaning" => Some(encode_text(&snapshot.meaning)),
        "extra" => Some(encode_text(snapshot.detail.as_deref().unwrap_or_default())),
        "updated" => Some(encode_text(updated)),
        "timeline" => Some(Cow::Borrowed(timeline.trim_end())),
        _ => None,
    })
}

/// Replaces each `{{name}}` in `template` in a single pass. Inserted values are
/// never scanned again; unknown names are left as they are.
fn fill_template<'a, F>(template: &str, value: F) -> String
where
    F: Fn(&str) -> Option<Cow<'a, str>>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match value(name) {
            Some(v) => out.push_str(&v),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidi_core::domain::severity::{SeverityCode, StatusColor};

    #[test]
    fn renders_snapshot_and_buckets() {
        let snapshot = StatusSnapshot::from_code(
            SeverityCode::Critical,
            Some("<nede>".into()),
            0,
            None,
        );
        let buckets = vec![BucketResult {
            time: "2024-01-01 10:59:59+00:00".into(),
            color: StatusColor::Red,
            status: 4,
            text: "<nede>".into(),
        }];

        let html = render_status_page(&snapshot, &buckets, "nå");

        assert!(html.contains(r#"<div class="status red">"#));
        assert!(html.contains("&lt;nede&gt;"));
        assert!(!html.contains("<nede>"));
        assert!(html.contains(r#"<li class="red"><time>2024-01-01 10:59:59+00:00</time>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn placeholders_inside_values_stay_literal() {
        let snapshot = StatusSnapshot::from_code(
            SeverityCode::PartialMajor,
            Some("Nede {{updated}}".into()),
            0,
            None,
        );

        let html = render_status_page(&snapshot, &[], "STAMP");

        assert!(html.contains("<p>Nede {{updated}}</p>"));
        assert_eq!(html.matches("STAMP").count(), 1);
    }

    #[test]
    fn fill_keeps_unknown_and_unterminated_markers() {
        let out = fill_template("a {{x}} {{y}} {{z", |name| {
            (name == "x").then(|| Cow::Borrowed("1"))
        });
        assert_eq!(out, "a 1 {{y}} {{z");
    }
}
