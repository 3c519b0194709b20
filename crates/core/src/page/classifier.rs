//! Turns the raw status page into a severity code and optional incident detail.
//!
//! Matching is a substring search for each code's marker inside the serialized
//! `div.m-statuspage` sections, so it tracks the page's markup rather than its
//! rendered text.

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use tracing::{debug, info};

use crate::domain::severity::SeverityCode;

const STATUS_SECTION_CLASS: &str = "m-statuspage";
const DESCRIPTION_CLASS: &str = "m-statuspage-description";

pub const DETAIL_FALLBACK: &str = "Kunne ikke innhente detaljert informasjon om bankidfeil.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub code: SeverityCode,
    pub detail: Option<String>,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            code: SeverityCode::Unknown,
            detail: None,
        }
    }
}

/// `None` means the page could not be fetched; that is `Unknown`, not healthy.
pub fn classify(page: Option<&[u8]>) -> Classification {
    let Some(page) = page else {
        return Classification::unknown();
    };
    let Some(dom) = parse_dom(page) else {
        debug!("status page is not parseable html");
        return Classification::unknown();
    };

    let code = match_code(&dom);
    let detail = code.has_detail().then(|| detail_from_dom(&dom));
    Classification { code, detail }
}

/// Text of the first paragraph after the incident description block, or
/// [`DETAIL_FALLBACK`] when the page has none.
pub fn extract_detail(page: &[u8]) -> String {
    match parse_dom(page) {
        Some(dom) => detail_from_dom(&dom),
        None => DETAIL_FALLBACK.to_string(),
    }
}

fn match_code(dom: &RcDom) -> SeverityCode {
    let nodes = document_order(&dom.document);
    for section in nodes
        .iter()
        .filter(|n| is_div_with_class(n, STATUS_SECTION_CLASS))
    {
        let Some(markup) = serialize_node(section) else {
            continue;
        };
        let markup = markup.replace(['\n', '\r'], "");
        let found = SeverityCode::ALL
            .into_iter()
            .find(|code| code.marker().is_some_and(|m| markup.contains(m)));
        if let Some(code) = found {
            info!(code = code.ordinal(), "Status retrieved");
            return code;
        }
    }
    SeverityCode::Unknown
}

fn detail_from_dom(dom: &RcDom) -> String {
    let nodes = document_order(&dom.document);
    let mut detail = None;
    for (idx, _) in nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| is_div_with_class(n, DESCRIPTION_CLASS))
    {
        let paragraph = nodes[idx + 1..].iter().find(|n| is_element(n, "p"));
        if let Some(p) = paragraph {
            let mut text = String::new();
            collect_text(p, &mut text);
            detail = Some(text.replace(['\n', '\r'], "").trim().to_string());
        }
    }
    detail.unwrap_or_else(|| DETAIL_FALLBACK.to_string())
}

fn parse_dom(page: &[u8]) -> Option<RcDom> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut &page[..])
        .ok()
}

fn document_order(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
        out.push(node);
    }
    out
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn is_div_with_class(handle: &Handle, class: &str) -> bool {
    let NodeData::Element { name, attrs, .. } = &handle.data else {
        return false;
    };
    name.local.as_ref() == "div"
        && attrs.borrow().iter().any(|a| {
            a.name.local.as_ref() == "class" && a.value.split_whitespace().any(|c| c == class)
        })
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

fn serialize_node(handle: &Handle) -> Option<String> {
    let node: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let mut buf = Vec::new();
    serialize(&mut buf, &node, opts).ok()?;
    String::from_utf8(buf).ok()
}
