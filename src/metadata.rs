use serde::{Deserialize, Serialize};

use crate::dom::Dom;

/// Lightweight page metadata. Missing values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// Extract title and description from the document. `url` is the address the
/// HTML was fetched from and is passed through untouched.
pub fn extract_metadata<D: Dom>(doc: &D, url: Option<&str>) -> Metadata {
    Metadata {
        title: extract_title(doc),
        description: extract_description(doc),
        url: url.map(str::to_string),
    }
}

fn extract_title<D: Dom>(doc: &D) -> Option<String> {
    ["title", "h1"].into_iter().find_map(|tag| {
        let text = doc.query(tag).first().map(|&node| doc.text(node))?;
        (!text.is_empty()).then(|| text.trim().to_string())
    })
}

fn extract_description<D: Dom>(doc: &D) -> Option<String> {
    [r#"meta[name="description"]"#, r#"meta[property="og:description"]"#]
        .into_iter()
        .find_map(|selector| {
            let content = doc
                .query(selector)
                .first()
                .and_then(|&node| doc.attr(node, "content"))?;
            (!content.is_empty()).then(|| content.trim().to_string())
        })
}
