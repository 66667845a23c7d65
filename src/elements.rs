use serde::{Deserialize, Serialize};

use crate::dom::Dom;

/// Selectors for the interactive and referential elements of a page, each
/// list in document order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBucket {
    pub inputs: Vec<String>,
    pub buttons: Vec<String>,
    pub links: Vec<String>,
    pub images: Vec<String>,
}

const INPUTS: &str = "input";
const BUTTONS: &str = r#"button, [role="button"]"#;
const LINKS: &str = "a[href]";
const IMAGES: &str = "img";

pub fn extract_elements<D: Dom>(doc: &D) -> ElementBucket {
    ElementBucket {
        inputs: selectors_for(doc, INPUTS),
        buttons: selectors_for(doc, BUTTONS),
        links: selectors_for(doc, LINKS),
        images: selectors_for(doc, IMAGES),
    }
}

fn selectors_for<D: Dom>(doc: &D, query: &str) -> Vec<String> {
    doc.query(query)
        .into_iter()
        .map(|node| generate_selector(doc, node))
        .collect()
}

/// Best-effort selector for one element: `#id`, else `.first-class`, else
/// `tag:nth-of-type(n)` with `n` counted over every same-tag element in the
/// document. Class selectors are not guaranteed to be unique.
pub fn generate_selector<'a, D: Dom>(doc: &'a D, node: D::Node<'a>) -> String {
    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        return format!("#{}", id);
    }

    if let Some(class) = doc
        .attr(node, "class")
        .and_then(|classes| classes.split_whitespace().next())
    {
        return format!(".{}", class);
    }

    match doc.tag_name(node) {
        Some(tag) => {
            let position = doc
                .query(tag)
                .into_iter()
                .position(|candidate| candidate == node)
                .map_or(1, |index| index + 1);
            format!("{}:nth-of-type({})", tag, position)
        }
        None => "unknown".to_string(),
    }
}
