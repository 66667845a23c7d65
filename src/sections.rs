use serde::{Deserialize, Serialize};

use crate::dom::Dom;

/// Layout region categories, declared in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Nav,
    Hero,
    Footer,
    Sidebar,
    CardList,
    Form,
    Content,
}

/// A detected layout region and the candidate selector that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub selector: String,
}

/// Candidate selectors per section kind. Kinds are checked in this order and,
/// within a kind, candidates are tried in order until one matches.
pub const SECTION_CANDIDATES: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Nav,
        &[
            "nav",
            "#navbar",
            r#"[role="navigation"]"#,
            r#"[class*="nav"]"#,
            r#"[class*="Nav"]"#,
            "header nav",
        ],
    ),
    (
        SectionKind::Hero,
        &[
            r#"[class*="hero"]"#,
            r#"[class*="Hero"]"#,
            r#"[id*="hero"]"#,
            r#"[id*="Hero"]"#,
            r#"[class*="banner"]"#,
            r#"[class*="Banner"]"#,
        ],
    ),
    (
        SectionKind::Footer,
        &["footer", "#footer", r#"[class*="footer"]"#, r#"[class*="Footer"]"#],
    ),
    (
        SectionKind::Sidebar,
        &[
            "aside",
            r#"[class*="sidebar"]"#,
            r#"[class*="Sidebar"]"#,
            r#"[id*="sidebar"]"#,
            r#"[id*="Sidebar"]"#,
        ],
    ),
    (
        SectionKind::CardList,
        &[
            r#"[class*="card-list"]"#,
            r#"[class*="CardList"]"#,
            r#"[class*="grid"]"#,
            r#"[class*="Grid"]"#,
            r#"[class*="gallery"]"#,
            r#"[class*="Gallery"]"#,
        ],
    ),
    (
        SectionKind::Form,
        &["form", r#"[class*="form"]"#, r#"[class*="Form"]"#],
    ),
    (
        SectionKind::Content,
        &[
            "main",
            r#"[role="main"]"#,
            r#"[class*="content"]"#,
            r#"[class*="Content"]"#,
            r#"[id*="content"]"#,
            r#"[id*="Content"]"#,
            "article",
        ],
    ),
];

/// Detect at most one section per kind, ordered by kind rather than by
/// position in the markup.
pub fn detect_sections<D: Dom>(doc: &D) -> Vec<Section> {
    SECTION_CANDIDATES
        .iter()
        .filter_map(|(kind, candidates)| {
            candidates
                .iter()
                .find(|candidate| doc.count(candidate) > 0)
                .map(|candidate| Section {
                    kind: *kind,
                    selector: candidate.to_string(),
                })
        })
        .collect()
}
