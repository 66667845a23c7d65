use scraper::{ElementRef, Html, Selector};

/// Read-only query surface over a parsed document.
///
/// Every detector in this crate is written against this trait so that the
/// parsing backend can be swapped without touching the heuristics.
/// Queries return elements in document order.
pub trait Dom {
    type Node<'a>: Copy + PartialEq
    where
        Self: 'a;

    /// Number of elements matching `selector`. An unparsable selector matches nothing.
    fn count(&self, selector: &str) -> usize {
        self.query(selector).len()
    }

    fn query<'a>(&'a self, selector: &str) -> Vec<Self::Node<'a>>;

    /// Concatenated descendant text, untrimmed.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    fn attr<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<&'a str>;

    fn tag_name<'a>(&'a self, node: Self::Node<'a>) -> Option<&'a str>;
}

/// A document parsed with html5ever through `scraper`.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse an HTML string. Parsing is error-recovering, so empty or broken
    /// markup still produces a (possibly empty) tree.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(selector) => Some(selector),
            Err(e) => {
                log::debug!("Ignoring invalid selector {:?}: {}", selector, e);
                None
            }
        }
    }
}

impl Dom for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn count(&self, selector: &str) -> usize {
        Self::selector(selector)
            .map(|selector| self.html.select(&selector).count())
            .unwrap_or(0)
    }

    fn query<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        Self::selector(selector)
            .map(|selector| self.html.select(&selector).collect())
            .unwrap_or_default()
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect()
    }

    fn attr<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<&'a str> {
        node.value().attr(name)
    }

    fn tag_name<'a>(&'a self, node: ElementRef<'a>) -> Option<&'a str> {
        let name = node.value().name();
        if name.is_empty() { None } else { Some(name) }
    }
}
