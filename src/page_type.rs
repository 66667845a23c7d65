use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dom::Dom;

/// Coarse archetype of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Search,
    Product,
    List,
    Article,
    Login,
    Home,
    #[default]
    Unknown,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Search => "search",
            PageType::Product => "product",
            PageType::List => "list",
            PageType::Article => "article",
            PageType::Login => "login",
            PageType::Home => "home",
            PageType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Substring matches on class/id are deliberate: "product-price" and
// "PriceTag" both count as a price element.
const PRODUCT_LINK: &str = r#"a[href*="product"], a[href*="item"], a[href*="/p/"]"#;
const PRICE: &str =
    r#"[class*="price"], [class*="Price"], [id*="price"], [id*="Price"], [data-price]"#;
const PRODUCT_IMAGE: &str = r#"img[class*="product"], img[class*="Product"], img[id*="product"], img[id*="Product"]"#;
const ADD_TO_CART: &str = r#"[class*="add-to-cart"], [class*="addToCart"], [id*="add-to-cart"], [id*="addToCart"]"#;
const AUTHOR: &str = r#"[class*="author"], [class*="Author"], [class*="byline"], [class*="Byline"]"#;
const DATE: &str = r#"[class*="date"], [class*="Date"], [class*="published"], [class*="Published"], time[datetime]"#;
const CARD: &str = r#"[class*="card"], [class*="Card"], [class*="item"], [class*="Item"]"#;
const REPEATED_ARTICLE: &str = r#"article, [role="article"]"#;
const HERO: &str = r#"[class*="hero"], [class*="Hero"], [id*="hero"], [id*="Hero"]"#;
const NAV: &str = r#"nav, [role="navigation"], [class*="nav"], [class*="Nav"]"#;

const PURCHASE_PHRASES: &[&str] = &["add to cart", "buy now", "purchase"];

/// A single step of the cascade: the label it yields and the predicate that selects it.
pub type PageTypeRule<D> = (PageType, fn(&D) -> bool);

/// The classification cascade, in evaluation order. The first predicate that
/// holds decides the page type; `Unknown` is the implicit final rule.
pub fn page_type_rules<D: Dom>() -> [PageTypeRule<D>; 6] {
    [
        (PageType::Search, is_search::<D>),
        (PageType::Product, is_product::<D>),
        (PageType::Login, is_login::<D>),
        (PageType::Article, is_article::<D>),
        (PageType::List, is_list::<D>),
        (PageType::Home, is_home::<D>),
    ]
}

/// Classify a document into exactly one page type
pub fn classify<D: Dom>(doc: &D) -> PageType {
    page_type_rules::<D>()
        .into_iter()
        .find(|(_, matches)| matches(doc))
        .map(|(page_type, _)| page_type)
        .unwrap_or_default()
}

fn is_search<D: Dom>(doc: &D) -> bool {
    doc.count(r#"input[type="search"]"#) > 0
        && (doc.count(r#"button[type="submit"]"#) > 0 || doc.count(PRODUCT_LINK) > 5)
}

fn is_product<D: Dom>(doc: &D) -> bool {
    (doc.count(PRICE) > 0 || doc.count(PRODUCT_IMAGE) > 0) && add_to_cart_count(doc) > 0
}

fn is_login<D: Dom>(doc: &D) -> bool {
    doc.count("form") > 0 && doc.count(r#"input[type="password"]"#) > 0
}

fn is_article<D: Dom>(doc: &D) -> bool {
    doc.count("p") > 5 && doc.count("h1") > 0 && (doc.count(AUTHOR) > 0 || doc.count(DATE) > 0)
}

fn is_list<D: Dom>(doc: &D) -> bool {
    doc.count(CARD) > 3 || doc.count(REPEATED_ARTICLE) > 3
}

fn is_home<D: Dom>(doc: &D) -> bool {
    doc.count(HERO) > 0 && doc.count(NAV) > 0 && doc.count("p") < 5
}

/// Add-to-cart controls found by class/id. Only when none are found this way
/// are `<button>` captions scanned, so the text scan never adds to a nonzero
/// selector count.
pub(crate) fn add_to_cart_count<D: Dom>(doc: &D) -> usize {
    let by_selector = doc.count(ADD_TO_CART);
    if by_selector > 0 {
        return by_selector;
    }

    doc.query("button").into_iter().fold(0, |count, button| {
        let caption = doc.text(button).to_lowercase();
        if PURCHASE_PHRASES.iter().any(|phrase| caption.contains(phrase)) {
            count + 1
        } else {
            count
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;

    fn classify_html(html: &str) -> PageType {
        classify(&HtmlDocument::parse(html))
    }

    #[test]
    fn test_search_with_submit_button() {
        let html = r#"<form><input type="search" name="q"><button type="submit">Go</button></form>"#;
        assert_eq!(classify_html(html), PageType::Search);
    }

    #[test]
    fn test_search_with_many_product_links() {
        let links: String = (0..6)
            .map(|i| format!(r#"<a href="/shop/product/{i}">Result {i}</a>"#))
            .collect();
        let html = format!(r#"<input type="search">{links}"#);
        assert_eq!(classify_html(&html), PageType::Search);
    }

    #[test]
    fn test_search_input_alone_is_not_search() {
        let links: String = (0..5)
            .map(|i| format!(r#"<a href="/p/{i}">Result {i}</a>"#))
            .collect();
        let html = format!(r#"<input type="search">{links}"#);
        assert_eq!(classify_html(&html), PageType::Unknown);
    }

    #[test]
    fn test_product_by_selector() {
        let html = r#"
            <span class="product-price">$10</span>
            <button class="add-to-cart">Add</button>
        "#;
        assert_eq!(classify_html(html), PageType::Product);
    }

    #[test]
    fn test_product_by_button_text() {
        let html = r#"
            <img id="mainProductImage" src="/a.jpg">
            <button>  Buy Now </button>
        "#;
        assert_eq!(classify_html(html), PageType::Product);
    }

    #[test]
    fn test_price_without_cart_is_not_product() {
        let html = r#"<span class="price">$10</span><button>Details</button>"#;
        assert_eq!(classify_html(html), PageType::Unknown);
    }

    #[test]
    fn test_product_wins_over_login() {
        let html = r#"
            <form>
                <input type="password" name="pw">
                <span class="price">$5</span>
                <button>Add to cart</button>
            </form>
        "#;
        assert_eq!(classify_html(html), PageType::Product);
    }

    #[test]
    fn test_login() {
        let html = r#"<form><input type="password"></form>"#;
        assert_eq!(classify_html(html), PageType::Login);
    }

    #[test]
    fn test_password_without_form_is_not_login() {
        let html = r#"<input type="password">"#;
        assert_eq!(classify_html(html), PageType::Unknown);
    }

    #[test]
    fn test_article() {
        let html = r#"
            <h1>Headline</h1>
            <time datetime="2024-01-01">Jan 1</time>
            <p>1</p><p>2</p><p>3</p><p>4</p><p>5</p><p>6</p>
        "#;
        assert_eq!(classify_html(html), PageType::Article);
    }

    #[test]
    fn test_article_needs_more_than_five_paragraphs() {
        let html = r#"
            <h1>Headline</h1>
            <span class="byline">By someone</span>
            <p>1</p><p>2</p><p>3</p><p>4</p><p>5</p>
        "#;
        assert_eq!(classify_html(html), PageType::Unknown);
    }

    #[test]
    fn test_list_from_cards() {
        let html = r#"
            <div class="card">a</div>
            <div class="card">b</div>
            <div class="card">c</div>
            <div class="card">d</div>
        "#;
        assert_eq!(classify_html(html), PageType::List);
    }

    #[test]
    fn test_three_cards_is_not_list() {
        let html = r#"<div class="card"></div><div class="card"></div><div class="card"></div>"#;
        assert_eq!(classify_html(html), PageType::Unknown);
    }

    #[test]
    fn test_list_from_repeated_articles() {
        let html = r#"<article></article><article></article><div role="article"></div><article></article>"#;
        assert_eq!(classify_html(html), PageType::List);
    }

    #[test]
    fn test_home() {
        let html = r#"
            <nav><a href="/">Home</a></nav>
            <section class="hero"><p>Welcome</p></section>
        "#;
        assert_eq!(classify_html(html), PageType::Home);
    }

    #[test]
    fn test_home_requires_few_paragraphs() {
        let html = r#"
            <nav></nav>
            <section id="hero"></section>
            <p>1</p><p>2</p><p>3</p><p>4</p><p>5</p>
        "#;
        assert_eq!(classify_html(html), PageType::Unknown);
    }

    #[test]
    fn test_empty_document_is_unknown() {
        assert_eq!(classify_html(""), PageType::Unknown);
    }

    #[test]
    fn test_button_text_scan_only_runs_without_selector_matches() {
        let with_selector = HtmlDocument::parse(
            r#"<a class="addToCart">+</a><button>Add to cart</button><button>Buy now</button>"#,
        );
        assert_eq!(add_to_cart_count(&with_selector), 1);

        let text_only =
            HtmlDocument::parse(r#"<button>Add to cart</button><button>PURCHASE</button><button>Back</button>"#);
        assert_eq!(add_to_cart_count(&text_only), 2);
    }

    #[test]
    fn test_rules_are_ordered() {
        let order: Vec<_> = page_type_rules::<HtmlDocument>()
            .iter()
            .map(|(page_type, _)| *page_type)
            .collect();
        assert_eq!(
            order,
            vec![
                PageType::Search,
                PageType::Product,
                PageType::Login,
                PageType::Article,
                PageType::List,
                PageType::Home,
            ]
        );
    }

    #[test]
    fn test_page_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&PageType::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(PageType::Login.to_string(), "login");
    }
}
