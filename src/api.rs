use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalyzeOptions, PageAnalyzer};

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeQuery {
    pub url: Option<String>,
    /// Only the literal string `"true"` enables browser rendering
    pub dynamic: Option<String>,
}

impl AnalyzeQuery {
    fn options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            dynamic: self.dynamic.as_deref() == Some("true"),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_check))
        .route("/api/analyze", web::get().to(analyze_handler));
}

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "page-analyzer"
    })))
}

pub async fn analyze_handler(
    analyzer: web::Data<PageAnalyzer>,
    query: web::Query<AnalyzeQuery>,
) -> Result<HttpResponse> {
    let Some(input) = query.url.as_deref().filter(|url| !url.is_empty()) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing url parameter"
        })));
    };

    let options = query.options();
    log::info!(
        "Received analysis request ({} chars, dynamic: {})",
        input.len(),
        options.dynamic
    );

    let result = analyzer.analyze(input, options).await;

    match serde_json::to_value(&result) {
        Ok(body) => {
            log::info!(
                "Analysis complete: {} page, {} section(s)",
                result.page_type,
                result.sections.len()
            );
            Ok(HttpResponse::Ok().json(body))
        }
        Err(e) => {
            log::error!("Error analyzing page: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to analyze page",
                "message": e.to_string()
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchedPage, HtmlFetcher};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl HtmlFetcher for Unreachable {
        async fn fetch(&self, url: &str) -> anyhow::Result<FetchedPage> {
            anyhow::bail!("no network in tests: {}", url)
        }
    }

    fn analyzer() -> web::Data<PageAnalyzer> {
        web::Data::new(PageAnalyzer::with_fetchers(Arc::new(Unreachable), Arc::new(Unreachable)))
    }

    #[actix_web::test]
    async fn test_missing_url_is_bad_request() {
        let app = actix_test::init_service(App::new().app_data(analyzer()).configure(configure)).await;

        for uri in ["/api/analyze", "/api/analyze?url=", "/api/analyze?dynamic=true"] {
            let req = actix_test::TestRequest::get().uri(uri).to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_analyze_literal_html() {
        let app = actix_test::init_service(App::new().app_data(analyzer()).configure(configure)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/analyze?url=%3Cform%3E%3Cinput%20type%3D%22password%22%3E%3C%2Fform%3E")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["page_type"], "login");
        assert_eq!(body["sections"], serde_json::json!([{ "type": "form", "selector": "form" }]));
    }

    #[actix_web::test]
    async fn test_fetch_failure_still_returns_ok() {
        let app = actix_test::init_service(App::new().app_data(analyzer()).configure(configure)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/analyze?url=https%3A%2F%2Fexample.com%2F&dynamic=true")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["page_type"], "unknown");
        assert_eq!(body["metadata"]["url"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = actix_test::init_service(App::new().app_data(analyzer()).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "page-analyzer");
    }

    #[test]
    fn test_dynamic_flag_parsing() {
        let query = |dynamic: Option<&str>| AnalyzeQuery {
            url: Some("https://example.com".to_string()),
            dynamic: dynamic.map(str::to_string),
        };

        assert!(query(Some("true")).options().dynamic);
        assert!(!query(Some("TRUE")).options().dynamic);
        assert!(!query(Some("1")).options().dynamic);
        assert!(!query(None).options().dynamic);
    }
}
