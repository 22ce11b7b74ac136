use axum::extract::{RawQuery, State};
use axum::http::Method;
use axum::Json;
use tracing::*;

use crate::error::ResolveError;
use crate::models::VideoResponse;
use crate::resolver::Resolver;

pub async fn get_video(
    State(resolver): State<Resolver>,
    method: Method,
    RawQuery(query): RawQuery,
) -> Result<Json<VideoResponse>, ResolveError> {
    if method != Method::GET {
        return Err(ResolveError::InvalidMethod);
    }
    let url = url_param(query.as_deref()).ok_or(ResolveError::MissingParameter)?;
    info!("Resolving video for {url}");
    let video_url = resolver.resolve(&url).await?;
    Ok(Json(VideoResponse { video_url }))
}

/// The single, non-empty `url` query parameter. A repeated parameter doesn't count.
fn url_param(query: Option<&str>) -> Option<String> {
    let mut urls = form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned());
    let url = urls.next()?;
    if url.is_empty() || urls.next().is_some() {
        return None;
    }
    Some(url)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::body;
    use axum::extract::{RawQuery, State};
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use serde_json::{json, Value};

    use super::{get_video, url_param};
    use crate::extractor::StrategyChain;
    use crate::fetcher::fake::{FakeFetcher, FakePage};
    use crate::resolver::Resolver;

    async fn call(page: FakePage, method: Method, query: Option<&str>) -> (StatusCode, Value, usize) {
        let fetcher = Arc::new(FakeFetcher::new(page));
        let resolver = Resolver::new(fetcher.clone(), StrategyChain::default());
        let response = get_video(State(resolver), method, RawQuery(query.map(String::from)))
            .await
            .into_response();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap(), fetcher.calls())
    }

    const VIDEO_PAGE: FakePage = FakePage::Html(r#"<video src="https://x/b.mp4"></video>"#);

    #[test]
    fn test_url_param() {
        assert_eq!(
            url_param(Some("url=https%3A%2F%2Fx.com%2Fp%3Fa%3D1&b=2")).as_deref(),
            Some("https://x.com/p?a=1")
        );
        assert_eq!(url_param(None), None);
        assert_eq!(url_param(Some("")), None);
        assert_eq!(url_param(Some("url=")), None);
        assert_eq!(url_param(Some("link=https://x.com")), None);
        assert_eq!(url_param(Some("url=https://a.com&url=https://b.com")), None);
    }

    #[tokio::test]
    async fn test_success() {
        let (status, body, calls) = call(
            VIDEO_PAGE,
            Method::GET,
            Some("url=https%3A%2F%2Fexample.com%2Fp%2F1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "videoUrl": "https://x/b.mp4" }));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
            let (status, body, calls) =
                call(VIDEO_PAGE, method, Some("url=https://example.com/p/1")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body, json!({ "error": "Method Not Allowed" }));
            assert_eq!(calls, 0);
        }
        let (status, _, _) = call(VIDEO_PAGE, Method::POST, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_url() {
        for query in [None, Some("foo=bar"), Some("url="), Some("url=a&url=b")] {
            let (status, body, calls) = call(VIDEO_PAGE, Method::GET, query).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "URL parameter is missing or invalid" }));
            assert_eq!(calls, 0);
        }
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let (status, body, calls) = call(VIDEO_PAGE, Method::GET, Some("url=not-a-url")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid URL format" }));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let (status, body, _) = call(
            FakePage::Status(403, "Forbidden"),
            Method::GET,
            Some("url=https://example.com/p/1"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Failed to retrieve video details.",
                "details": "Failed to fetch page: 403 Forbidden",
            })
        );
    }

    #[tokio::test]
    async fn test_no_video() {
        let (status, body, _) = call(
            FakePage::Html("<html><body>Nothing</body></html>"),
            Method::GET,
            Some("url=https://example.com/p/1"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "error": "Could not find a video source on the provided page." })
        );
    }
}
