//! HTTP API server for prompt-building services.
//!
//! Exposes the subtitle context to services that assemble model prompts.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::{CorpusCache, CorpusStats, EpisodeId};
use crate::retrieval::Retriever;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    retriever: Retriever<'static>,
}

/// Build the API router over `corpus`.
pub fn router(corpus: &'static CorpusCache, settings: &Settings) -> Router {
    let state = Arc::new(AppState {
        retriever: Retriever::from_settings(corpus, &settings.retrieval),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/knowledge/status", get(knowledge_status))
        .route("/api/context", post(context))
        .route("/api/search", post(search))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: &str,
    port: u16,
    corpus: &'static CorpusCache,
    settings: &Settings,
) -> anyhow::Result<()> {
    let app = router(corpus, settings);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Zimu API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /api/health");
    Output::kv("Knowledge status", "GET  /api/knowledge/status");
    Output::kv("Context", "POST /api/context");
    Output::kv("Search", "POST /api/search");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextRequest {
    #[serde(default)]
    question: Option<Value>,
    #[serde(default)]
    max_chars: Option<usize>,
}

#[derive(Serialize)]
struct ContextResponse {
    context: String,
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(default)]
    question: Option<Value>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Question text of a request; anything but a JSON string selects no terms.
fn question_text(question: Option<Value>) -> String {
    question
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Serialize)]
struct SearchResult {
    episode: EpisodeId,
    start: f64,
    timestamp: String,
    score: usize,
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeStatusResponse {
    subtitles_loaded: bool,
    segments: usize,
    episodes: usize,
    hint: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn knowledge_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let corpus = state.retriever.corpus();
    let stats = CorpusStats::from_segments(corpus.load_segments());
    let loaded = stats.segments > 0;

    let hint = if loaded {
        "Relevant course subtitles are injected into interpretation prompts".to_string()
    } else {
        format!(
            "No subtitle corpus at {}; prompts use the built-in knowledge only",
            corpus.path().display()
        )
    };

    Json(KnowledgeStatusResponse {
        subtitles_loaded: loaded,
        segments: stats.segments,
        episodes: stats.episodes,
        hint,
    })
}

async fn context(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> impl IntoResponse {
    let question = question_text(req.question);
    let max_chars = req.max_chars.unwrap_or(state.retriever.max_chars());

    let context = state
        .retriever
        .clone()
        .with_max_chars(max_chars)
        .relevant_context(&question);

    Json(ContextResponse { context })
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let question = question_text(req.question);

    let results = state
        .retriever
        .top_matches(&question, req.limit)
        .into_iter()
        .map(|scored| SearchResult {
            episode: scored.segment.episode.clone(),
            start: scored.segment.start,
            timestamp: scored.segment.format_timestamp(),
            score: scored.score,
            text: scored.segment.text.clone(),
        })
        .collect();

    Json(SearchResponse { results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Segment;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn corpus(segments: Vec<Segment>) -> &'static CorpusCache {
        Box::leak(Box::new(CorpusCache::from_segments(segments)))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(corpus(Vec::new()), &Settings::default());
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .expect("request");

        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_knowledge_status_reports_counts() {
        let app = router(
            corpus(vec![
                Segment::new(1, 0.0, "值符值使"),
                Segment::new(2, 3.0, "八门九星"),
            ]),
            &Settings::default(),
        );
        let request = Request::builder()
            .uri("/api/knowledge/status")
            .body(Body::empty())
            .expect("request");

        let (_, body) = call(app, request).await;
        assert_eq!(body["subtitlesLoaded"], true);
        assert_eq!(body["segments"], 2);
        assert_eq!(body["episodes"], 2);
    }

    #[tokio::test]
    async fn test_context_endpoint() {
        let app = router(
            corpus(vec![
                Segment::new(1, 0.0, "八门九星用神讲解"),
                Segment::new(2, 10.0, "短"),
            ]),
            &Settings::default(),
        );

        let (status, body) = call(
            app,
            post_json("/api/context", serde_json::json!({ "question": "用神" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let context = body["context"].as_str().unwrap();
        assert!(context.contains("[第1集] 八门九星用神讲解"));
        assert!(!context.contains("短"));
    }

    #[tokio::test]
    async fn test_context_endpoint_tolerates_missing_question_and_zero_budget() {
        let app = router(
            corpus(vec![Segment::new(1, 0.0, "八门九星用神讲解")]),
            &Settings::default(),
        );

        let (_, body) = call(
            app.clone(),
            post_json("/api/context", serde_json::json!({ "question": null })),
        )
        .await;
        assert!(body["context"].as_str().unwrap().contains("[第1集]"));

        let (_, body) = call(
            app,
            post_json(
                "/api/context",
                serde_json::json!({ "question": "用神", "maxChars": 0 }),
            ),
        )
        .await;
        assert_eq!(body["context"], "");
    }

    #[tokio::test]
    async fn test_non_string_question_selects_no_terms() {
        let app = router(
            corpus(vec![
                Segment::new(1, 0.0, "八门九星用神讲解"),
                Segment::new(2, 5.0, "值符为一盘之主"),
            ]),
            &Settings::default(),
        );

        let (status, body) = call(
            app.clone(),
            post_json("/api/context", serde_json::json!({ "question": 42 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["context"],
            format!(
                "\n\n## {}\n[第1集] 八门九星用神讲解\n[第2集] 值符为一盘之主\n",
                crate::retrieval::DEFAULT_HEADER
            )
        );

        let (status, body) = call(
            app,
            post_json("/api/search", serde_json::json!({ "question": ["用神"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let app = router(
            corpus(vec![
                Segment::new(1, 65.0, "生门主财运"),
                Segment::new(2, 0.0, "杜门主闭塞"),
            ]),
            &Settings::default(),
        );

        let (_, body) = call(
            app,
            post_json("/api/search", serde_json::json!({ "question": "财运如何", "limit": 5 })),
        )
        .await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["episode"], 1);
        assert_eq!(results[0]["timestamp"], "01:05");
        assert_eq!(results[0]["score"], 2);
    }
}
