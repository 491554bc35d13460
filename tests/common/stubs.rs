//! Stub upstream services
//!
//! Small axum apps standing in for the Musixmatch matcher API and the
//! OpenAI chat completions API. Every hit is counted so tests can assert on
//! outbound traffic.

use super::constants::*;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// A running stub and its hit counter.
pub struct StubService {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubService {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub port");
    let addr = listener.local_addr().expect("Failed to get stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub failed");
    });
    format!("http://{}", addr)
}

async fn lyrics_lookup(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);

    let authorized = params.get("apikey").map(String::as_str) == Some(TEST_MUSIXMATCH_KEY);
    let known = params.get("q_artist").map(String::as_str) == Some(KNOWN_ARTIST)
        && params.get("q_track").map(String::as_str) == Some(KNOWN_TITLE);

    if !authorized {
        return Json(json!({"message": {"header": {"status_code": 401}, "body": []}}));
    }
    if !known {
        return Json(json!({"message": {"header": {"status_code": 404}, "body": []}}));
    }
    Json(json!({
        "message": {
            "header": {"status_code": 200},
            "body": {"lyrics": {"lyrics_body": KNOWN_LYRICS}}
        }
    }))
}

pub async fn spawn_musixmatch_stub() -> StubService {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/matcher.lyrics.get", get(lyrics_lookup))
        .with_state(hits.clone());
    StubService {
        base_url: serve(router).await,
        hits,
    }
}

async fn chat_completion(
    State(hits): State<Arc<AtomicUsize>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);

    let system_prompt = request["messages"][0]["content"].as_str().unwrap_or_default();
    let answer = if system_prompt.contains("countries") {
        STUB_COUNTRIES_RAW
    } else {
        STUB_SUMMARY
    };

    Json(json!({
        "choices": [{
            "message": {"role": "assistant", "content": answer},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30}
    }))
}

pub async fn spawn_openai_stub() -> StubService {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/chat/completions", post(chat_completion))
        .with_state(hits.clone());
    StubService {
        base_url: serve(router).await,
        hits,
    }
}
