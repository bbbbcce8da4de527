use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::Value;

use pp_cli::bootstrap::RuntimeConfig;
use pp_cli::config::AppConfig;

// ---------------------------------------------------------------------------
// MockCompletionServer: configurable mock of a /v1/completions backend
// ---------------------------------------------------------------------------

enum MockReply {
    /// Fixed body and status for every request.
    Fixed { body: String, status: u16 },
    /// `n` choices per prompt, text `"{text} (prompt {i}, sample {j})"`.
    Echo { text: String },
}

struct MockState {
    reply: MockReply,
    requests: Mutex<Vec<Value>>,
}

pub struct MockCompletionServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockCompletionServer {
    pub async fn start_echo(text: &str) -> Self {
        Self::start_with_reply(MockReply::Echo {
            text: text.to_owned(),
        })
        .await
    }

    pub async fn start_with_options(response_body: &str, status: u16) -> Self {
        Self::start_with_reply(MockReply::Fixed {
            body: response_body.to_owned(),
            status,
        })
        .await
    }

    async fn start_with_reply(reply: MockReply) -> Self {
        let state = Arc::new(MockState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = axum::Router::new()
            .route("/v1/completions", post(mock_completion_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received so far, in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

async fn mock_completion_handler(State(state): State<Arc<MockState>>, body: Bytes) -> Response {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(request.clone());

    match &state.reply {
        MockReply::Fixed { body, status } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body.clone(),
            )
                .into_response()
        }
        MockReply::Echo { text } => {
            let prompts = request["prompt"].as_array().map_or(0, Vec::len);
            let n = request["n"].as_u64().unwrap_or(1) as usize;
            let choices: Vec<Value> = (0..prompts * n)
                .map(|index| {
                    serde_json::json!({
                        "index": index,
                        "text": format!("{text} (prompt {}, sample {})", index / n, index % n),
                        "logprobs": null,
                        "finish_reason": "stop",
                    })
                })
                .collect();
            (
                StatusCode::OK,
                axum::Json(serde_json::json!({
                    "id": "cmpl-mock",
                    "object": "text_completion",
                    "created": 1700000000,
                    "model": TEST_MODEL,
                    "choices": choices,
                })),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

pub const TEST_MODEL: &str = "llama3-8b";

/// Runtime config rooted in `root`, with a small QA corpus and a
/// conversation corpus on disk, pointed at `base_url`.
pub fn runtime_in(root: &Path, base_url: &str) -> RuntimeConfig {
    let mut config = AppConfig::default();
    config.output.data_dir = root.join("data");
    config.output.card_dir = root.join("cards");
    config.oasst.corpus_dir = root.join("oasst");
    config.oasst.dev_size = 1;
    config.gsm8k.corpus_dir = root.join("gsm8k");
    config.generation.base_url = base_url.to_owned();
    config.generation.model = TEST_MODEL.to_owned();
    config.generation.num_samples = 2;
    config.generation.batch_size = 2;

    write_qa_corpus(&config.gsm8k.corpus_dir);
    write_conversation_corpus(&config.oasst.corpus_dir);

    pp_cli::bootstrap::into_runtime(config).expect("test config should be valid")
}

fn write_qa_corpus(dir: &Path) {
    let lines = [
        r#"{"question":"Tom has 3 apples and buys 2 more. How many apples does he have?","answer":"3 + 2 = 5\n#### 5"}"#,
        r#"{"question":"A box holds 12 eggs. How many eggs are in 3 boxes?","answer":"12 * 3 = 36\n#### 36"}"#,
        r#"{"question":"Sam reads 1,000 pages a week. How many in 2 weeks?","answer":"1,000 * 2 = 2,000\n#### 2,000"}"#,
    ];
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("train.jsonl"), lines.join("\n")).unwrap();
}

fn turn(
    id: &str,
    parent: Option<&str>,
    role: &str,
    text: &str,
    lang: &str,
    rank: Option<u32>,
) -> String {
    // Every tree here is a single exchange, so the tree id is the root prompt.
    let tree = parent.unwrap_or(id);
    serde_json::json!({
        "message_id": id,
        "parent_id": parent,
        "message_tree_id": tree,
        "role": role,
        "text": text,
        "lang": lang,
        "rank": rank,
        "synthetic": false,
    })
    .to_string()
}

fn write_conversation_corpus(dir: &Path) {
    let lines = [
        turn("p1", None, "prompter", "Name a prime.", "en", None),
        turn("a1", Some("p1"), "assistant", "7", "en", Some(0)),
        turn("a2", Some("p1"), "assistant", "9", "en", Some(1)),
        turn("p2", None, "prompter", "Nenne eine Primzahl.", "de", None),
        turn("a3", Some("p2"), "assistant", "5", "de", Some(0)),
        turn("a4", Some("p2"), "assistant", "4", "de", Some(1)),
        turn("p3", None, "prompter", "Name a colour.", "en", None),
        turn("a5", Some("p3"), "assistant", "Red", "en", Some(0)),
        turn("a6", Some("p3"), "assistant", "Loud", "en", Some(2)),
        turn("a7", Some("p3"), "assistant", "Blue", "en", None),
    ];
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("train.jsonl"), lines.join("\n")).unwrap();
}
