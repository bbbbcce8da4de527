use super::*;
use serde_json::Value;

fn prompts(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

fn choice(index: u32, text: &str, finish_reason: Option<&str>) -> Value {
    serde_json::json!({
        "index": index,
        "text": text,
        "logprobs": null,
        "finish_reason": finish_reason,
    })
}

fn response(choices: Vec<Value>) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": "cmpl-test",
        "object": "text_completion",
        "created": 1700000000,
        "model": "llama3-8b",
        "choices": choices,
    }))
    .unwrap()
}

// ---------------------------------------------------------------------------
// build_request_body
// ---------------------------------------------------------------------------

#[test]
fn test_build_request_body_defaults() {
    let adapter = OpenAiCompletionsAdapter;
    let body = adapter
        .build_request_body("llama3-8b", &prompts(&["a ", "b "]), &SamplingParams::default())
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["model"], "llama3-8b");
    assert_eq!(json["prompt"], serde_json::json!(["a ", "b "]));
    assert_eq!(json["n"], 5);
    assert_eq!(json["temperature"], 1.0);
    assert_eq!(json["top_p"], 1.0);
    assert_eq!(json["max_tokens"], 256);
    assert_eq!(json["seed"], 1814);
    // Empty stop list is omitted
    assert!(json.get("stop").is_none());
}

#[test]
fn test_build_request_body_with_stop_and_no_seed() {
    let adapter = OpenAiCompletionsAdapter;
    let params = SamplingParams {
        num_samples: 2,
        seed: None,
        stop: vec!["\n\n".to_owned()],
        ..SamplingParams::default()
    };
    let body = adapter
        .build_request_body("m", &prompts(&["q"]), &params)
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["n"], 2);
    assert_eq!(json["stop"], serde_json::json!(["\n\n"]));
    assert!(json.get("seed").is_none());
}

// ---------------------------------------------------------------------------
// parse_response
// ---------------------------------------------------------------------------

#[test]
fn test_parse_response_groups_by_prompt() {
    let adapter = OpenAiCompletionsAdapter;
    let body = response(vec![
        choice(0, "p0-s0", Some("stop")),
        choice(1, "p0-s1", Some("length")),
        choice(2, "p1-s0", Some("stop")),
        choice(3, "p1-s1", None),
    ]);

    let outputs = adapter.parse_response(&body, 2, 2).unwrap();

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0][0], Completion::new("p0-s0", Some(FinishReason::Stop)));
    assert_eq!(outputs[0][1], Completion::new("p0-s1", Some(FinishReason::Length)));
    assert_eq!(outputs[1][0].text, "p1-s0");
    assert_eq!(outputs[1][1].finish_reason, None);
}

#[test]
fn test_parse_response_sorts_out_of_order_choices() {
    let adapter = OpenAiCompletionsAdapter;
    let body = response(vec![
        choice(2, "p1-s0", Some("stop")),
        choice(0, "p0-s0", Some("stop")),
        choice(3, "p1-s1", Some("stop")),
        choice(1, "p0-s1", Some("stop")),
    ]);

    let outputs = adapter.parse_response(&body, 2, 2).unwrap();

    let texts: Vec<Vec<&str>> = outputs
        .iter()
        .map(|o| o.iter().map(|c| c.text.as_str()).collect())
        .collect();
    assert_eq!(texts, vec![vec!["p0-s0", "p0-s1"], vec!["p1-s0", "p1-s1"]]);
}

#[test]
fn test_parse_response_unknown_finish_reason_kept() {
    let adapter = OpenAiCompletionsAdapter;
    let body = response(vec![choice(0, "x", Some("abort"))]);

    let outputs = adapter.parse_response(&body, 1, 1).unwrap();
    assert_eq!(
        outputs[0][0].finish_reason,
        Some(FinishReason::Other("abort".to_owned()))
    );
}

#[test]
fn test_parse_response_wrong_choice_count() {
    let adapter = OpenAiCompletionsAdapter;
    let body = response(vec![choice(0, "only one", Some("stop"))]);

    let err = adapter.parse_response(&body, 1, 2).unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
    assert!(err.to_string().contains("expected 2 choices"));
}

#[test]
fn test_parse_response_duplicate_index() {
    let adapter = OpenAiCompletionsAdapter;
    let body = response(vec![choice(0, "a", None), choice(0, "b", None)]);

    let err = adapter.parse_response(&body, 1, 2).unwrap_err();
    assert!(err.to_string().contains("missing index 1"));
}

#[test]
fn test_parse_response_invalid_json() {
    let adapter = OpenAiCompletionsAdapter;
    let err = adapter.parse_response(b"not json", 1, 1).unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
}
