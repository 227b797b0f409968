//! End-to-end tests for the summarizer and tutor against a local mock API.

use mockito::{Matcher, Mock, ServerGuard};
use precis::agent::SUMMARY_SYSTEM_PROMPT;
use precis::llm::LlmError;
use precis::{AgentError, Config, ParseError, Summarizer, Tutor};
use serde_json::json;

const MIGRATION_REPLY: &str = r#"{"tldr":"Discussed cloud migration.","key_points":["Migration planned"],"action_items":[],"risks":["Delays possible"],"open_questions":["Which region?"]}"#;

const MIGRATION_TEXT: &str =
    "We discussed migrating to cloud. Risk: delays. Open question: which region?";

fn test_config(server: &ServerGuard) -> Config {
    let mut config = Config::default().with_api_key("sk-test");
    config.agent.base_url = server.url();
    config
}

/// Chat completion body carrying `content` as the first choice
fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4.1-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

async fn mock_reply(server: &mut ServerGuard, content: &str) -> Mock {
    server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(content))
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn summarize_returns_parsed_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_reply(&mut server, MIGRATION_REPLY).await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let summary = summarizer.summarize(MIGRATION_TEXT).await.unwrap();

    assert_eq!(summary.tldr, "Discussed cloud migration.");
    assert_eq!(summary.key_points, vec!["Migration planned"]);
    assert!(summary.action_items.is_empty());
    assert_eq!(summary.risks, vec!["Delays possible"]);
    assert_eq!(summary.open_questions, vec!["Which region?"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn summarize_sends_system_prompt_text_and_low_temperature() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "gpt-4.1-mini",
                "temperature": 0.2,
                "messages": [{"role": "system", "content": SUMMARY_SYSTEM_PROMPT}]
            })),
            Matcher::Regex("which region\\?".to_string()),
        ]))
        .with_status(200)
        .with_body(completion(MIGRATION_REPLY))
        .expect(1)
        .create_async()
        .await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    summarizer.summarize(MIGRATION_TEXT).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn summarize_recovers_fenced_json() {
    let mut server = mockito::Server::new_async().await;
    let fenced = format!("Here you go:\n```json\n{}\n```", MIGRATION_REPLY);
    let _mock = mock_reply(&mut server, &fenced).await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let summary = summarizer.summarize(MIGRATION_TEXT).await.unwrap();

    assert_eq!(summary, precis::parse_summary(MIGRATION_REPLY).unwrap());
}

#[tokio::test]
async fn summarize_fails_when_reply_has_no_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_reply(&mut server, "Sorry, I cannot help with that.").await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let err = summarizer.summarize(MIGRATION_TEXT).await.unwrap_err();

    assert!(matches!(err, AgentError::Parse(ParseError::NoJsonFound)));
    // Terminal: no retry
    mock.assert_async().await;
}

#[tokio::test]
async fn summarize_fails_when_tldr_missing() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_reply(&mut server, r#"{"key_points":["a","b","c"]}"#).await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let err = summarizer.summarize(MIGRATION_TEXT).await.unwrap_err();

    assert!(matches!(err, AgentError::Parse(ParseError::SchemaValidation(_))));
}

#[tokio::test]
async fn api_error_status_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .expect(1)
        .create_async()
        .await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let err = summarizer.summarize(MIGRATION_TEXT).await.unwrap_err();

    match err {
        AgentError::Llm(LlmError::Api { status, body }) => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Incorrect API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_choices_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let err = summarizer.summarize(MIGRATION_TEXT).await.unwrap_err();

    assert!(matches!(err, AgentError::Llm(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn null_content_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
        .create_async()
        .await;

    let summarizer = Summarizer::new(&test_config(&server)).unwrap();
    let err = summarizer.summarize(MIGRATION_TEXT).await.unwrap_err();

    assert!(matches!(err, AgentError::Llm(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn unreachable_endpoint_is_http_error() {
    // Nothing listens on port 1.
    let mut config = Config::default().with_api_key("sk-test");
    config.agent.base_url = "http://127.0.0.1:1".to_string();

    let summarizer = Summarizer::new(&config).unwrap();
    let err = summarizer.summarize(MIGRATION_TEXT).await.unwrap_err();

    assert!(matches!(err, AgentError::Llm(LlmError::Http(_))));
}

#[tokio::test]
async fn tutor_uses_persona_and_trims_reply() {
    let mut server = mockito::Server::new_async().await;
    let config = test_config(&server);
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "temperature": 0.4,
            "messages": [
                {"role": "system", "content": config.ask.persona},
                {"role": "user", "content": "What is an embedding?"}
            ]
        })))
        .with_status(200)
        .with_body(completion("  A vector of numbers.\n"))
        .expect(1)
        .create_async()
        .await;

    let tutor = Tutor::new(&config).unwrap();
    let answer = tutor.ask("What is an embedding?").await.unwrap();

    assert_eq!(answer, "A vector of numbers.");
    mock.assert_async().await;
}
