use mockito::{Matcher, Server, ServerGuard};
use promptforge_core::llm::{
    AdapterRegistry, ErrorKind, GENERIC_FAILURE_MESSAGE, GenerationClient, GenerationRequest,
    Provider, ProviderEndpoints,
};
use promptforge_core::prompts::{AppCategory, PromptTemplateBuilder, Verbosity, merge_instruction};
use reqwest::Client as HttpClient;
use serde_json::json;

fn client_for(server: &ServerGuard) -> GenerationClient {
    let endpoints = ProviderEndpoints {
        openai_url: format!("{}/v1/chat/completions", server.url()),
        anthropic_url: format!("{}/v1/messages", server.url()),
        gemini_base_url: format!("{}/v1beta", server.url()),
    };
    GenerationClient::with_registry(AdapterRegistry::with_endpoints(HttpClient::new(), endpoints))
}

fn delta_frame(content: &str) -> String {
    format!(
        "data: {}\n\n",
        json!({"id": "chatcmpl-1", "choices": [{"index": 0, "delta": {"content": content}}]})
    )
}

fn gemini_frame(text: &str) -> String {
    format!(
        "data: {}\r\n\r\n",
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
    )
}

fn openai_request() -> GenerationRequest {
    GenerationRequest::new(Provider::OpenAI, "A snake game", "sk-test", "gpt-4o")
        .with_category(AppCategory::HtmlGames)
        .with_verbosity(Verbosity::Concise)
}

#[tokio::test]
async fn openai_stream_delivers_growing_snapshots() {
    let mut server = Server::new_async().await;
    let body = format!(
        "{}{}data: [DONE]\n\n",
        delta_frame("Hello"),
        delta_frame(" world")
    );
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o", "stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut snapshots = Vec::new();
    let mut on_partial = |snapshot: &str| snapshots.push(snapshot.to_string());
    let text = client
        .generate(&openai_request(), Some(&mut on_partial))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshots, vec!["Hello", "Hello world"]);
    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn openai_stream_skips_malformed_frame() {
    let mut server = Server::new_async().await;
    let body = format!(
        "{}data: {{not json}}\n\n{}data: [DONE]\n\n",
        delta_frame("Hello"),
        delta_frame(" world")
    );
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut snapshots = Vec::new();
    let mut on_partial = |snapshot: &str| snapshots.push(snapshot.to_string());
    let text = client
        .generate(&openai_request(), Some(&mut on_partial))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshots, vec!["Hello", "Hello world"]);
    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn openai_single_shot_sends_system_and_user_messages() {
    let mut server = Server::new_async().await;
    let instruction = PromptTemplateBuilder::build(AppCategory::HtmlGames, Verbosity::Concise);
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "stream": false,
            "messages": [
                {"role": "system", "content": instruction},
                {"role": "user", "content": "A snake game"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": "Build a snake game"}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let text = client_for(&server)
        .generate(&openai_request(), None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Build a snake game");
}

#[tokio::test]
async fn repeated_calls_are_independent_and_identical() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(
            json!({"choices": [{"message": {"role": "assistant", "content": "same answer"}}]})
                .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = openai_request();
    let first = client.generate(&request, None).await.unwrap();
    let second = client.clone().generate(&request, None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn compatible_without_endpoint_fails_before_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let request =
        GenerationRequest::new(Provider::OpenAICompatible, "A snake game", "key", "llama3");
    let error = client_for(&server)
        .generate(&request, None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::ConfigurationError);
    assert!(error.message().contains("Base URL"));
}

#[tokio::test]
async fn compatible_endpoint_gets_chat_completions_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer local-key")
        .match_body(Matcher::PartialJson(json!({"model": "llama3"})))
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "local answer"}}]}).to_string())
        .create_async()
        .await;

    let request =
        GenerationRequest::new(Provider::OpenAICompatible, "A snake game", "local-key", "llama3")
            .with_endpoint(format!("{}/v1/", server.url()));
    let text = client_for(&server)
        .generate(&request, None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "local answer");
}

#[tokio::test]
async fn unsupported_provider_makes_no_network_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = GenerationClient::with_registry(AdapterRegistry::empty());
    let error = client
        .generate(&openai_request(), None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::UnsupportedProvider);
    assert_eq!(error.message(), "Unsupported LLM provider: OpenAI");
}

#[tokio::test]
async fn empty_description_is_rejected() {
    let request = GenerationRequest::new(Provider::OpenAI, "   ", "sk-test", "gpt-4o");
    let error = GenerationClient::new()
        .generate(&request, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn provider_error_body_wins_normalization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Incorrect API key provided: sk-test","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let error = client_for(&server)
        .generate(&openai_request(), None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::ProviderReportedError);
    assert_eq!(error.message(), "Incorrect API key provided: sk-test");
    assert_eq!(error.provider_body(), None);
}

#[tokio::test]
async fn opaque_http_failure_keeps_transport_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(502)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let request = GenerationRequest::new(Provider::Anthropic, "A snake game", "sk-ant", "claude");
    let error = client_for(&server)
        .generate(&request, None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::TransportError);
    assert!(error.message().contains("HTTP 502"));
    assert_ne!(error.message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn malformed_single_shot_response_is_reported() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let error = client_for(&server)
        .generate(&openai_request(), None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn anthropic_merges_instruction_into_user_message() {
    let mut server = Server::new_async().await;
    let instruction =
        PromptTemplateBuilder::build(AppCategory::ReactViteGames, Verbosity::Detailed);
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-ant")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-5-sonnet-latest",
            "max_tokens": 1000,
            "messages": [
                {"role": "user", "content": merge_instruction(&instruction, "A platformer")}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "msg_1", "type": "message", "content": [{"type": "text", "text": "Build a platformer"}]})
                .to_string(),
        )
        .create_async()
        .await;

    let request = GenerationRequest::new(
        Provider::Anthropic,
        "A platformer",
        "sk-ant",
        "claude-3-5-sonnet-latest",
    )
    .with_category(AppCategory::ReactViteGames)
    .with_verbosity(Verbosity::Detailed);

    let mut snapshots = Vec::new();
    let mut on_partial = |snapshot: &str| snapshots.push(snapshot.to_string());
    let text = client_for(&server)
        .generate(&request, Some(&mut on_partial))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Build a platformer");
    assert_eq!(snapshots, vec!["Build a platformer"]);
}

#[tokio::test]
async fn anthropic_ignores_endpoint_override() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(json!({"content": [{"type": "text", "text": "ok"}]}).to_string())
        .create_async()
        .await;

    let request = GenerationRequest::new(Provider::Anthropic, "A game", "sk-ant", "claude")
        .with_endpoint("http://127.0.0.1:1/unused");
    let text = client_for(&server)
        .generate(&request, None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn openai_stream_error_event_is_reported() {
    let mut server = Server::new_async().await;
    let body = format!(
        "{}data: {}\n\n",
        delta_frame("Hel"),
        json!({"error": {"message": "Rate limit exceeded mid-stream", "type": "rate_limit"}})
    );
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let mut snapshots = Vec::new();
    let mut on_partial = |snapshot: &str| snapshots.push(snapshot.to_string());
    let error = client_for(&server)
        .generate(&openai_request(), Some(&mut on_partial))
        .await
        .unwrap_err();

    assert_eq!(snapshots, vec!["Hel"]);
    assert_eq!(error.kind(), ErrorKind::ProviderReportedError);
    assert_eq!(error.message(), "Rate limit exceeded mid-stream");
}

#[tokio::test]
async fn compatible_server_ignoring_stream_flag_still_returns_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"choices": [{"message": {"role": "assistant", "content": "Full answer"}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let request = GenerationRequest::new(Provider::OpenAICompatible, "A snake game", "local", "llama3")
        .with_endpoint(format!("{}/v1", server.url()));
    let mut snapshots = Vec::new();
    let mut on_partial = |snapshot: &str| snapshots.push(snapshot.to_string());
    let text = client_for(&server)
        .generate(&request, Some(&mut on_partial))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Full answer");
    assert_eq!(snapshots, vec!["Full answer"]);
}

#[tokio::test]
async fn openai_stream_without_events_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(": keep-alive\n\n")
        .create_async()
        .await;

    let error = client_for(&server)
        .generate(&openai_request(), Some(&mut |_: &str| {}))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn concurrent_streams_keep_separate_snapshots() {
    let mut server = Server::new_async().await;
    let _first = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(format!(
            "{}{}data: [DONE]\n\n",
            delta_frame("Snake"),
            delta_frame(" game")
        ))
        .create_async()
        .await;
    let _second = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o-mini"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(format!(
            "{}{}data: [DONE]\n\n",
            delta_frame("Todo"),
            delta_frame(" list")
        ))
        .create_async()
        .await;

    let client = client_for(&server);
    let first_request = openai_request();
    let second_request = GenerationRequest::new(Provider::OpenAI, "A todo list", "sk-test", "gpt-4o-mini");

    let mut first_snapshots = Vec::new();
    let mut second_snapshots = Vec::new();
    let mut on_first = |snapshot: &str| first_snapshots.push(snapshot.to_string());
    let mut on_second = |snapshot: &str| second_snapshots.push(snapshot.to_string());

    let (first, second) = tokio::join!(
        client.generate(&first_request, Some(&mut on_first)),
        client.generate(&second_request, Some(&mut on_second)),
    );

    assert_eq!(first.unwrap(), "Snake game");
    assert_eq!(second.unwrap(), "Todo list");
    assert_eq!(first_snapshots, vec!["Snake", "Snake game"]);
    assert_eq!(second_snapshots, vec!["Todo", "Todo list"]);
}

#[tokio::test]
async fn gemini_stream_delivers_growing_snapshots() {
    let mut server = Server::new_async().await;
    let expected_prompt = merge_instruction(
        &PromptTemplateBuilder::build(AppCategory::ThreeJsVisualizations, Verbosity::Standard),
        "A galaxy",
    );
    let mock = server
        .mock(
            "POST",
            Matcher::Regex(r"^/v1beta/models/gemini-2\.5-flash:streamGenerateContent".to_string()),
        )
        .match_query(Matcher::UrlEncoded("alt".to_string(), "sse".to_string()))
        .match_header("x-goog-api-key", "gm-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{"role": "user", "parts": [{"text": expected_prompt}]}]
        })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(format!("{}{}", gemini_frame("Render"), gemini_frame(" a galaxy")))
        .create_async()
        .await;

    let request = GenerationRequest::new(Provider::Gemini, "A galaxy", "gm-key", "gemini-2.5-flash")
        .with_category(AppCategory::ThreeJsVisualizations);
    let mut snapshots = Vec::new();
    let mut on_partial = |snapshot: &str| snapshots.push(snapshot.to_string());
    let text = client_for(&server)
        .generate(&request, Some(&mut on_partial))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshots, vec!["Render", "Render a galaxy"]);
    assert_eq!(text, "Render a galaxy");
}

#[tokio::test]
async fn gemini_single_shot_without_text_is_malformed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .with_status(200)
        .with_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string())
        .create_async()
        .await;

    let request = GenerationRequest::new(Provider::Gemini, "A galaxy", "gm-key", "gemini-2.5-flash");
    let error = client_for(&server)
        .generate(&request, None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(error.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn gemini_stream_without_text_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock(
            "POST",
            Matcher::Regex(r"^/v1beta/models/gemini-2\.5-flash:streamGenerateContent".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(format!(
            "data: {}\r\n\r\n",
            json!({"promptFeedback": {"blockReason": "SAFETY"}})
        ))
        .create_async()
        .await;

    let request = GenerationRequest::new(Provider::Gemini, "A galaxy", "gm-key", "gemini-2.5-flash");
    let mut calls = 0;
    let mut on_partial = |_: &str| calls += 1;
    let error = client_for(&server)
        .generate(&request, Some(&mut on_partial))
        .await
        .unwrap_err();

    assert_eq!(calls, 0);
    assert_eq!(error.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn generate_record_packages_result() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "recorded"}}]}).to_string())
        .create_async()
        .await;

    let record = client_for(&server)
        .generate_record(&openai_request(), None)
        .await
        .unwrap();

    assert_eq!(record.result_text, "recorded");
    assert_eq!(record.provider, Provider::OpenAI);
    assert_eq!(record.verbosity, Verbosity::Concise);
    assert_eq!(record.redacted().credential, "****");
}
