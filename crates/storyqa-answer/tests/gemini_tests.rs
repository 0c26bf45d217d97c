use std::time::Duration;

use mockito::Matcher;
use storyqa_answer::GeminiClient;
use storyqa_core::traits::Generator;

const PATH: &str = "/v1beta/models/test-model:generateContent";

fn client(server: &mockito::ServerGuard) -> GeminiClient {
    GeminiClient::new("test-key".to_string(), "test-model".to_string(), Duration::from_secs(5))
        .expect("client")
        .with_base_url(server.url())
}

#[test]
fn returns_candidate_text() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::PartialJsonString(r#"{"contents":[{"parts":[{"text":"Question: who?"}]}]}"#.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"It was "},{"text":"Tom."}],"role":"model"},"finishReason":"STOP"}]}"#)
        .create();

    let answer = client(&server).generate("Question: who?").expect("generate");
    assert_eq!(answer, "It was Tom.");
    mock.assert();
}

#[test]
fn empty_candidates_are_an_error() {
    let mut server = mockito::Server::new();
    server.mock("POST", PATH).match_query(Matcher::Any).with_status(200).with_body(r#"{"candidates":[]}"#).create();

    let err = client(&server).generate("q").unwrap_err();
    assert_eq!(err.to_string(), "Gemini returned empty response");
}

#[test]
fn http_errors_carry_status_and_body() {
    let mut server = mockito::Server::new();
    server.mock("POST", PATH).match_query(Matcher::Any).with_status(429).with_body("RESOURCE_EXHAUSTED").create();

    let err = client(&server).generate("q").unwrap_err().to_string();
    assert!(err.contains("429"), "{err}");
    assert!(err.contains("RESOURCE_EXHAUSTED"), "{err}");
}

#[test]
fn missing_key_is_rejected() {
    assert!(GeminiClient::new(String::new(), "m".to_string(), Duration::from_secs(1)).is_err());
}
