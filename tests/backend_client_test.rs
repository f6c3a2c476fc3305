//! Integration tests for the Ollama backend client and the
//! generation-backed extractor, against a mock HTTP server.

use std::sync::Arc;

use mockito::Server;

use docqa::domain::errors::QueryError;
use docqa::domain::models::{BackendConfig, Chunk, RetryConfig, ScoredChunk};
use docqa::domain::ports::{AnswerExtractor, EmbeddingClient};
use docqa::infrastructure::backend::{OllamaClient, RetryPolicy};
use docqa::services::{GenerationExtractor, NOT_FOUND};

fn client_for(server: &Server, dimension: usize, max_retries: u32) -> OllamaClient {
    let config = BackendConfig {
        base_url: server.url(),
        embed_model: "nomic-embed-text".to_string(),
        generate_model: "tinyllama".to_string(),
        dimension,
        timeout_secs: 5,
    };
    let retry = RetryPolicy::from(&RetryConfig {
        max_retries,
        initial_backoff_ms: 10,
        max_backoff_ms: 50,
    });

    OllamaClient::new(config, retry).expect("client")
}

fn scored(index: usize, text: &str) -> ScoredChunk {
    ScoredChunk {
        chunk: Chunk::new("docs", text.to_string(), 0, index),
        score: 0.1,
    }
}

#[tokio::test]
async fn test_embed_parses_vector() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/embeddings")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"embedding": [0.1, 0.2, 0.3]}"#)
        .create_async()
        .await;

    let client = client_for(&server, 3, 0);
    let vector = client.embed("hello").await.expect("embed");

    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_batch_preserves_input_order() {
    let mut server = Server::new_async().await;
    let mock_a = server
        .mock("POST", "/api/embeddings")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"prompt": "alpha"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"embedding": [1.0, 0.0]}"#)
        .create_async()
        .await;
    let mock_b = server
        .mock("POST", "/api/embeddings")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"prompt": "beta"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"embedding": [0.0, 1.0]}"#)
        .create_async()
        .await;

    let client = client_for(&server, 2, 0);
    let vectors = client
        .embed_batch(&["alpha".to_string(), "beta".to_string()])
        .await
        .expect("embed batch");

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    mock_a.assert_async().await;
    mock_b.assert_async().await;
}

#[tokio::test]
async fn test_embed_retries_transient_errors_then_fails() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/embeddings")
        .with_status(500)
        .with_body("internal error")
        .expect(3) // initial attempt + 2 retries
        .create_async()
        .await;

    let client = client_for(&server, 3, 2);
    let err = client.embed("hello").await.expect_err("backend down");

    assert!(matches!(err, QueryError::BackendUnavailable(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_does_not_retry_client_errors() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/embeddings")
        .with_status(404)
        .with_body(r#"{"error": "model not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, 3, 3);
    let err = client.embed("hello").await.expect_err("unknown model");

    assert!(matches!(err, QueryError::BackendUnavailable(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_rejects_dimension_mismatch() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embedding": [0.1, 0.2]}"#)
        .create_async()
        .await;

    let client = client_for(&server, 3, 0);
    let err = client.embed("hello").await.expect_err("wrong dimension");

    assert!(matches!(
        err,
        QueryError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn test_embed_unreachable_host_is_backend_unavailable() {
    // Nothing listens here
    let config = BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        ..BackendConfig::default()
    };
    let client = OllamaClient::new(config, RetryPolicy::new(0, 10, 50)).expect("client");

    let err = client.embed("hello").await.expect_err("unreachable");
    assert!(matches!(err, QueryError::BackendUnavailable(_)));
}

#[tokio::test]
async fn test_generation_extractor_returns_answer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(r#"{"response": "\"Jane Doe\""}"#)
        .create_async()
        .await;

    let client = Arc::new(client_for(&server, 3, 0));
    let extractor = GenerationExtractor::new(client);

    let extraction = extractor
        .extract("What is my name?", &[scored(0, "My name is Jane Doe.")])
        .await
        .expect("extract");

    assert!(extraction.found);
    assert_eq!(extraction.answer, "Jane Doe");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generation_extractor_detects_sentinel() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(r#"{"response": "NOT_FOUND"}"#)
        .create_async()
        .await;

    let client = Arc::new(client_for(&server, 3, 0));
    let extractor = GenerationExtractor::new(client);

    let extraction = extractor
        .extract("What is the capital of Mars?", &[scored(0, "My name is Jane Doe.")])
        .await
        .expect("extract");

    assert!(!extraction.found);
    assert_eq!(extraction.answer, NOT_FOUND);
}

#[tokio::test]
async fn test_generation_extractor_detects_embedded_sentinel() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(r#"{"response": "The answer is NOT_FOUND in the context."}"#)
        .create_async()
        .await;

    let client = Arc::new(client_for(&server, 3, 0));
    let extractor = GenerationExtractor::new(client);

    let extraction = extractor
        .extract("What is the capital of Mars?", &[scored(0, "context")])
        .await
        .expect("extract");

    assert!(!extraction.found);
    assert_eq!(extraction.answer, NOT_FOUND);
}

#[tokio::test]
async fn test_generation_extractor_skips_backend_without_context() {
    // No mock server at all: an empty retrieval must not hit the backend
    let config = BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        ..BackendConfig::default()
    };
    let client = Arc::new(OllamaClient::new(config, RetryPolicy::new(0, 10, 50)).expect("client"));
    let extractor = GenerationExtractor::new(client);

    let extraction = extractor
        .extract("Anything?", &[])
        .await
        .expect("extract without backend");

    assert!(!extraction.found);
    assert_eq!(extraction.answer, NOT_FOUND);
}

#[tokio::test]
async fn test_generation_extractor_backend_error_propagates() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let client = Arc::new(client_for(&server, 3, 1));
    let extractor = GenerationExtractor::new(client);

    let err = extractor
        .extract("What is my name?", &[scored(0, "My name is Jane Doe.")])
        .await
        .expect_err("backend failure is an error, not a miss");

    assert!(matches!(err, QueryError::BackendUnavailable(_)));
}

#[tokio::test]
async fn test_prompt_carries_context_and_question() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("My name is Jane Doe".to_string()),
            mockito::Matcher::Regex("Question: What is my name\\?".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"response": "Jane Doe"}"#)
        .create_async()
        .await;

    let client = Arc::new(client_for(&server, 3, 0));
    let extractor = GenerationExtractor::new(client);

    extractor
        .extract("What is my name?", &[scored(0, "My name is Jane Doe.")])
        .await
        .expect("extract");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_reachable_probes_version_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/version")
        .with_status(200)
        .with_body(r#"{"version": "0.5.0"}"#)
        .create_async()
        .await;

    let client = client_for(&server, 3, 0);
    client.check_reachable().await.expect("reachable");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_reachable_fails_when_down() {
    let config = BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        ..BackendConfig::default()
    };
    let client = OllamaClient::new(config, RetryPolicy::new(0, 10, 50)).expect("client");

    let err = client.check_reachable().await.expect_err("down");
    assert!(matches!(err, QueryError::BackendUnavailable(_)));
}
