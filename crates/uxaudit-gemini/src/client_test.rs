use super::*;

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url(base_url, Some(30)).expect("client construction should not fail")
}

#[test]
fn endpoint_appends_model_path() {
    let client = test_client("https://generativelanguage.googleapis.com");
    let url = client.endpoint("gemini-3-pro-preview").expect("valid url");
    assert_eq!(
        url.as_str(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
    );
}

#[test]
fn endpoint_strips_trailing_slashes() {
    let client = test_client("http://127.0.0.1:9999//");
    let url = client.endpoint("m").expect("valid url");
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:9999/v1beta/models/m:generateContent"
    );
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let client = test_client("http://proxy.local/gemini");
    let url = client.endpoint("m").expect("valid url");
    assert_eq!(
        url.as_str(),
        "http://proxy.local/gemini/v1beta/models/m:generateContent"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = GeminiClient::with_base_url("not a url", None)
        .err()
        .expect("should fail");
    assert!(matches!(err, GeminiError::InvalidBaseUrl { .. }));
}

#[test]
fn api_error_message_prefers_provider_message() {
    let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
    assert_eq!(api_error_message(body), "API key not valid.");
}

#[test]
fn api_error_message_falls_back_to_raw_body() {
    assert_eq!(api_error_message("  upstream hiccup \n"), "upstream hiccup");
    assert_eq!(api_error_message(""), "no error details returned");
}
