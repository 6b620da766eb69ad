use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

// The service can answer with `"content": null` (refusals, tool
// calls) so content stays optional on the way in.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<Message>,
}

// Object {
//     "id": String("chatcmpl-123"),
//     "object": String("chat.completion"),
//     "choices": Array [
//         Object {
//             "index": Number(0),
//             "message": Object {
//                 "role": String("assistant"),
//                 "content": String("Hello!")
//             },
//             "finish_reason": String("stop")
//         }
//     ]
// }
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Candidate messages that actually carry text, in the order the
    /// service returned them.
    pub fn candidates(self) -> Vec<Message> {
        self.choices
            .into_iter()
            .filter_map(|choice| choice.message)
            .filter(|msg| msg.content.is_some())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

/// Sends the transcript to an OpenAI compatible chat completions
/// endpoint. Non-2xx responses become errors carrying the message the
/// service reported, falling back to the status line.
pub async fn completion(
    client: &reqwest::Client,
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<CompletionResponse, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| status.to_string());
        return Err(anyhow!(message));
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new(Role::System, "You are a pirate");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"system","content":"You are a pirate"}"#
        );
    }

    #[test]
    fn test_message_null_content_deserialization() {
        let json = r#"{"role":"assistant","content":null,"refusal":"no"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_none());
    }

    #[test]
    fn test_candidates_skip_missing_messages() {
        let json = r#"{"choices":[
            {"index":0},
            {"index":1,"message":{"role":"assistant","content":null}},
            {"index":2,"message":{"role":"assistant","content":"Ahoy"}}
        ]}"#;
        let resp: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.candidates(),
            vec![Message::new(Role::Assistant, "Ahoy")]
        );
    }

    #[test]
    fn test_candidates_without_choices() {
        let resp: CompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(resp.candidates().is_empty());
    }

    #[tokio::test]
    async fn test_completion_basic() {
        let mut server = mockito::Server::new_async().await;

        let response_body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }]
        }"#;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::Json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "Hi"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .create_async()
            .await;

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &reqwest::Client::new(),
            &messages,
            server.url().as_str(),
            "test-key",
            "gpt-3.5-turbo",
        )
        .await;

        mock.assert_async().await;
        let candidates = result.unwrap().candidates();
        assert_eq!(candidates, vec![Message::new(Role::Assistant, "Hello!")]);
    }

    #[tokio::test]
    async fn test_completion_trailing_slash_hostname() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let host = format!("{}/", server.url());
        let result = completion(&reqwest::Client::new(), &[], &host, "k", "m").await;

        mock.assert_async().await;
        assert!(result.unwrap().candidates().is_empty());
    }

    #[tokio::test]
    async fn test_completion_error_status_uses_service_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"rate limited","type":"requests"}}"#)
            .create_async()
            .await;

        let messages = vec![Message::new(Role::User, "Hi")];
        let err = completion(&reqwest::Client::new(), &messages, &server.url(), "k", "m")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.to_string(), "rate limited");
    }

    #[tokio::test]
    async fn test_completion_error_status_without_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = completion(&reqwest::Client::new(), &[], &server.url(), "k", "m")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_completion_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = completion(&reqwest::Client::new(), &[], &server.url(), "k", "m").await;
        assert!(result.is_err());
    }
}
