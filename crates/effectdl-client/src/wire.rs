//! Wire types for the effect API.
//!
//! Field casing matches the server exactly: request bodies and response
//! envelopes are camelCase, but effect entries come back PascalCase
//! (`Id`, `Name`, `HashId`).

use effectdl_core::Effect;
use serde::{Deserialize, Serialize};

/// Body for `get-effect-list`. Credentials are sent only on the first
/// call; once a session exists the token resumes pagination server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
    pub page: u32,
}

impl<'a> ListRequest<'a> {
    pub fn login(mail_address: &'a str, password: &'a str, page: u32) -> Self {
        Self {
            mail_address: Some(mail_address),
            password: Some(password),
            session_id: None,
            page,
        }
    }

    pub fn next_page(session_id: &'a str, page: u32) -> Self {
        Self {
            mail_address: None,
            password: None,
            session_id: Some(session_id),
            page,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub dl_sec_key: String,
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
    #[serde(default)]
    pub is_next: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct EffectEntry {
    pub id: String,
    pub name: String,
    pub hash_id: String,
}

impl From<EffectEntry> for Effect {
    fn from(entry: EffectEntry) -> Self {
        Effect {
            id: entry.id,
            name: entry.name,
            hash_id: entry.hash_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageRequest<'a> {
    pub effect_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageResponse {
    pub succeed: bool,
    /// Base64-encoded JPEG, present on success.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeRequest<'a> {
    pub session_id: &'a str,
    pub hash_id: &'a str,
    pub dl_sec_key: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeResponse {
    pub succeed: bool,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub dl_sec_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_omits_session_id() {
        let body = serde_json::to_value(ListRequest::login("a@b.com", "pw", 1)).unwrap();
        assert_eq!(body["mailAddress"], "a@b.com");
        assert_eq!(body["page"], 1);
        assert!(body.get("sessionId").is_none());
    }

    #[test]
    fn test_next_page_request_omits_credentials() {
        let body = serde_json::to_value(ListRequest::next_page("jsession-1", 2)).unwrap();
        assert_eq!(body["sessionId"], "jsession-1");
        assert!(body.get("mailAddress").is_none());
        assert!(body.get("password").is_none());
    }

    #[test]
    fn test_list_response_effect_casing() {
        let response: ListResponse = serde_json::from_str(
            r#"{
                "sessionId": "jsession-1",
                "dlSecKey": "sec-1",
                "effects": [{"Id": "1", "Name": "Fire", "HashId": "h1"}],
                "isNext": true
            }"#,
        )
        .unwrap();

        assert!(response.is_next);
        let effect: Effect = response.effects.into_iter().next().unwrap().into();
        assert_eq!(effect, Effect {
            id: "1".to_string(),
            name: "Fire".to_string(),
            hash_id: "h1".to_string(),
        });
    }

    #[test]
    fn test_image_response_tolerates_missing_payload() {
        let response: ImageResponse = serde_json::from_str(r#"{"succeed": false}"#).unwrap();
        assert!(!response.succeed);
        assert!(response.image.is_none());
    }
}
