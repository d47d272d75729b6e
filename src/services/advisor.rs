// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generative-text advisor for post-save health tips.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ActivityKind, User};

/// Produces a short advisory message for a prompt.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, prompt: &str, topic: ActivityKind) -> Result<String, AppError>;
}

/// System message per topic.
fn system_message(topic: ActivityKind) -> &'static str {
    match topic {
        ActivityKind::Steps => {
            "Kamu adalah pelatih kebugaran. Analisis jumlah langkah harian pengguna dan beri saran singkat."
        }
        ActivityKind::Running => {
            "Kamu adalah pelatih lari. Analisis jarak lari harian pengguna dan beri saran singkat."
        }
        ActivityKind::Water => {
            "Kamu adalah ahli gizi. Nilai asupan air harian pengguna dan beri rekomendasi singkat."
        }
        _ => "Kamu adalah asisten kesehatan. Beri saran singkat dan ramah.",
    }
}

fn body_stats(user: &User) -> String {
    let weight = user
        .weight_kg
        .map(|w| w.to_string())
        .unwrap_or_else(|| "-".to_string());
    let height = user
        .height_cm
        .map(|h| h.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("Berat {}kg, Tinggi {}cm", weight, height)
}

pub fn steps_prompt(total_steps: i64, user: &User) -> String {
    format!(
        "Saya telah berjalan {} langkah hari ini. Data saya: {}. Berikan analisis!",
        total_steps,
        body_stats(user)
    )
}

pub fn running_prompt(total_km: f64, user: &User) -> String {
    format!(
        "Saya telah berlari {}km hari ini. Data saya: {}. Berikan analisis!",
        total_km,
        body_stats(user)
    )
}

pub fn water_prompt(total_liters: f64) -> String {
    format!(
        "Saya telah minum {:.1}L air hari ini. Berikan rekomendasi!",
        total_liters
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct OpenAiAdvisor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdvisor {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    /// Advisor from config; `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.advisor_api_key.as_ref().map(|key| {
            Self::new(
                config.advisor_api_url.clone(),
                key.clone(),
                config.advisor_model.clone(),
            )
        })
    }
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    async fn advise(&self, prompt: &str, topic: ActivityKind) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_message(topic),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Advisor(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!("Advisor rate limit hit (429)");
            }
            return Err(AppError::Advisor(format!("HTTP {}: {}", status, text)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Advisor(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Advisor("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionUser;

    #[test]
    fn test_prompts_include_body_stats() {
        let mut user = SessionUser::new("u", "a@example.com").to_user();
        user.weight_kg = Some(70.5);
        user.height_cm = Some(175);

        let prompt = steps_prompt(8200, &user);
        assert!(prompt.contains("8200 langkah"));
        assert!(prompt.contains("Berat 70.5kg, Tinggi 175cm"));

        let prompt = running_prompt(5.2, &SessionUser::new("u", "a@example.com").to_user());
        assert!(prompt.contains("5.2km"));
        assert!(prompt.contains("Berat -kg"));
    }

    #[test]
    fn test_water_prompt_rounds_to_one_decimal() {
        assert!(water_prompt(1.75).contains("1.8L"));
        assert!(water_prompt(2.0).contains("2.0L"));
    }

    #[test]
    fn test_from_config_disabled_without_key() {
        let mut config = Config::test_default();
        assert!(OpenAiAdvisor::from_config(&config).is_none());

        config.advisor_api_key = Some("sk-test".to_string());
        let advisor = OpenAiAdvisor::from_config(&config).unwrap();
        assert_eq!(advisor.model, "test-model");
    }
}
