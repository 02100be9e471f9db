//! Ollama client: chat completions for tagging, embeddings for upload

use anyhow::{Context, Result, bail};
use expenses_sync::Embedder;
use expenses_tagger::ChatModel;
use serde::{Deserialize, Serialize};

use crate::config::OllamaSection;
use crate::runtime::block_on;

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    chat_model: String,
    embed_model: String,
    embed_dims: usize,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatReq<'a> {
    model: &'a str,
    stream: bool,
    think: bool,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct ChatResp {
    message: Option<MsgOut>,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbedReq<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResp {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl OllamaClient {
    pub fn new(cfg: &OllamaSection) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            chat_model: cfg.chat_model.clone(),
            embed_model: cfg.embed_model.clone(),
            embed_dims: cfg.embed_dims,
            http: reqwest::Client::new(),
        }
    }

    pub async fn chat_async(&self, prompt: &str) -> Result<Option<String>> {
        let body = ChatReq {
            model: &self.chat_model,
            stream: false,
            think: false,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .context("ollama chat request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("ollama chat error: {status} {txt}");
        }

        let out: ChatResp = resp.json().await.context("parse ollama chat response")?;
        Ok(out
            .message
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()))
    }

    pub async fn embed_async(&self, text: &str) -> Result<Vec<f32>> {
        let body = EmbedReq {
            model: &self.embed_model,
            input: text,
        };

        let resp = self
            .http
            .post(format!("{}/api/embed", self.base_url))
            .json(&body)
            .send()
            .await
            .context("ollama embed request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("ollama embed error: {status} {txt}");
        }

        let out: EmbedResp = resp.json().await.context("parse ollama embed response")?;
        let Some(vector) = out.embeddings.into_iter().next() else {
            bail!("ollama returned no embedding for {text:?}");
        };
        if vector.len() != self.embed_dims {
            bail!(
                "embedding for {text:?} has length {}, want {}",
                vector.len(),
                self.embed_dims
            );
        }
        Ok(vector)
    }
}

impl ChatModel for OllamaClient {
    fn chat(&self, prompt: &str) -> Result<Option<String>> {
        block_on(self.chat_async(prompt))?
    }
}

impl Embedder for OllamaClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        block_on(self.embed_async(text))?
    }
}
