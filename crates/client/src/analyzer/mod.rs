//! AI insight extraction.
//!
//! Sends scraped page text to an OpenAI-compatible chat-completions endpoint
//! and returns the provider's raw JSON payload. Coercion into the strict
//! insights shape is the orchestrator's validate step, not this call.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};

use salescope_core::Error;

const SYSTEM_PROMPT: &str = "Você é um analista de inteligência de vendas. Sua tarefa é analisar o texto fornecido \
de um website e extrair informações críticas para a preparação de uma reunião de vendas. \
Você DEVE retornar a resposta EXCLUSIVAMENTE em formato JSON com os seguintes campos:\n\n\
- nome_empresa: Nome da empresa dona do site\n\
- principal_servico_produto: O principal serviço ou produto oferecido\n\
- publico_alvo: O público-alvo principal da empresa\n\
- proposta_de_valor: Um resumo conciso (máximo 2 frases) da proposta de valor\n\
- pontos_de_venda_usp: Array com 3 a 5 pontos de venda únicos (USPs) que o time de vendas pode usar\n\
- resumo_executivo: Um resumo executivo do conteúdo do site para a reunião\n\n\
Mantenha as respostas concisas e focadas em vendas.";

/// Extracts sales insights from page text via an AI provider.
#[async_trait]
pub trait InsightExtractor: Send + Sync {
    /// Analyze `text` and return the provider's JSON object.
    async fn analyze(&self, text: &str) -> Result<serde_json::Value, Error>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-compatible insight extractor.
///
/// The HTTP client is deliberately built without a timeout: the provider call
/// is unbounded in this design.
pub struct OpenAiAnalyzer {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiAnalyzer {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { http: Client::new(), api_key, base_url: base_url.into(), model: model.into() }
    }
}

#[async_trait]
impl InsightExtractor for OpenAiAnalyzer {
    async fn analyze(&self, text: &str) -> Result<serde_json::Value, Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Extraction("OPENAI_API_KEY not configured".to_string()))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage {
                    role: "user",
                    content: format!("Analise o seguinte texto e retorne um JSON:\n\n{text}"),
                },
            ],
            response_format: serde_json::json!({"type": "json_object"}),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("AI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Extraction(format!(
                "AI provider returned status {}: {body}",
                status.as_u16()
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("malformed AI response: {e}")))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| Error::Extraction("AI response contained no choices".to_string()))?;

        tracing::debug!("AI returned {} bytes of JSON", content.len());

        serde_json::from_str(content).map_err(|e| Error::Extraction(format!("AI did not return valid JSON: {e}")))
    }
}
