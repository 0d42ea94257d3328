//! HTTP Generation Client - 调用外部生成函数
//!
//! 实现 GenerationPort trait，通过函数调用接口同步调用生成服务
//!
//! 外部生成函数 API:
//! POST {base_url}/2015-03-31/functions/{function_name}/invocations
//! Request: {"user_id":1,"product_id":2,"execution_id":"...","prompt"|"input":"...","service":"...","size":"2x"}
//! Response: {"status_code":200,"body":{...}}
//!   - chat:           body.choices[0].message.content
//!   - text_to_speech: body.data[].url 或 body.file_name（二者互斥）

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{
    GenerationError, GenerationKind, GenerationPort, GenerationRequest, GenerationResult,
    SpeechArtifact,
};

/// 调用请求体 (JSON)
#[derive(Debug, Serialize)]
struct InvocationPayload<'a> {
    user_id: i64,
    product_id: i64,
    execution_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a str>,
    service: &'a str,
    size: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_id: Option<&'a str>,
}

impl<'a> From<&'a GenerationRequest> for InvocationPayload<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        let (prompt, input) = match &request.kind {
            GenerationKind::Text { prompt } => (Some(prompt.as_str()), None),
            GenerationKind::Speech { input_text } => (None, Some(input_text.as_str())),
        };
        Self {
            user_id: request.user_id,
            product_id: request.product_id,
            execution_id: &request.execution_id,
            prompt,
            input,
            service: &request.service,
            size: &request.size,
            vendor_id: request.vendor_id.as_deref(),
        }
    }
}

/// 响应信封
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    /// JSON 数字，可能带小数部分（如 `200.0`）
    status_code: Option<f64>,
    #[serde(default)]
    body: Value,
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct SpeechBody {
    data: Option<Vec<HostedAudio>>,
    file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostedAudio {
    url: String,
}

/// 截断过长的响应内容，避免日志与错误信息膨胀
fn preview(value: &impl std::fmt::Display) -> String {
    const MAX: usize = 512;
    let text = value.to_string();
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text,
    }
}

/// body 可能是对象，也可能是编码了对象的 JSON 字符串
fn normalize_body(body: Value) -> Result<Value, GenerationError> {
    let body = match body {
        Value::String(encoded) => serde_json::from_str(&encoded).map_err(|e| {
            GenerationError::MalformedResponse(format!("body is not valid JSON: {}", e))
        })?,
        other => other,
    };
    if !body.is_object() {
        return Err(GenerationError::MalformedResponse(format!(
            "invalid body format in response payload: {}",
            preview(&body)
        )));
    }
    Ok(body)
}

/// 解析调用响应
///
/// 先校验信封与状态码，再按请求变体将 body 收敛为封闭的结果类型
pub fn parse_invocation_response(
    kind: &GenerationKind,
    payload: &[u8],
) -> Result<GenerationResult, GenerationError> {
    let envelope: ResponseEnvelope = serde_json::from_slice(payload).map_err(|e| {
        GenerationError::MalformedResponse(format!("error unmarshalling response payload: {}", e))
    })?;

    // 取整后比较
    match envelope.status_code.map(|code| code.trunc() as i64) {
        Some(200) => {}
        Some(code) => {
            return Err(GenerationError::Backend(format!(
                "generation function returned status_code {}: {}",
                code,
                preview(&envelope.body)
            )))
        }
        None => {
            return Err(GenerationError::MalformedResponse(
                "missing status_code in response payload".to_string(),
            ))
        }
    }

    let body = normalize_body(envelope.body)?;

    match kind {
        GenerationKind::Text { .. } => {
            let chat: ChatBody = serde_json::from_value(body).map_err(|e| {
                GenerationError::MalformedResponse(format!("invalid chat body: {}", e))
            })?;
            let content = chat
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| {
                    GenerationError::MalformedResponse(
                        "no choices found in response payload".to_string(),
                    )
                })?;
            Ok(GenerationResult::Text(content))
        }
        GenerationKind::Speech { .. } => {
            let speech: SpeechBody = serde_json::from_value(body).map_err(|e| {
                GenerationError::MalformedResponse(format!("invalid speech body: {}", e))
            })?;
            match (speech.data, speech.file_name) {
                (Some(data), None) => Ok(GenerationResult::Speech(SpeechArtifact::Hosted {
                    urls: data.into_iter().map(|audio| audio.url).collect(),
                })),
                (None, Some(file_name)) if !file_name.is_empty() => {
                    Ok(GenerationResult::Speech(SpeechArtifact::Staged { file_name }))
                }
                (Some(_), Some(_)) => Err(GenerationError::MalformedResponse(
                    "speech body carries both data and file_name".to_string(),
                )),
                _ => Err(GenerationError::MalformedResponse(
                    "speech body carries neither data nor file_name".to_string(),
                )),
            }
        }
    }
}

/// HTTP 生成客户端配置
#[derive(Debug, Clone)]
pub struct HttpGenerationClientConfig {
    /// 函数调用服务基础 URL
    pub base_url: String,
    /// 生成函数名
    pub function_name: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpGenerationClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9001".to_string(),
            function_name: "openai-generation".to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpGenerationClientConfig {
    pub fn new(base_url: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            function_name: function_name.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 生成客户端
pub struct HttpGenerationClient {
    client: Client,
    config: HttpGenerationClientConfig,
}

impl HttpGenerationClient {
    /// 创建新的 HTTP 生成客户端
    pub fn new(config: HttpGenerationClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取调用 URL
    fn invoke_url(&self) -> String {
        format!(
            "{}/2015-03-31/functions/{}/invocations",
            self.config.base_url.trim_end_matches('/'),
            self.config.function_name
        )
    }
}

#[async_trait]
impl GenerationPort for HttpGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, GenerationError> {
        let payload = InvocationPayload::from(&request);

        tracing::debug!(
            url = %self.invoke_url(),
            execution_id = %request.execution_id,
            service = %request.service,
            "Invoking generation function"
        );

        let response = self
            .client
            .post(self.invoke_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Backend("generation function timed out".to_string())
                } else if e.is_connect() {
                    GenerationError::Backend(format!("Cannot connect to generation function: {}", e))
                } else {
                    GenerationError::Backend(format!("error invoking generation function: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Backend(format!(
                "HTTP {}: {}",
                status,
                preview(&error_text)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Backend(format!("Failed to read response: {}", e)))?;

        tracing::debug!(
            execution_id = %request.execution_id,
            payload = %preview(&String::from_utf8_lossy(&bytes)),
            "Generation function response payload"
        );

        parse_invocation_response(&request.kind, &bytes)
    }
}
