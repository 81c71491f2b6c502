//! Gemini 客户端核心模块
use crate::{
    config::Config,
    error::{ChatError, Result},
    types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    Client, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::sync::Arc;
use std::time::Instant;

const API_KEY_HEADER: &str = "x-goog-api-key";

// ================================================================================================
// 文本生成抽象
// ================================================================================================

/// 文本生成服务
///
/// 一次调用对应一次服务端请求：一段提示进，一段文本或一个错误出。
/// 网关只依赖这个 trait，测试中可替换为假实现。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

// ================================================================================================
// 核心客户端
// ================================================================================================

/// Gemini 客户端
///
/// 进程内唯一的已认证客户端句柄，构造一次后只读共享。
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Arc<Client>,
    config: Arc<Config>,
}

impl GeminiClient {
    /// 创建一个新的 `GeminiClient` 实例
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `generateContent` 接口地址
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    /// 构建 API 请求所需的 HTTP 标头
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut key = HeaderValue::from_str(self.config.api_key.expose())
            .map_err(|e| ChatError::InvalidRequest(format!("Invalid API key: {}", e)))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// 发送一次请求，不做重试
    async fn call_api(&self, body: &GenerateContentRequest) -> Result<Response> {
        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }
}

/// 将非 2xx 响应转换为 `ChatError::Api`
async fn api_error(response: Response) -> ChatError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    ChatError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self.call_api(&request).await.inspect_err(|e| {
            warn!("generateContent failed for model {}: {}", self.config.model, e);
        })?;
        let body = response.text().await?;
        let completion: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage_metadata {
            debug!(
                "model={} prompt_tokens={} completion_tokens={} total_tokens={} duration_ms={}",
                self.config.model,
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count,
                start_time.elapsed().as_millis()
            );
        }

        completion
            .text()
            .ok_or_else(|| ChatError::NoContent(completion.empty_reason()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    fn client() -> GeminiClient {
        let config = Config::new(ApiKey::new("test-key").unwrap())
            .with_api_base("http://localhost:9999/v1beta".to_string());
        GeminiClient::new(config).unwrap()
    }

    #[test]
    fn test_endpoint_uses_fixed_model() {
        assert_eq!(
            client().endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-pro-latest:generateContent"
        );
    }

    #[test]
    fn test_headers_carry_key() {
        let headers = client().build_headers().unwrap();
        assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
        assert!(headers.get("x-goog-api-key").unwrap().is_sensitive());
    }

    #[test]
    fn test_invalid_key_header_is_rejected() {
        let config = Config::new(ApiKey::new("bad\nkey").unwrap());
        let err = GeminiClient::new(config).unwrap().build_headers().unwrap_err();
        assert!(matches!(err, ChatError::InvalidRequest(_)));
    }
}
