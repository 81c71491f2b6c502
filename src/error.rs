//! 错误处理模块

use thiserror::Error;

/// chatbox 的统一错误类型
///
/// 分为三类：启动期致命的 `AbsentCredential`，由调用方就地恢复的 `EmptyPrompt`，
/// 以及其余所有在网关边界被转换成展示文本的服务端/网络失败。
#[derive(Debug, Error)]
pub enum ChatError {
    /// 缺少 API 密钥（致命）
    #[error("API key is missing: please set {0}")]
    AbsentCredential(&'static str),

    /// 用户提交了空输入
    #[error("Please enter a message!")]
    EmptyPrompt,

    /// HTTP 请求相关错误，展示时带上完整的底层原因链
    #[error("HTTP request failed: {}", error_chain(.0))]
    Http(reqwest::Error),

    /// 请求超时
    #[error("request timed out: {}", error_chain(.0))]
    Timeout(reqwest::Error),

    /// JSON 序列化/反序列化错误
    #[error("malformed response: {0}")]
    Json(String),

    /// API 服务端错误
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 响应中没有生成的文本
    #[error("response contained no text: {0}")]
    NoContent(String),

    /// 请求参数无效
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 配置相关错误
    #[error("configuration error: {0}")]
    Config(String),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// chatbox 的 Result 类型别名
pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    /// 是否属于可恢复的服务端/网络失败
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            ChatError::Http(_)
                | ChatError::Timeout(_)
                | ChatError::Json(_)
                | ChatError::Api { .. }
                | ChatError::NoContent(_)
                | ChatError::InvalidRequest(_)
        )
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChatError::Timeout(e)
        } else {
            ChatError::Http(e)
        }
    }
}

/// 把错误及其 `source()` 链拼接成一行
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Json(e.to_string())
    }
}
