//! 配置模块
//!
//! 负责在进程启动时一次性读取 Gemini API 密钥及可选设置。
use crate::error::{ChatError, Result};
use std::env;
use std::fmt;
use std::time::Duration;

// ===============================================================================================
// 常量
// ===============================================================================================

/// 保存 API 密钥的环境变量名
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// 覆盖模型名称的环境变量名
pub const MODEL_VAR: &str = "GEMINI_MODEL";
/// 覆盖 API 基础 URL 的环境变量名
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
/// 覆盖请求超时（秒）的环境变量名
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";

/// 默认模型
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
/// 默认 API 基础 URL
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ===============================================================================================
// API 密钥
// ===============================================================================================

/// 非空的 API 密钥
///
/// 只能通过 [`ApiKey::new`] 构造，`Debug` 输出不会泄露密钥内容。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// 校验并包装密钥，空串或纯空白返回 `AbsentCredential`
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ChatError::AbsentCredential(API_KEY_VAR));
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// 从 `.env` 文件和环境变量加载 API 密钥
///
/// 进程启动时调用一次，失败即为致命错误。
pub fn load_api_key() -> Result<ApiKey> {
    dotenvy::dotenv().ok();
    api_key_from(|name| env::var(name).ok())
}

fn api_key_from<F>(lookup: F) -> Result<ApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    ApiKey::new(lookup(API_KEY_VAR).unwrap_or_default())
}

// ===============================================================================================
// 客户端配置
// ===============================================================================================

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 模型名称
    pub(crate) model: String,
    /// API 基础 URL
    pub(crate) api_base: String,
    /// API 密钥
    pub(crate) api_key: ApiKey,
    /// 请求超时时间，`None` 表示沿用传输层默认行为
    pub(crate) timeout: Option<Duration>,
}

/// 生成 Config Builder 方法的宏
///
/// 自动生成 `with_field_name` 形式的 builder 方法
macro_rules! config_builder {
    ($field:ident, $type:ty) => {
        paste::paste! {
            #[doc = "设置 `"]
            #[doc = stringify!($field)]
            #[doc = "`"]
            pub fn [<with_ $field>](mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        }
    };
    ($field:ident, $type:ty, option) => {
        paste::paste! {
            #[doc = "设置 `"]
            #[doc = stringify!($field)]
            #[doc = "`"]
            pub fn [<with_ $field>](mut self, $field: $type) -> Self {
                self.$field = Some($field);
                self
            }
        }
    };
}

impl Config {
    /// 使用给定密钥和默认设置创建配置
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
            api_key,
            timeout: None,
        }
    }

    pub fn model(&self) -> &str { &self.model }
    pub fn api_base(&self) -> &str { &self.api_base }
    pub fn api_key(&self) -> &ApiKey { &self.api_key }
    pub fn timeout(&self) -> Option<Duration> { self.timeout }

    /// 从环境变量和 `.env` 文件加载配置
    ///
    /// 环境变量会覆盖 `.env` 文件中的设置
    pub fn from_env() -> Result<Self> {
        let api_key = load_api_key()?;
        Config::new(api_key).with_overrides(|name| env::var(name).ok())
    }

    /// 通过查找函数构建配置，`from_env` 的纯逻辑部分
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = api_key_from(&lookup)?;
        Config::new(api_key).with_overrides(lookup)
    }

    /// 应用可选的模型、基础 URL 与超时设置
    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
        if let Some(base) = lookup(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            self.timeout = Some(parse_timeout(&raw)?);
        }

        Ok(self)
    }

    // 使用宏生成 builder 方法
    config_builder!(api_base, String);
    config_builder!(model, String);
    config_builder!(api_key, ApiKey);
    config_builder!(timeout, Duration, option);
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ChatError::Config(format!(
            "{} must be a positive number of seconds, got '{}'",
            TIMEOUT_VAR, raw
        ))),
    }
}
