//! 对话网关模块
//!
//! 把一次用户提交转换成一次服务端调用，并把所有结果规整为可展示的文本。
use crate::{
    client::TextGenerator,
    error::{ChatError, Result},
};
use log::{debug, warn};
use std::fmt;

/// 错误展示文本前缀
pub const ERROR_PREFIX: &str = "⚠️ Error: ";

// ================================================================================================
// 提示与展示文本
// ================================================================================================

/// 用户提交的原始提示
///
/// 至少包含一个非空白字符，内容原样转发，不做裁剪。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// 空串或纯空白返回 `EmptyPrompt`
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 最终展示给用户的文本：生成结果或单行错误信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    text: String,
    is_error: bool,
}

impl DisplayText {
    pub fn from_error(err: &ChatError) -> Self {
        let description = err
            .to_string()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text: format!("{}{}", ERROR_PREFIX, description),
            is_error: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

impl From<Result<String>> for DisplayText {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self {
                text,
                is_error: false,
            },
            Err(e) => Self::from_error(&e),
        }
    }
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 一次提交的提示与展示结果，渲染后即丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub prompt: Prompt,
    pub reply: DisplayText,
}

// ================================================================================================
// 网关
// ================================================================================================

/// 对话网关
///
/// 不保存任何跨调用状态：没有历史、没有缓存、没有重试。
#[derive(Debug, Clone)]
pub struct ChatGateway<G> {
    generator: G,
}

impl<G: TextGenerator> ChatGateway<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// 发起一次调用，保留错误类型
    pub async fn try_response(&self, prompt: &Prompt) -> Result<String> {
        debug!("sending prompt ({} chars)", prompt.as_str().chars().count());
        self.generator.generate(prompt.as_str()).await
    }

    /// 发起一次调用，任何失败都转换为错误展示文本，不会向上传播
    pub async fn get_response(&self, prompt: &Prompt) -> DisplayText {
        let result = self.try_response(prompt).await;
        if let Err(e) = &result {
            warn!("provider call failed: {}", e);
        }
        DisplayText::from(result)
    }

    /// 处理一次原始输入
    ///
    /// 空输入直接返回 `EmptyPrompt`，不会调用服务端。
    pub async fn submit(&self, input: &str) -> Result<ChatExchange> {
        let prompt = Prompt::parse(input)?;
        let reply = self.get_response(&prompt).await;
        Ok(ChatExchange { prompt, reply })
    }
}
