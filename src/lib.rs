//! # chatbox - 单轮 Gemini 对话框
//!
//! 读取一行输入，原样作为提示发送给 Gemini 文本生成模型，并把返回的文本展示出来。
//! 没有对话历史、没有重试、没有缓存。
//!
//! ## 组成
//!
//! - [`config`]：启动时一次性读取 `GEMINI_API_KEY`，缺失即终止。
//! - [`client`]：唯一的已认证 HTTP 客户端，实现 [`TextGenerator`]。
//! - [`gateway`]：把一次调用的任何结果规整为 [`DisplayText`]，从不向上抛错。
//! - [`surface`]：终端交互循环。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use chatbox::{ChatGateway, Config, GeminiClient, Prompt};
//! use chatbox::error::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // 需要设置 GEMINI_API_KEY
//!     let config = Config::from_env()?;
//!     let gateway = ChatGateway::new(GeminiClient::new(config)?);
//!
//!     let reply = gateway.get_response(&Prompt::parse("你好，世界！")?).await;
//!     println!("{}", reply);
//!
//!     Ok(())
//! }
//! ```

// 模块定义
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod surface;
pub mod types;

pub use client::{GeminiClient, TextGenerator};
pub use config::{ApiKey, Config, load_api_key};
pub use error::{ChatError, Result};
pub use gateway::{ChatExchange, ChatGateway, DisplayText, Prompt};
