//! 终端交互界面
//!
//! 一行输入即一次 "发送"：空行给出提示，其他内容交给网关并打印结果。
use crate::{
    client::TextGenerator,
    error::{ChatError, Result},
    gateway::ChatGateway,
};
use log::{info, warn};
use std::borrow::Cow;
use std::io::{BufRead, Write};

pub const TITLE: &str = "🤖 AI Chatbot";
pub const INPUT_LABEL: &str = "Chat with AI:";
pub const PLACEHOLDER: &str = "Hi! What's Up?";
pub const FOOTER: &str = "🔹 Prepared by Bilal Waseem";

/// 运行交互循环，直到输入结束
///
/// 每一行都会在读取下一行之前处理完毕，因此同一时间最多只有一个请求在进行。
/// 返回实际发起的服务端调用次数。
pub async fn run<G, R, W>(gateway: &ChatGateway<G>, mut input: R, mut output: W) -> Result<usize>
where
    G: TextGenerator,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", TITLE)?;
    writeln!(output, "{} ({})", INPUT_LABEL, PLACEHOLDER)?;

    let mut sent = 0;
    let mut buf = Vec::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            warn!("input line was not valid UTF-8, replaced invalid bytes");
        }
        let text = line.strip_suffix('\n').unwrap_or(&line);
        let text = text.strip_suffix('\r').unwrap_or(text);

        match gateway.submit(text).await {
            Ok(exchange) => {
                sent += 1;
                writeln!(output, "{}", exchange.reply)?;
            }
            Err(ChatError::EmptyPrompt) => {
                warn!("empty prompt submitted");
                writeln!(output, "{}", ChatError::EmptyPrompt)?;
            }
            Err(e) => return Err(e),
        }
    }

    writeln!(output)?;
    writeln!(output, "{}", FOOTER)?;
    info!("session ended after {} request(s)", sent);
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test_support::{FakeGenerator, Outcome};
    use std::io::Cursor;

    async fn session(
        script: Vec<Outcome>,
        input: &[u8],
    ) -> (String, usize, ChatGateway<FakeGenerator>) {
        let gateway = ChatGateway::new(FakeGenerator::new(script));
        let mut out = Vec::new();
        let sent = run(&gateway, Cursor::new(input), &mut out)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), sent, gateway)
    }

    #[tokio::test]
    async fn test_renders_header_reply_and_footer() {
        let (out, sent, _) = session(vec![Outcome::Text("Hello there!")], b"Hi\n").await;
        assert_eq!(sent, 1);
        assert!(out.starts_with(TITLE));
        assert!(out.contains(INPUT_LABEL));
        assert!(out.contains("Hello there!\n"));
        assert!(out.trim_end().ends_with(FOOTER));
    }

    #[tokio::test]
    async fn test_blank_lines_warn_without_calling() {
        let (out, sent, gateway) = session(vec![], b"\n   \n\r\n").await;
        assert_eq!(sent, 0);
        assert_eq!(gateway.generator().calls(), 0);
        assert_eq!(out.matches("Please enter a message!").count(), 3);
    }

    #[tokio::test]
    async fn test_error_reply_does_not_end_session() {
        let (out, sent, gateway) = session(
            vec![Outcome::Fail("quota exceeded"), Outcome::Text("ok now")],
            b"Hi\nHi again\n",
        )
        .await;
        assert_eq!(sent, 2);
        assert!(out.contains("⚠️ Error: API error (429): quota exceeded"));
        assert!(out.contains("ok now"));
        assert_eq!(gateway.generator().prompts(), vec!["Hi", "Hi again"]);
    }

    #[tokio::test]
    async fn test_line_terminator_is_stripped_but_spacing_kept() {
        let (_, _, gateway) = session(vec![Outcome::Text("x")], b"  spaced  \r\n").await;
        assert_eq!(gateway.generator().prompts(), vec!["  spaced  "]);
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_sent() {
        let (_, sent, _) = session(vec![Outcome::Text("x")], b"no newline").await;
        assert_eq!(sent, 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_session() {
        let (out, sent, gateway) = session(
            vec![Outcome::Text("first"), Outcome::Text("Hello there!")],
            b"\xff\xfe\nHi\n",
        )
        .await;
        assert_eq!(sent, 2);
        assert_eq!(gateway.generator().prompts().last().map(String::as_str), Some("Hi"));
        assert!(out.contains("Hello there!"));
        assert!(out.trim_end().ends_with(FOOTER));
    }
}
