use chatbox::{ChatError, ChatGateway, Config, GeminiClient, surface};
use log::{error, info};
use std::io;
use std::process::ExitCode;

/// 由加载结果构建网关，失败时返回展示给用户的提示
fn startup(config: chatbox::Result<Config>) -> Result<ChatGateway<GeminiClient>, String> {
    let config = config.map_err(|e| match e {
        ChatError::AbsentCredential(key) => {
            error!("missing credential {}", key);
            format!(
                "⚠️ API key is missing! Please set {} in your .env file.",
                key
            )
        }
        e => {
            error!("failed to load configuration: {}", e);
            format!("⚠️ {}", e)
        }
    })?;

    let client = GeminiClient::new(config).map_err(|e| {
        error!("failed to build HTTP client: {}", e);
        format!("⚠️ {}", e)
    })?;
    info!("using model {}", client.config().model());

    Ok(ChatGateway::new(client))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let gateway = match startup(Config::from_env()) {
        Ok(gateway) => gateway,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match surface::run(&gateway, io::stdin().lock(), io::stdout().lock()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("terminal session failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
