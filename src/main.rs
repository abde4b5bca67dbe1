use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use img2prompt::banner::{config_status, coze_summary, print_banner};
use img2prompt::config::{CozeConfig, PRODUCTION, PollConfig, ServerConfig};
use img2prompt::consts::{
    DEFAULT_BASE_URL, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_POLL_INTERVAL,
    DEFAULT_PROMPT_TYPE, format_number,
};
use img2prompt::coze::{CozeClient, PromptOptions};
use img2prompt::server::{self, AppState};
use img2prompt::spinner::Spinner;
use img2prompt::upload::ImageUpload;

#[derive(Parser)]
#[command(name = "img2prompt", version, about = "Pictures in, prompts out.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Coze personal access token
    #[arg(long, env = "COZE_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Coze workflow id
    #[arg(long, env = "COZE_WORKFLOW_ID", default_value = "")]
    workflow_id: String,

    /// Coze API base URL
    #[arg(long, env = "COZE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Delay before each poll of an asynchronous run, in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_interval_ms: u64,

    /// Poll attempts before giving up on an asynchronous run
    #[arg(long, default_value_t = DEFAULT_MAX_POLL_ATTEMPTS)]
    max_poll_attempts: u32,

    /// Deployment environment; anything but "production" exposes error details
    #[arg(long, env = "NODE_ENV", default_value = PRODUCTION)]
    environment: String,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the image-to-prompt HTTP API (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind
        #[arg(short, long, default_value_t = 3000)]
        port: u16,

        /// Largest accepted request body, in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,
    },
    /// Generate a prompt for a single image and print it
    Prompt {
        /// Image file to describe
        image: PathBuf,

        /// Prompt style: normal, flux, midjouney or stableDiffusion
        #[arg(short = 't', long, default_value = DEFAULT_PROMPT_TYPE)]
        prompt_type: String,

        /// Instruction sent along with the image
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show whether the Coze credentials are configured
    Status,
}

impl Cli {
    fn coze_config(&self) -> CozeConfig {
        CozeConfig {
            api_key: self.api_key.clone(),
            workflow_id: self.workflow_id.clone(),
            base_url: self.base_url.clone(),
            poll: PollConfig {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_attempts: self.max_poll_attempts,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let coze = cli.coze_config();

    match cli.command {
        None => {
            serve(coze, ServerConfig {
                environment: cli.environment,
                ..ServerConfig::default()
            })
            .await
        }
        Some(Command::Serve {
            host,
            port,
            max_upload_bytes,
        }) => {
            serve(coze, ServerConfig {
                host,
                port,
                environment: cli.environment,
                max_upload_bytes,
            })
            .await
        }
        Some(Command::Prompt {
            image,
            prompt_type,
            query,
        }) => prompt(coze, &image, prompt_type, query).await,
        Some(Command::Status) => {
            print!("{}", coze_summary(&coze));
            if !coze.is_configured() {
                println!("\nset COZE_API_KEY and COZE_WORKFLOW_ID to enable prompt generation");
            }
            Ok(())
        }
    }
}

async fn serve(coze: CozeConfig, server: ServerConfig) -> anyhow::Result<()> {
    let state = AppState {
        client: CozeClient::http(coze),
        server,
    };
    let coze = state.client.config();
    print_banner(coze, &state.server);
    if !coze.is_configured() {
        log::warn!("Coze API is {}; prompt requests will fail", config_status(coze));
    }
    server::serve(state).await
}

async fn prompt(
    coze: CozeConfig,
    image: &std::path::Path,
    prompt_type: String,
    query: Option<String>,
) -> anyhow::Result<()> {
    let client = CozeClient::http(coze);
    if !client.is_configured() {
        anyhow::bail!("Coze API is not configured. Set COZE_API_KEY and COZE_WORKFLOW_ID.");
    }

    let upload = ImageUpload::from_path(image).await?;
    eprintln!(
        "{} ({} bytes, {})",
        upload.file_name,
        format_number(upload.len() as u64),
        upload.mime()
    );

    let options = PromptOptions {
        model: Some(prompt_type),
        user_query: query,
    };

    let spinner = Spinner::start("generating prompt");
    let result = client.generate_prompt_from_image(upload, &options).await;
    let elapsed = spinner.stop().await;

    let prompt = result.context("prompt generation failed")?;
    eprintln!("done in {:.1}s\n", elapsed.as_secs_f64());
    println!("{prompt}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_coze_config() {
        let cli = Cli::try_parse_from([
            "img2prompt",
            "--api-key",
            "pat_x",
            "--workflow-id",
            "wf_1",
            "--base-url",
            "http://127.0.0.1:9000",
            "--poll-interval-ms",
            "250",
            "--max-poll-attempts",
            "5",
            "status",
        ])
        .unwrap();

        let config = cli.coze_config();
        assert!(config.is_configured());
        assert_eq!(config.api_key, "pat_x");
        assert_eq!(config.workflow_id, "wf_1");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, 5);
        assert!(matches!(cli.command, Some(Command::Status)));
    }

    #[test]
    fn prompt_subcommand_defaults_to_normal() {
        let cli = Cli::try_parse_from(["img2prompt", "prompt", "cat.jpg"]).unwrap();
        match cli.command {
            Some(Command::Prompt {
                image,
                prompt_type,
                query,
            }) => {
                assert_eq!(image, PathBuf::from("cat.jpg"));
                assert_eq!(prompt_type, "normal");
                assert!(query.is_none());
            }
            _ => panic!("expected Prompt"),
        }
    }

    #[test]
    fn serve_subcommand_flags() {
        let cli = Cli::try_parse_from(["img2prompt", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Some(Command::Serve {
                host,
                port,
                max_upload_bytes,
            }) => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 8080);
                assert_eq!(max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
            }
            _ => panic!("expected Serve"),
        }
    }

    #[test]
    fn poll_flags_default_to_one_second_thirty_attempts() {
        let cli = Cli::try_parse_from(["img2prompt"]).unwrap();
        let poll = cli.coze_config().poll;
        assert_eq!(poll, PollConfig::default());
        assert_eq!(cli.poll_interval_ms, 1000);
        assert!(cli.command.is_none());
    }
}
