//! Startup banner and configuration summary.

use crate::config::{CozeConfig, ServerConfig};
use crate::consts::VERSION;

/// "configured" or "not configured", for humans.
pub fn config_status(config: &CozeConfig) -> &'static str {
    if config.is_configured() {
        "configured"
    } else {
        "not configured"
    }
}

/// Workflow id with everything but the last four characters hidden.
fn masked(id: &str) -> String {
    if id.is_empty() {
        return "(unset)".to_string();
    }
    let chars: Vec<char> = id.chars().collect();
    let keep = chars.len().min(4);
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("…{tail}")
}

/// Lines describing the Coze side of the configuration.
pub fn coze_summary(config: &CozeConfig) -> String {
    format!(
        "   coze      {} ({})\n   workflow  {}\n   polling   every {}ms, {} attempts\n",
        config.base_url(),
        config_status(config),
        masked(&config.workflow_id),
        config.poll.interval.as_millis(),
        config.poll.max_attempts,
    )
}

/// Print the banner shown when the HTTP server starts.
pub fn print_banner(coze: &CozeConfig, server: &ServerConfig) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║          I M G 2 P R O M P T          ║
   ║     pictures in, prompts out          ║
   ╚═══════════════════════════════════════╝

   version   {}
   listen    {}
   env       {}
{}"#,
        VERSION,
        server.addr(),
        server.environment,
        coze_summary(coze),
    );
}
