//! Project-wide constants.

use std::time::Duration;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Coze API host used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.coze.cn";

/// Instruction sent as `userQuery` when the caller provides none.
pub const DEFAULT_USER_QUERY: &str = "Generate a detailed AI image prompt for this uploaded image";

/// Prompt style sent as `promptType` when the caller provides none.
pub const DEFAULT_PROMPT_TYPE: &str = "normal";

/// Prompt styles the remote workflow understands. `midjouney` is spelled the
/// way the workflow expects it.
pub const KNOWN_PROMPT_TYPES: &[&str] = &["normal", "flux", "midjouney", "stableDiffusion"];

/// Delay before each poll of an asynchronous workflow run.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll attempts before an asynchronous run is declared timed out.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

/// Largest accepted inbound upload (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!VERSION.is_empty());
        assert!(!DEFAULT_BASE_URL.is_empty());
        assert!(!DEFAULT_USER_QUERY.is_empty());
    }

    #[test]
    fn default_prompt_type_is_known() {
        assert!(KNOWN_PROMPT_TYPES.contains(&DEFAULT_PROMPT_TYPE));
    }

    #[test]
    fn default_poll_budget_is_thirty_seconds() {
        assert_eq!(
            DEFAULT_POLL_INTERVAL * DEFAULT_MAX_POLL_ATTEMPTS,
            Duration::from_secs(30)
        );
    }

    #[test]
    fn format_number_small() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(10_240), "10,240");
        assert_eq!(format_number(123_456), "123,456");
    }

    #[test]
    fn format_number_millions() {
        assert_eq!(format_number(10_485_760), "10,485,760");
    }
}
