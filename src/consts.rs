//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Research service endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://builder.impromptu-labs.com";

pub const SUBMIT_PATH: &str = "/api_tools/rapid_research";
pub const FETCH_PATH: &str = "/api_tools/return_data";
pub const DELETE_PATH: &str = "/api_tools/objects";

pub const APP_ID_HEADER: &str = "X-Generated-App-ID";

/// Prefix of every generated object name (`research_<millis>`).
pub const OBJECT_PREFIX: &str = "research";

/// Instruction template; the user's question is appended verbatim.
pub const GOAL_PREFIX: &str =
    "Research and provide a concise, authoritative paragraph summary answering this question: ";

/// Answer text when a fetched object carries no `text_value`.
pub const NO_RESULTS: &str = "No results found";

/// Rejection message when the service omits `message`.
pub const GENERIC_REJECTION: &str = "Unknown error";

/// How long to wait between submit and fetch.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(3000);

/// Per-request HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

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
