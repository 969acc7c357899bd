//! Helpers shared by the service modules.

/// Longest response excerpt written to logs or carried in errors, in bytes.
const LOG_EXCERPT_LIMIT: usize = 256;

/// Shorten a response body for logging without splitting a UTF-8 character.
pub(crate) fn truncate_for_log(body: &str) -> String {
    if body.len() <= LOG_EXCERPT_LIMIT {
        return body.to_string();
    }
    let cut = body
        .char_indices()
        .map(|(idx, _)| idx)
        .take_while(|idx| *idx <= LOG_EXCERPT_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}… ({} bytes)", &body[..cut], body.len())
}
