//! Log sanitization
//!
//! Response bodies can carry TXT payloads (DKIM keys, verification tokens) and
//! must not be logged whole. API tokens are never logged, only their tail.

/// Longest body excerpt written to the log, in bytes.
const BODY_LOG_LIMIT: usize = 256;

/// Visible trailing characters of a masked token.
const TOKEN_VISIBLE_TAIL: usize = 4;

/// Cut `body` down to [`BODY_LOG_LIMIT`] bytes on a char boundary.
pub fn truncate_for_log(body: &str) -> String {
    if body.len() <= BODY_LOG_LIMIT {
        return body.to_string();
    }

    let cut = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= BODY_LOG_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &body[..cut], body.len())
}

/// `****` followed by the last characters of `token`.
///
/// Short tokens are masked entirely.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= TOKEN_VISIBLE_TAIL * 2 {
        return "****".to_string();
    }
    let tail: String = token.chars().skip(count - TOKEN_VISIBLE_TAIL).collect();
    format!("****{tail}")
}
