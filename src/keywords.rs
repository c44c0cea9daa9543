use once_cell::sync::Lazy;
use regex::Regex;

// Substring match on purpose: "fail" must also hit "failed"/"failure".
static RE_ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)error|exception|fail|crash").unwrap()
});

static RE_OP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(start|stop|create|delete|update|read|write)\b").unwrap()
});

// 3-digit tokens in the HTTP status range 1xx-5xx.
static RE_STATUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[1-5]\d{2}\b").unwrap()
});

/// Derives coarse categorical tokens from a free-text message: one
/// `keyword:error` for error markers, `op:<verb>` per operation verb,
/// `status:<code>` per HTTP-status-shaped number. Tokens are emitted in
/// match order, distinct within one message.
pub fn extract_keywords(message: &str) -> Vec<String> {
    let mut out = Vec::new();
    if RE_ERROR.is_match(message) {
        out.push("keyword:error".to_string());
    }
    for cap in RE_OP.captures_iter(message) {
        let token = format!("op:{}", cap[1].to_lowercase());
        if !out.contains(&token) {
            out.push(token);
        }
    }
    for m in RE_STATUS.find_iter(message) {
        let token = format!("status:{}", m.as_str());
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}
