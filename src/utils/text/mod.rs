use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const ADJECTIVES: &[&str] = &[
    "insensitive",
    "heartless",
    "inconsiderate",
    "thoughtless",
    "thick-skinned",
    "hard-hearted",
    "cold-bloded",
    "uncaring",
    "mean-spirited",
    "unconcerned",
    "unsympathetic",
    "unkind",
    "callous",
    "cruel",
    "merciless",
    "pitiless",
];

/// Pick one adjective for the bot's canned scolding replies.
pub fn flippin_adjective(rng: &mut fastrand::Rng) -> &'static str {
    ADJECTIVES[rng.usize(..ADJECTIVES.len())]
}

pub fn base64_encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

/// Decode standard base64 into UTF-8 text. On failure the returned text is
/// the error message, matching the other in-band chat replies.
pub fn base64_decode(encoded: &str) -> String {
    let bytes = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(e) => return format!("Could not decode! Error: {}", e),
    };
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => format!("Could not decode! Error: {}", e),
    }
}
