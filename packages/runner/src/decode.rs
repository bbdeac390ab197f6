//! Display-safe decoding of raw child output.
//!
//! Submitted scripts run under mixed locale settings, so captured bytes may
//! arrive in any of several encodings. Decoding tries a fixed candidate
//! list strictly and falls back to lossy UTF-8, so it can never fail;
//! terminal escape sequences are stripped afterwards.

use encoding_rs::{Encoding, BIG5, GB18030, GBK, WINDOWS_1252};
use once_cell::sync::Lazy;
use regex::Regex;

/// CSI and single-character ANSI escape sequences (cursor movement, colors)
static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("valid ansi pattern"));

/// Decode captured bytes into trimmed, escape-free text.
///
/// The first encoding that decodes without substitution wins; if every
/// strict attempt fails the bytes are decoded as UTF-8 with replacement
/// characters. The result is always a valid string.
pub fn decode_output(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => decode_legacy(bytes),
    };
    ANSI_ESCAPE.replace_all(&text, "").trim().to_string()
}

fn decode_legacy(bytes: &[u8]) -> String {
    // Strict candidates after UTF-8, in priority order
    let candidates: [&Encoding; 4] = [GBK, GB18030, BIG5, WINDOWS_1252];
    for encoding in candidates {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}
