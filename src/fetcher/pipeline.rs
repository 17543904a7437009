use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: &[u8],
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, body_bytes);
    let body_utf8 = decode_to_utf8(body_bytes, &charset)?;

    Ok(PageResponse {
        url_final,
        status,
        body_utf8,
        charset,
    })
}

fn charset_from(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = charset_from(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta charset> or http-equiv in the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from(&META_CHARSET_REGEX, &search_str)
        .or_else(|| charset_from(&META_HTTP_EQUIV_REGEX, &search_str))
    {
        return charset;
    }

    // 3. Heuristic detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    Charset::from_encoding(detector.guess(None, true))
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "Failed to decode content with encoding: {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}
