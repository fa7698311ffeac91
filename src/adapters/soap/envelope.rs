//! SOAP 1.1 rpc-style framing: request envelopes out, the `return` payload back.

use crate::utils::error::{LookupError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub fn request(namespace: &str, method: &str, params: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in params {
        body.push_str(&format!("<{0}>{1}</{0}>", name, escape(value)));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="{ns}">"#,
            "<SOAP-ENV:Body><ns1:{method}>{body}</ns1:{method}></SOAP-ENV:Body>",
            "</SOAP-ENV:Envelope>"
        ),
        ns = escape(namespace),
        method = method,
        body = body
    )
}

/// Extracts the text of the `return` element, or the fault message as an error.
pub fn payload(response: &str) -> Result<String> {
    if let Some(fault) = fault_string(response) {
        return Err(LookupError::remote(format!("SOAP fault: {}", fault)));
    }

    let caps = return_re()
        .captures(response)
        .ok_or_else(|| LookupError::remote("response envelope has no return element"))?;

    let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let raw = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .map(str::to_string)
        .unwrap_or_else(|| unescape(raw));

    Ok(raw)
}

pub fn fault_string(response: &str) -> Option<String> {
    fault_re()
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape(m.as_str().trim()))
}

fn return_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<(?:[\w-]+:)?return(?:\s[^>]*)?(?:/>|>(.*?)</(?:[\w-]+:)?return>)")
            .expect("static regex")
    })
}

fn fault_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<(?:[\w-]+:)?faultstring(?:\s[^>]*)?>(.*?)</(?:[\w-]+:)?faultstring>")
            .expect("static regex")
    })
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#x[0-9A-Fa-f]+|#[0-9]+|[a-z]+);").expect("static regex"))
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn unescape(value: &str) -> String {
    entity_re()
        .replace_all(value, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16).ok())
                    .unwrap_or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
