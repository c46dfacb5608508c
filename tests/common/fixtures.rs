//! Capture and template fixtures
//!
//! The sample capture has five transactions, exactly two of them POSTs:
//!
//! | id | method | url                                         | mime     |
//! |----|--------|---------------------------------------------|----------|
//! | 0  | GET    | https://cdn.example.com/jquery-3.3.1.min.js | script   |
//! | 1  | POST   | https://cdn.example.com/api/submit?id=7     | JSON     |
//! | 2  | GET    | https://www.example.org/                    | HTML     |
//! | 3  | POST   | https://www.example.org/collect             | text     |
//! | 4  | GET    | https://cdn.example.com/favicon.ico         | null     |

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use profile_maker::TransactionRecord;
use serde_json::{json, Value};

pub struct CaptureItem {
    pub method: &'static str,
    pub url: &'static str,
    pub host: &'static str,
    pub mime: &'static str,
    pub request: &'static str,
    pub response: &'static str,
}

pub const SAMPLE_ITEMS: [CaptureItem; 5] = [
    CaptureItem {
        method: "GET",
        url: "https://cdn.example.com/jquery-3.3.1.min.js",
        host: "cdn.example.com",
        mime: "script",
        request: "GET /jquery-3.3.1.min.js HTTP/1.1\r\nHost: cdn.example.com\r\nAccept: */*\r\n\r\n",
        response: "HTTP/1.1 200 OK\r\nContent-Type: application/javascript\r\nServer: cloudflare\r\n\r\n/*! jQuery */var a=1;",
    },
    CaptureItem {
        method: "POST",
        url: "https://cdn.example.com/api/submit?id=7",
        host: "cdn.example.com",
        mime: "JSON",
        request: "POST /api/submit?id=7 HTTP/1.1\r\nHost: cdn.example.com\r\nContent-Type: application/json\r\nCookie: session=abc\r\n\r\n{\"id\":7,\"data\":\"\"}",
        response: "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nServer: cloudflare\r\n\r\n{\"ok\":true}",
    },
    CaptureItem {
        method: "GET",
        url: "https://www.example.org/",
        host: "www.example.org",
        mime: "HTML",
        request: "GET / HTTP/1.1\r\nHost: www.example.org\r\n\r\n",
        response: "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body>hi</body></html>",
    },
    CaptureItem {
        method: "POST",
        url: "https://www.example.org/collect",
        host: "www.example.org",
        mime: "text",
        request: "POST /collect HTTP/1.1\r\nHost: www.example.org\r\n\r\na=1",
        response: "HTTP/1.1 200 OK\r\n\r\nthanks",
    },
    CaptureItem {
        method: "GET",
        url: "https://cdn.example.com/favicon.ico",
        host: "cdn.example.com",
        mime: "null",
        request: "GET /favicon.ico HTTP/1.1\r\nHost: cdn.example.com\r\n\r\n",
        response: "HTTP/1.1 204 No Content\r\nServer: cloudflare\r\n\r\n",
    },
];

fn encode(raw: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(raw.as_bytes())
}

/// The sample capture as ingestion records.
pub fn sample_records() -> Vec<TransactionRecord> {
    SAMPLE_ITEMS
        .iter()
        .map(|item| TransactionRecord {
            url: item.url.to_string(),
            host: item.host.to_string(),
            method: item.method.to_string(),
            mime: item.mime.to_string(),
            request: encode(item.request),
            response: encode(item.response),
        })
        .collect()
}

/// Render items as a Burp "Save items" export.
pub fn burp_xml(items: &[CaptureItem]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\"?>\n<items burpVersion=\"2023.10.3.4\" exportTime=\"Mon Jan 01 00:00:00 UTC 2024\">\n",
    );
    for item in items {
        xml.push_str(&format!(
            "  <item>\n    <time>Mon Jan 01 00:00:00 UTC 2024</time>\n    <url><![CDATA[{url}]]></url>\n    <host ip=\"192.0.2.10\">{host}</host>\n    <port>443</port>\n    <protocol>https</protocol>\n    <method><![CDATA[{method}]]></method>\n    <request base64=\"true\"><![CDATA[{request}]]></request>\n    <status>200</status>\n    <mimetype>{mime}</mimetype>\n    <response base64=\"true\"><![CDATA[{response}]]></response>\n    <comment></comment>\n  </item>\n",
            url = item.url,
            host = item.host,
            method = item.method,
            request = encode(item.request),
            mime = item.mime,
            response = encode(item.response),
        ));
    }
    xml.push_str("</items>\n");
    xml
}

/// Write the sample capture to `dir/capture.xml`.
pub fn write_capture(dir: &Path) -> PathBuf {
    let path = dir.join("capture.xml");
    fs::write(&path, burp_xml(&SAMPLE_ITEMS)).expect("Failed to write capture");
    path
}

/// A listener template with unrelated siblings at every level.
pub fn template_json() -> Value {
    json!({
        "admin_list": { "operator": "change-me" },
        "listeners": {
            "templateListener": {
                "append": "",
                "c2_uri": ["/"],
                "empty_response": "default-empty",
                "host": "0.0.0.0",
                "port": "443",
                "prepend": "",
                "request_headers": { "User-Agent": "template-agent" },
                "ssl": true
            },
            "backupListener": { "port": "8443" }
        },
        "payload_config": { "templateListener": { "sleep": 5, "jitter": 20 } }
    })
}

/// Write `value` pretty-printed to `dir/name`.
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(value).expect("Failed to serialize"))
        .expect("Failed to write JSON");
    path
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).expect("Failed to read JSON")).expect("Invalid JSON")
}
