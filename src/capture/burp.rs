//! Burp Suite XML export reader
//!
//! Reads the file written by Burp's "Save items" action:
//!
//! ```xml
//! <items burpVersion="...">
//!   <item>
//!     <url><![CDATA[https://example.com/a?b=c]]></url>
//!     <host ip="93.184.216.34">example.com</host>
//!     <method><![CDATA[GET]]></method>
//!     <mimetype>JSON</mimetype>
//!     <request base64="true"><![CDATA[R0VUIC9h...]]></request>
//!     <response base64="true"><![CDATA[SFRUUC8x...]]></response>
//!   </item>
//! </items>
//! ```
//!
//! Only the elements the profile builder needs are read; everything else in an
//! item is skipped.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use super::transaction::TransactionRecord;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read capture file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed Burp XML: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("No items found in capture file")]
    Empty,
}

#[derive(Debug, Default, Deserialize)]
struct BurpItems {
    #[serde(rename = "item", default)]
    items: Vec<BurpItem>,
}

#[derive(Debug, Deserialize)]
struct BurpItem {
    #[serde(default)]
    url: TextNode,
    #[serde(default)]
    host: TextNode,
    #[serde(default)]
    method: TextNode,
    #[serde(rename = "mimetype", default)]
    mime: TextNode,
    #[serde(default)]
    request: EncodedNode,
    #[serde(default)]
    response: EncodedNode,
}

#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct EncodedNode {
    #[serde(rename = "@base64", default)]
    base64: Option<String>,
    #[serde(rename = "$text", default)]
    value: String,
}

impl EncodedNode {
    /// Transcript in base64 form, encoding it here when Burp stored it raw.
    fn into_encoded(self) -> String {
        match self.base64.as_deref() {
            Some("false") => base64::engine::general_purpose::STANDARD.encode(self.value),
            _ => self.value,
        }
    }
}

impl From<BurpItem> for TransactionRecord {
    fn from(item: BurpItem) -> Self {
        Self {
            url: item.url.value,
            host: item.host.value,
            method: item.method.value,
            mime: item.mime.value,
            request: item.request.into_encoded(),
            response: item.response.into_encoded(),
        }
    }
}

/// Parse Burp XML text into records, in document order.
pub fn parse_burp_xml(xml: &str) -> Result<Vec<TransactionRecord>, IngestError> {
    let parsed: BurpItems = quick_xml::de::from_str(xml)?;
    if parsed.items.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(parsed.items.into_iter().map(TransactionRecord::from).collect())
}

/// Load a Burp XML export from disk.
pub fn load_burp_xml(path: &Path) -> Result<Vec<TransactionRecord>, IngestError> {
    let xml = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_burp_xml(&xml)?;
    tracing::info!(
        path = %path.display(),
        count = records.len(),
        "Loaded Burp capture"
    );
    Ok(records)
}
