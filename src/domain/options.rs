//! Store operation options
//!
//! Options are passed through to the document store unmodified.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Write acknowledgement level (`w`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteAck {
    /// Acknowledgement from this many nodes
    Nodes(u32),
    /// A named level: `"majority"` or a custom tag set
    Named(String),
}

impl WriteAck {
    /// True for the `"majority"` level
    pub fn is_majority(&self) -> bool {
        matches!(self, WriteAck::Named(name) if name == "majority")
    }
}

/// Options accepted by write operations
///
/// Field names follow the store's own option names, so a JSON object such as
/// `{"w": 1, "wtimeout": 5000, "upsert": true}` deserializes directly.
///
/// # Examples
///
/// ```
/// use docmodel::domain::WriteOptions;
///
/// let opts = WriteOptions::new().with_upsert(true).with_wtimeout_ms(5000);
/// assert_eq!(opts.upsert, Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOptions {
    /// Write acknowledgement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<WriteAck>,

    /// Write concern timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wtimeout: Option<u64>,

    /// Insert when no document matches (update/replace only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,

    /// Skip server-side collection validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_document_validation: Option<bool>,
}

impl WriteOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `w` to a node count
    pub fn with_w(mut self, nodes: u32) -> Self {
        self.w = Some(WriteAck::Nodes(nodes));
        self
    }

    /// Sets `wtimeout`
    pub fn with_wtimeout_ms(mut self, ms: u64) -> Self {
        self.wtimeout = Some(ms);
        self
    }

    /// Sets `upsert`
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    /// Sets `bypassDocumentValidation`
    pub fn with_bypass_document_validation(mut self, bypass: bool) -> Self {
        self.bypass_document_validation = Some(bypass);
        self
    }

    /// `wtimeout` as a duration
    pub fn wtimeout_duration(&self) -> Option<Duration> {
        self.wtimeout.map(Duration::from_millis)
    }

    /// True when `w` or `wtimeout` is set
    pub fn has_write_concern(&self) -> bool {
        self.w.is_some() || self.wtimeout.is_some()
    }

    /// Fill unset write concern fields from defaults
    pub fn or_defaults(mut self, defaults: &WriteOptions) -> Self {
        if self.w.is_none() {
            self.w = defaults.w.clone();
        }
        if self.wtimeout.is_none() {
            self.wtimeout = defaults.wtimeout;
        }
        self
    }
}
