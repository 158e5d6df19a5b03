//! Wire protocol: a single line-delimited JSON record shared by every role
//! (client, coordinator, data node).
//!
//! Every record is one JSON object per line. All fields are optional strings;
//! a missing field reads as empty and unknown fields are ignored, so the
//! same [`Record`] type serves requests, acks, data replies and heartbeats.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// The `req_type` discriminant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RecordType {
    Get,
    Put,
    Update,
    Delete,
    Ack,
    Data,
    Heartbeat,
    /// Anything else: the session handler replies `unknown_request`.
    Unknown,
}

impl RecordType {
    fn as_str(self) -> &'static str {
        match self {
            RecordType::Get => "get",
            RecordType::Put => "put",
            RecordType::Update => "update",
            RecordType::Delete => "delete",
            RecordType::Ack => "ack",
            RecordType::Data => "data",
            RecordType::Heartbeat => "heartbeat",
            RecordType::Unknown => "",
        }
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        match s {
            "get" => RecordType::Get,
            "put" => RecordType::Put,
            "update" => RecordType::Update,
            "delete" => RecordType::Delete,
            "ack" => RecordType::Ack,
            "data" => RecordType::Data,
            "heartbeat" => RecordType::Heartbeat,
            _ => RecordType::Unknown,
        }
    }
}

/// Table tag on a node request: primary (`own`) or replica (`prev`) storage.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TableTag {
    Own,
    Prev,
}

impl From<&str> for TableTag {
    /// Case-insensitive; anything other than `"own"` is treated as `"prev"`.
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("own") {
            TableTag::Own
        } else {
            TableTag::Prev
        }
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableTag::Own => "own",
            TableTag::Prev => "prev",
        })
    }
}

/// Acknowledgment message vocabulary (the `message` field of an `ack`
/// record). Kept as plain `&'static str` constants rather than an enum: the
/// wire carries these verbatim and new values never need to round-trip
/// through Rust code other than as a literal.
pub mod ack {
    pub const CONNECTED: &str = "connected";
    pub const READY_TO_SERVE: &str = "ready_to_serve";
    pub const REGISTRATION_SUCCESSFUL: &str = "registration_successful";
    pub const PUT_SUCCESS: &str = "put_success";
    pub const UPDATE_SUCCESS: &str = "update_success";
    pub const DELETE_SUCCESS: &str = "delete_success";
    pub const PUT_FAILED: &str = "put_failed";
    pub const UPDATE_FAILED: &str = "update_failed";
    pub const DELETE_FAILED: &str = "delete_failed";
    pub const KEY_ERROR: &str = "key_error";
    pub const NO_SERVERS_AVAILABLE: &str = "no_servers_available";
    pub const INSUFFICIENT_SERVERS: &str = "insufficient_servers";
    pub const UNKNOWN_REQUEST: &str = "unknown_request";
    pub const PARSE_ERROR: &str = "parse_error";
    pub const ERROR: &str = "error";
}

/// One line of the wire protocol.
///
/// All fields default to the empty string when absent, matching "missing
/// fields read as the empty string" in the protocol description.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub req_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub table: String,
}

impl Record {
    /// The parsed `req_type` discriminant.
    pub fn record_type(&self) -> RecordType {
        RecordType::from(self.req_type.as_str())
    }

    /// The parsed table tag, defaulting per [`TableTag::from`].
    pub fn table_tag(&self) -> TableTag {
        TableTag::from(self.table.as_str())
    }

    /// Builds a request record (`get`/`put`/`update`/`delete`).
    pub fn request(ty: RecordType, key: impl Into<String>, value: impl Into<String>, table: TableTag) -> Self {
        Self {
            req_type: ty.as_str().to_string(),
            key: key.into(),
            value: value.into(),
            table: table.to_string(),
            ..Default::default()
        }
    }

    /// Builds an `ack` record carrying `message`.
    pub fn ack(message: &str) -> Self {
        Self {
            req_type: RecordType::Ack.as_str().to_string(),
            message: message.to_string(),
            ..Default::default()
        }
    }

    /// Builds a `data` record carrying a value in `message`.
    pub fn data(value: impl Into<String>) -> Self {
        Self {
            req_type: RecordType::Data.as_str().to_string(),
            message: value.into(),
            ..Default::default()
        }
    }

    /// Builds a `heartbeat` record carrying the sender's identity.
    pub fn heartbeat(identity: impl Into<String>) -> Self {
        Self {
            req_type: RecordType::Heartbeat.as_str().to_string(),
            message: identity.into(),
            ..Default::default()
        }
    }

    /// Builds the `id == "client"` identification record.
    pub fn identify_client() -> Self {
        Self {
            id: "client".to_string(),
            ..Default::default()
        }
    }

    /// Builds the `id == "slave_server"` registration record.
    pub fn identify_node(identity: impl Into<String>) -> Self {
        Self {
            id: "slave_server".to_string(),
            message: identity.into(),
            ..Default::default()
        }
    }

    /// Serializes to one `\n`-terminated JSON line.
    pub fn to_line(&self) -> String {
        let mut s = serde_json::to_string(self).expect("Record serialization is infallible");
        s.push('\n');
        s
    }

    /// Parses a single line (the trailing newline, if any, is ignored).
    pub fn from_line(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end()).map_err(|e| Error::MalformedRecord(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_read_as_empty() {
        let rec = Record::from_line(r#"{"req_type":"get","key":"a"}"#).unwrap();
        assert_eq!(rec.key, "a");
        assert_eq!(rec.value, "");
        assert_eq!(rec.message, "");
        assert_eq!(rec.table, "");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let rec = Record::from_line(r#"{"req_type":"get","key":"a","bogus":123}"#).unwrap();
        assert_eq!(rec.record_type(), RecordType::Get);
    }

    #[test]
    fn malformed_line_is_an_error() {
        assert!(Record::from_line("not json").is_err());
    }

    #[test]
    fn round_trips_a_put_request() {
        let rec = Record::request(RecordType::Put, "k", "v", TableTag::Own);
        let line = rec.to_line();
        let parsed = Record::from_line(&line).unwrap();
        assert_eq!(parsed.record_type(), RecordType::Put);
        assert_eq!(parsed.key, "k");
        assert_eq!(parsed.value, "v");
        assert_eq!(parsed.table_tag(), TableTag::Own);
    }

    #[test]
    fn unrecognized_req_type_is_unknown() {
        let rec = Record::from_line(r#"{"req_type":"frobnicate"}"#).unwrap();
        assert_eq!(rec.record_type(), RecordType::Unknown);
    }

    #[test]
    fn table_tag_is_case_insensitive_and_defaults_to_prev() {
        assert_eq!(TableTag::from("OWN"), TableTag::Own);
        assert_eq!(TableTag::from("own"), TableTag::Own);
        assert_eq!(TableTag::from("prev"), TableTag::Prev);
        assert_eq!(TableTag::from("anything-else"), TableTag::Prev);
        assert_eq!(TableTag::from(""), TableTag::Prev);
    }
}
