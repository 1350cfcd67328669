//! Chat turn types and their wire codec.
//!
//! A turn is one role-tagged message within a session. Turns are persisted
//! as flat, self-describing JSON records of the form
//! `{"type":"human","content":"..."}` -- exactly what the session store
//! pushes into the backing Valkey list.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Role of a single turn in a conversation.
///
/// Only these two values are ever persisted. Anything else read back from
/// the store is a [`DecodeError`], never silently coerced to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Ai,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::Human => write!(f, "human"),
            TurnRole::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(TurnRole::Human),
            "ai" => Ok(TurnRole::Ai),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// A single chat turn: one role-tagged message within a session.
///
/// Content is arbitrary UTF-8, bounded only by the backing store's
/// value-size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "type")]
    pub role: TurnRole,
    pub content: String,
}

/// Intermediate wire shape for decoding.
///
/// The role is read as a raw string first so an unrecognized value can be
/// reported as [`DecodeError::UnknownRole`] rather than a generic parse
/// failure.
#[derive(Deserialize)]
struct WireTurn {
    #[serde(rename = "type")]
    kind: String,
    content: String,
}

impl ChatTurn {
    /// Construct a human turn.
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Human,
            content: content.into(),
        }
    }

    /// Construct an AI turn.
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Ai,
            content: content.into(),
        }
    }

    /// Encode this turn into its wire record.
    ///
    /// Round-trips exactly: `ChatTurn::from_wire(&t.to_wire()) == t` for
    /// every valid turn.
    pub fn to_wire(&self) -> Vec<u8> {
        // Serializing an enum tag plus a string cannot fail.
        serde_json::to_vec(self).expect("turn serialization is infallible")
    }

    /// Decode a wire record back into a turn.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, DecodeError> {
        let wire: WireTurn =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let role = wire
            .kind
            .parse()
            .map_err(|_| DecodeError::UnknownRole(wire.kind))?;
        Ok(Self {
            role,
            content: wire.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_roundtrip() {
        for role in [TurnRole::Human, TurnRole::Ai] {
            let s = role.to_string();
            let parsed: TurnRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_turn_role_rejects_unknown() {
        assert!("assistant".parse::<TurnRole>().is_err());
        assert!("HUMAN".parse::<TurnRole>().is_err());
        assert!("".parse::<TurnRole>().is_err());
    }

    #[test]
    fn test_wire_format() {
        let turn = ChatTurn::human("Hello");
        let bytes = turn.to_wire();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"type":"human","content":"Hello"}"#
        );
    }

    #[test]
    fn test_wire_roundtrip() {
        for turn in [
            ChatTurn::human("Hello"),
            ChatTurn::ai("Hi there"),
            ChatTurn::human(""),
            ChatTurn::ai("line one\nline two\t\"quoted\""),
        ] {
            let decoded = ChatTurn::from_wire(&turn.to_wire()).unwrap();
            assert_eq!(decoded, turn);
        }
    }

    #[test]
    fn test_wire_roundtrip_unicode() {
        let turn = ChatTurn::human("こんにちは 🚀 مرحبا");
        let decoded = ChatTurn::from_wire(&turn.to_wire()).unwrap();
        assert_eq!(decoded, turn);
    }

    #[test]
    fn test_decode_unknown_role() {
        let err = ChatTurn::from_wire(br#"{"type":"system","content":"x"}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownRole("system".to_string()));
    }

    #[test]
    fn test_decode_malformed_record() {
        let err = ChatTurn::from_wire(b"not json at all").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));

        let err = ChatTurn::from_wire(br#"{"content":"missing role"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_decode_field_order_insensitive() {
        let turn = ChatTurn::from_wire(br#"{"content":"Hi there","type":"ai"}"#).unwrap();
        assert_eq!(turn, ChatTurn::ai("Hi there"));
    }
}
