//! # ps-protocol
//!
//! Wire types for the PageSync WebSocket relay.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Scroll offsets travel as raw JSON numbers so integers stay integers
/// and no precision is lost between clients.
pub type ScrollTop = serde_json::Number;

pub const JOIN_ROOM: &str = "join-room";
pub const SCROLL_SYNC: &str = "scroll-sync";
pub const SCROLL_UPDATE: &str = "scroll-update";

/// Maximum inbound frame size (64 KB). Relay frames are tiny.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Events a client may send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Payload is the bare room id.
    #[serde(rename = "join-room")]
    JoinRoom(String),
    #[serde(rename = "scroll-sync")]
    ScrollSync(ScrollSync),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSync {
    pub room_id: String,
    pub scroll_top: ScrollTop,
}

impl ClientEvent {
    /// Decode a text frame. Unknown event names and malformed payloads
    /// are both errors; callers are expected to drop them.
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Events the relay pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Payload is the bare scroll offset.
    #[serde(rename = "scroll-update")]
    ScrollUpdate(ScrollTop),
}

impl ServerEvent {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_join_room() {
        let ev = ClientEvent::decode(r#"{"event":"join-room","data":"abc"}"#).unwrap();
        assert_eq!(ev, ClientEvent::JoinRoom("abc".into()));
    }

    #[test]
    fn test_decode_scroll_sync() {
        let ev = ClientEvent::decode(
            r#"{"event":"scroll-sync","data":{"roomId":"abc","scrollTop":120}}"#,
        )
        .unwrap();
        match ev {
            ClientEvent::ScrollSync(sync) => {
                assert_eq!(sync.room_id, "abc");
                assert_eq!(sync.scroll_top.as_i64(), Some(120));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_and_malformed() {
        assert!(ClientEvent::decode(r#"{"event":"leave-room","data":"abc"}"#).is_err());
        assert!(ClientEvent::decode(r#"{"event":"join-room","data":42}"#).is_err());
        assert!(ClientEvent::decode(r#"{"event":"scroll-sync","data":{"roomId":"abc"}}"#).is_err());
        assert!(
            ClientEvent::decode(r#"{"event":"scroll-sync","data":{"roomId":"abc","scrollTop":"12"}}"#)
                .is_err()
        );
        assert!(ClientEvent::decode(r#"{"event":"join-room"}"#).is_err());
        assert!(ClientEvent::decode("not json").is_err());
    }

    #[test]
    fn test_scroll_update_keeps_number_verbatim() {
        let int = ServerEvent::ScrollUpdate(ScrollTop::from(120)).encode().unwrap();
        assert_eq!(int, r#"{"event":"scroll-update","data":120}"#);

        let neg = ServerEvent::ScrollUpdate(ScrollTop::from(-35)).encode().unwrap();
        assert_eq!(neg, r#"{"event":"scroll-update","data":-35}"#);

        let frac = ScrollTop::from_f64(1234.5).unwrap();
        let frac = ServerEvent::ScrollUpdate(frac).encode().unwrap();
        assert_eq!(frac, r#"{"event":"scroll-update","data":1234.5}"#);
    }
}
