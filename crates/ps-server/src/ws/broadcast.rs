//! Room fan-out: deliver an event to every member of a room but its sender.

use axum::extract::ws::Message;

use ps_protocol::{ScrollTop, ServerEvent};

use super::registry::{ConnectionId, ConnectionRegistry};

/// Send a `scroll-update` to all other members of `room_id`.
///
/// Fire-and-forget: members whose socket already closed are skipped. The
/// value is forwarded untouched. Returns how many frames were queued.
pub fn broadcast_scroll(
    registry: &ConnectionRegistry,
    origin: &ConnectionId,
    room_id: &str,
    scroll_top: ScrollTop,
) -> usize {
    let members = registry.members_of(room_id);
    if members.is_empty() {
        tracing::debug!(room_id, "Scroll sync for empty room dropped");
        return 0;
    }

    let text = match ServerEvent::ScrollUpdate(scroll_top).encode() {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(room_id, "Failed to encode scroll update: {}", e);
            return 0;
        }
    };

    let delivered = members
        .iter()
        .filter(|id| *id != origin)
        .filter(|id| registry.send_to(id, Message::Text(text.clone().into())))
        .count();

    tracing::debug!(
        room_id,
        origin = %origin,
        members = members.len(),
        delivered,
        "Scroll update relayed"
    );
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn connect(registry: &ConnectionRegistry) -> (ConnectionId, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (registry.register(tx), rx)
    }

    fn received_text(rx: &mut mpsc::UnboundedReceiver<Message>) -> Option<String> {
        match rx.try_recv() {
            Ok(Message::Text(text)) => Some(text.as_str().to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_other_members_receive_update() {
        let registry = ConnectionRegistry::new();
        let (a, mut rx_a) = connect(&registry);
        let (b, mut rx_b) = connect(&registry);
        let (c, mut rx_c) = connect(&registry);
        registry.join(&a, "abc");
        registry.join(&b, "abc");
        registry.join(&c, "abc");

        let delivered = broadcast_scroll(&registry, &a, "abc", ScrollTop::from(120));

        assert_eq!(delivered, 2);
        let expected = r#"{"event":"scroll-update","data":120}"#;
        assert_eq!(received_text(&mut rx_b).as_deref(), Some(expected));
        assert_eq!(received_text(&mut rx_c).as_deref(), Some(expected));
        assert!(received_text(&mut rx_a).is_none());
    }

    #[test]
    fn test_sender_never_receives_own_update() {
        let registry = ConnectionRegistry::new();
        let (a, mut rx_a) = connect(&registry);
        registry.join(&a, "abc");

        assert_eq!(broadcast_scroll(&registry, &a, "abc", ScrollTop::from(5)), 0);
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_other_rooms_are_isolated() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry);
        let (b, mut rx_b) = connect(&registry);
        registry.join(&a, "abc");
        registry.join(&b, "xyz");

        assert_eq!(broadcast_scroll(&registry, &a, "abc", ScrollTop::from(7)), 0);
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_empty_room_is_noop() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry);

        assert_eq!(broadcast_scroll(&registry, &a, "ghost", ScrollTop::from(1)), 0);
    }

    #[test]
    fn test_sender_need_not_be_member() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry);
        let (b, mut rx_b) = connect(&registry);
        registry.join(&b, "abc");

        assert_eq!(broadcast_scroll(&registry, &a, "abc", ScrollTop::from(3)), 1);
        assert!(received_text(&mut rx_b).is_some());
    }

    #[test]
    fn test_values_forwarded_verbatim() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry);
        let (b, mut rx_b) = connect(&registry);
        registry.join(&a, "abc");
        registry.join(&b, "abc");

        broadcast_scroll(&registry, &a, "abc", ScrollTop::from(-250));
        broadcast_scroll(&registry, &a, "abc", ScrollTop::from_f64(99999.75).unwrap());

        assert_eq!(
            received_text(&mut rx_b).as_deref(),
            Some(r#"{"event":"scroll-update","data":-250}"#)
        );
        assert_eq!(
            received_text(&mut rx_b).as_deref(),
            Some(r#"{"event":"scroll-update","data":99999.75}"#)
        );
    }

    #[test]
    fn test_closed_member_is_skipped() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry);
        let (b, rx_b) = connect(&registry);
        let (c, mut rx_c) = connect(&registry);
        registry.join(&a, "abc");
        registry.join(&b, "abc");
        registry.join(&c, "abc");
        drop(rx_b);

        assert_eq!(broadcast_scroll(&registry, &a, "abc", ScrollTop::from(10)), 1);
        assert!(received_text(&mut rx_c).is_some());
    }
}
