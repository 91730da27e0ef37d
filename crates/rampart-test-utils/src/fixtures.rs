//! Frame builders and output decoders.
//!
//! Builders write well-formed network event frames; decoders drain the
//! game's output queues into owned values and panic on anything
//! malformed, which is a test failure.

use rampart_core::{Coord, PlayerId, UnitId};
use rampart_engine::wire::{self, decode_pod, Message, NetCommandKind, NetEventKind, RenderCommandKind};
use rampart_engine::{DrawSquare, StartMessage};
use rampart_queue::AppendQueue;
use rampart_sim::Order;

// ── Builders ───────────────────────────────────────────────────────

/// Write an empty-payload event (`ConnectionEstablished`, `ConnectionLost`,
/// `ConnectionFailed`).
pub fn push_event(queue: &mut AppendQueue<'_>, kind: NetEventKind) {
    queue.write(kind.tag(), &[]).expect("event queue full");
}

/// Write a `Message` event carrying `message`.
pub fn push_message(queue: &mut AppendQueue<'_>, message: &Message<'_>) {
    let region = queue
        .allocate(NetEventKind::Message.tag(), message.encoded_len())
        .expect("event queue full");
    wire::encode_message(message, region).expect("message sized by encoded_len");
}

/// Write a raw `Message` event, for malformed-message tests.
pub fn push_raw_message(queue: &mut AppendQueue<'_>, bytes: &[u8]) {
    queue
        .write(NetEventKind::Message.tag(), bytes)
        .expect("event queue full");
}

/// Write a `start` message event.
pub fn push_start(queue: &mut AppendQueue<'_>, player_count: u8, local_player_index: u8) {
    push_message(
        queue,
        &Message::Start(StartMessage {
            player_count,
            local_player_index,
        }),
    );
}

/// Write an `order_list` message event.
pub fn push_order_list(queue: &mut AppendQueue<'_>, orders: &[Order]) {
    let body = encode_orders(orders);
    push_message(queue, &Message::OrderList(&body));
}

/// Encode `orders` as an order list body.
pub fn encode_orders(orders: &[Order]) -> Vec<u8> {
    let mut body = vec![0u8; wire::order_list_encoded_len(orders.len())];
    wire::encode_order_list(orders, &mut body).expect("body sized by order count");
    body
}

/// Shorthand for an order moving `count` units from `first` to `(x, y)`.
pub fn order(player: u8, first: u16, count: u16, x: u16, y: u16) -> Order {
    Order::new(PlayerId(player), UnitId(first), count, Coord::new(x, y))
}

// ── Decoders ───────────────────────────────────────────────────────

/// A decoded network command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetCommand {
    /// `Send` with the message bytes.
    Send(Vec<u8>),
    /// `Shutdown`, which carries no payload.
    Shutdown,
}

impl NetCommand {
    /// The `Send` command carrying an encoded `reply` message.
    pub fn reply() -> Self {
        let mut bytes = vec![0u8; Message::Reply.encoded_len()];
        wire::encode_message(&Message::Reply, &mut bytes).expect("reply sized by encoded_len");
        NetCommand::Send(bytes)
    }
}

/// Every unread frame as `(tag, payload)`.
pub fn drain_frames(queue: &mut AppendQueue<'_>) -> Vec<(u16, Vec<u8>)> {
    let mut frames = Vec::new();
    while let Some(frame) = queue.read() {
        frames.push((frame.tag, frame.payload.to_vec()));
    }
    frames
}

/// Every unread network command.
pub fn drain_net_commands(queue: &mut AppendQueue<'_>) -> Vec<NetCommand> {
    drain_frames(queue)
        .into_iter()
        .map(|(tag, payload)| match NetCommandKind::try_from(tag).expect("command tag") {
            NetCommandKind::Send => NetCommand::Send(payload),
            NetCommandKind::Shutdown => {
                assert!(payload.is_empty(), "shutdown carries no payload");
                NetCommand::Shutdown
            }
        })
        .collect()
}

/// Every unread render command, as `DrawSquare`s.
pub fn drain_draw_squares(queue: &mut AppendQueue<'_>) -> Vec<DrawSquare> {
    drain_frames(queue)
        .into_iter()
        .map(|(tag, payload)| {
            assert_eq!(
                RenderCommandKind::try_from(tag).expect("render tag"),
                RenderCommandKind::DrawSquare
            );
            decode_pod(&payload).expect("draw square payload")
        })
        .collect()
}
