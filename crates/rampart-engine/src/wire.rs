//! Frame tags and payload layouts exchanged with the platform layer.
//!
//! Four frame streams cross the engine boundary:
//!
//! | Stream | Direction | Tag enum |
//! |--------|-----------|----------|
//! | network events | platform → game | [`NetEventKind`] |
//! | network commands | game → platform | [`NetCommandKind`] |
//! | render commands | game → platform | [`RenderCommandKind`] |
//! | messages | inside `Message` events and `Send` commands | [`MessageKind`] |
//!
//! A message is one [`MessageKind`] byte followed by its body. Fixed-size
//! bodies are `#[repr(C)]` plain-old-data read with
//! `bytemuck::pod_read_unaligned`, so they can sit at any offset.
//!
//! An order list body is a little-endian `u16` count followed by that many
//! 10-byte [`Order`]s.
//!
//! # Byte order
//!
//! `Pod` payloads are copied as they sit in memory, so their multi-byte
//! fields travel in host byte order. The layouts are little-endian only on
//! little-endian hosts, which is every target the platform layer ships on;
//! both ends of a connection must share byte order.

use bytemuck::{Pod, Zeroable};
use rampart_sim::{Order, ORDER_SIZE};
use thiserror::Error;

/// Size of a message's kind prefix.
pub const MESSAGE_KIND_SIZE: usize = 1;

/// Size of the count prefix of an order list body.
pub const ORDER_LIST_HEADER_SIZE: usize = std::mem::size_of::<u16>();

/// Longest message without a variable-length body (`start`).
pub const MAX_CONTROL_MESSAGE_LEN: usize = MESSAGE_KIND_SIZE + std::mem::size_of::<StartMessage>();

// ── WireError ──────────────────────────────────────────────────────

/// Malformed frames and messages.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WireError {
    /// A frame tag or message kind not defined for its stream.
    #[error("unknown {stream} tag {tag}")]
    UnknownTag {
        /// Which stream the tag was read from.
        stream: &'static str,
        /// The tag value.
        tag: u16,
    },
    /// The payload ended before a complete value.
    #[error("payload truncated: need {needed} bytes, got {actual}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        actual: usize,
    },
    /// The payload is longer or shorter than its declared contents.
    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Length implied by the layout.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// An order list carries more orders than the receiver can hold.
    #[error("order list of {count} orders exceeds the limit of {limit}")]
    TooManyOrders {
        /// Declared order count.
        count: usize,
        /// Largest accepted count.
        limit: usize,
    },
    /// An encode target is too small.
    #[error("encode buffer of {provided} bytes cannot hold {needed} bytes")]
    BufferTooSmall {
        /// Bytes the encoding needs.
        needed: usize,
        /// Bytes available.
        provided: usize,
    },
}

// ── Tags ───────────────────────────────────────────────────────────

macro_rules! wire_tag {
    (
        $(#[$meta:meta])*
        $name:ident: $repr:ty, $stream:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// The on-wire tag value.
            pub const fn tag(self) -> $repr {
                self as $repr
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = WireError;

            fn try_from(tag: $repr) -> Result<Self, WireError> {
                match tag {
                    $($value => Ok(Self::$variant),)+
                    other => Err(WireError::UnknownTag {
                        stream: $stream,
                        tag: other as u16,
                    }),
                }
            }
        }
    };
}

wire_tag! {
    /// Tags of frames on the network event stream.
    NetEventKind: u16, "network event" {
        /// The transport connected. Empty payload.
        ConnectionEstablished = 0,
        /// An established connection dropped. Empty payload.
        ConnectionLost = 1,
        /// The transport could not connect. Empty payload.
        ConnectionFailed = 2,
        /// A message arrived; the payload is the message bytes.
        Message = 3,
    }
}

wire_tag! {
    /// Tags of frames on the network command stream.
    NetCommandKind: u16, "network command" {
        /// Send the payload as a message.
        Send = 0,
        /// Close the connection. Empty payload.
        Shutdown = 1,
    }
}

wire_tag! {
    /// Tags of frames on the render command stream.
    RenderCommandKind: u16, "render command" {
        /// Draw one unit square; the payload is a [`DrawSquare`].
        DrawSquare = 0,
    }
}

wire_tag! {
    /// Leading byte of every message.
    MessageKind: u8, "message" {
        /// Match start; body is a [`StartMessage`].
        Start = 0,
        /// Acknowledgement of `Start`. Empty body.
        Reply = 1,
        /// One lockstep turn of orders.
        OrderList = 2,
    }
}

// ── Payloads ───────────────────────────────────────────────────────

/// Body of a `Start` message.
///
/// Size: 2 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct StartMessage {
    /// Players in the match.
    pub player_count: u8,
    /// This client's index among them.
    pub local_player_index: u8,
}

/// Payload of a `DrawSquare` render command.
///
/// Size: 8 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct DrawSquare {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Fill color, `0xAARRGGBB`.
    pub color: u32,
}

/// A decoded message borrowing from its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message<'a> {
    /// Match start.
    Start(StartMessage),
    /// Acknowledgement of `Start`.
    Reply,
    /// Encoded order list body, validated for framing.
    OrderList(&'a [u8]),
}

impl Message<'_> {
    /// The message's kind byte.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Start(_) => MessageKind::Start,
            Message::Reply => MessageKind::Reply,
            Message::OrderList(_) => MessageKind::OrderList,
        }
    }

    /// Encoded size, kind byte included.
    pub fn encoded_len(&self) -> usize {
        MESSAGE_KIND_SIZE
            + match self {
                Message::Start(_) => std::mem::size_of::<StartMessage>(),
                Message::Reply => 0,
                Message::OrderList(body) => body.len(),
            }
    }
}

// ── Decoding ───────────────────────────────────────────────────────

/// Read a `T` that must fill `bytes` exactly.
pub fn decode_pod<T: Pod>(bytes: &[u8]) -> Result<T, WireError> {
    let expected = std::mem::size_of::<T>();
    if bytes.len() != expected {
        return Err(WireError::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytemuck::pod_read_unaligned(bytes))
}

/// Decode a message.
///
/// Order list bodies are checked for framing only (count against length),
/// with no limit on the count.
pub fn decode_message(bytes: &[u8]) -> Result<Message<'_>, WireError> {
    let (&kind, body) = bytes.split_first().ok_or(WireError::Truncated {
        needed: MESSAGE_KIND_SIZE,
        actual: 0,
    })?;
    match MessageKind::try_from(kind)? {
        MessageKind::Start => Ok(Message::Start(decode_pod(body)?)),
        MessageKind::Reply => {
            if !body.is_empty() {
                return Err(WireError::LengthMismatch {
                    expected: MESSAGE_KIND_SIZE,
                    actual: bytes.len(),
                });
            }
            Ok(Message::Reply)
        }
        MessageKind::OrderList => {
            order_list_len(body, usize::MAX)?;
            Ok(Message::OrderList(body))
        }
    }
}

/// Validate an order list body and return its order count.
///
/// Fails if the count exceeds `limit` or disagrees with the body length.
pub fn order_list_len(body: &[u8], limit: usize) -> Result<usize, WireError> {
    let Some(prefix) = body.get(..ORDER_LIST_HEADER_SIZE) else {
        return Err(WireError::Truncated {
            needed: ORDER_LIST_HEADER_SIZE,
            actual: body.len(),
        });
    };
    let count = u16::from_le_bytes([prefix[0], prefix[1]]) as usize;
    if count > limit {
        return Err(WireError::TooManyOrders { count, limit });
    }
    let expected = ORDER_LIST_HEADER_SIZE + count * ORDER_SIZE;
    if body.len() != expected {
        return Err(WireError::LengthMismatch {
            expected,
            actual: body.len(),
        });
    }
    Ok(count)
}

/// Decode an order list body into `out`, returning the filled prefix.
pub fn decode_order_list<'o>(body: &[u8], out: &'o mut [Order]) -> Result<&'o [Order], WireError> {
    let count = order_list_len(body, out.len())?;
    let orders = &body[ORDER_LIST_HEADER_SIZE..];
    for (slot, chunk) in out.iter_mut().zip(orders.chunks_exact(ORDER_SIZE)) {
        *slot = bytemuck::pod_read_unaligned(chunk);
    }
    Ok(&out[..count])
}

// ── Encoding ───────────────────────────────────────────────────────

/// Encode `message` into the front of `out`, returning the bytes written.
pub fn encode_message(message: &Message<'_>, out: &mut [u8]) -> Result<usize, WireError> {
    let needed = message.encoded_len();
    let Some(target) = out.get_mut(..needed) else {
        return Err(WireError::BufferTooSmall {
            needed,
            provided: out.len(),
        });
    };
    let (kind, body) = target.split_at_mut(MESSAGE_KIND_SIZE);
    kind[0] = message.kind().tag();
    match message {
        Message::Start(start) => body.copy_from_slice(bytemuck::bytes_of(start)),
        Message::Reply => {}
        Message::OrderList(list) => body.copy_from_slice(list),
    }
    Ok(needed)
}

/// Bytes needed to encode `count` orders as an order list body.
pub const fn order_list_encoded_len(count: usize) -> usize {
    ORDER_LIST_HEADER_SIZE + count * ORDER_SIZE
}

/// Encode `orders` as an order list body into the front of `out`.
pub fn encode_order_list(orders: &[Order], out: &mut [u8]) -> Result<usize, WireError> {
    let count = u16::try_from(orders.len()).map_err(|_| WireError::TooManyOrders {
        count: orders.len(),
        limit: u16::MAX as usize,
    })?;
    let needed = order_list_encoded_len(orders.len());
    let Some(target) = out.get_mut(..needed) else {
        return Err(WireError::BufferTooSmall {
            needed,
            provided: out.len(),
        });
    };
    let (prefix, body) = target.split_at_mut(ORDER_LIST_HEADER_SIZE);
    prefix.copy_from_slice(&count.to_le_bytes());
    body.copy_from_slice(bytemuck::cast_slice(orders));
    Ok(needed)
}
