//! Movement orders.
//!
//! An [`Order`] moves a contiguous range of one player's units toward a
//! target cell. The orders for one lockstep turn form an order list,
//! which is just `&[Order]`.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use rampart_core::{Coord, PlayerId, UnitId};

/// Encoded size of one [`Order`] in bytes.
pub const ORDER_SIZE: usize = std::mem::size_of::<Order>();

/// A per-unit-range movement intent.
///
/// Plain-old-data with a fixed 10-byte layout, so order lists are read
/// straight off the wire with `bytemuck`. Fields are in host byte order,
/// little-endian on every supported target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Order {
    player: u8,
    reserved: u8,
    first_unit: u16,
    unit_count: u16,
    target: Coord,
}

impl Order {
    /// Order `unit_count` units starting at `first_unit` toward `target`.
    pub const fn new(player: PlayerId, first_unit: UnitId, unit_count: u16, target: Coord) -> Self {
        Self {
            player: player.0,
            reserved: 0,
            first_unit: first_unit.0,
            unit_count,
            target,
        }
    }

    /// The ordering player.
    pub fn player(&self) -> PlayerId {
        PlayerId(self.player)
    }

    /// First unit of the range.
    pub fn first_unit(&self) -> UnitId {
        UnitId(self.first_unit)
    }

    /// Number of units in the range.
    pub fn unit_count(&self) -> u16 {
        self.unit_count
    }

    /// Destination cell.
    pub fn target(&self) -> Coord {
        self.target
    }

    /// The unit indices this order covers.
    pub fn units(&self) -> Range<usize> {
        let start = self.first_unit as usize;
        start..start + self.unit_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_ten_bytes() {
        assert_eq!(ORDER_SIZE, 10);
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn wire_layout_is_little_endian() {
        let order = Order::new(PlayerId(2), UnitId(0x0104), 3, Coord::new(0x0201, 5));
        assert_eq!(
            bytemuck::bytes_of(&order),
            &[2, 0, 0x04, 0x01, 3, 0, 0x01, 0x02, 5, 0]
        );
        let back: Order = bytemuck::pod_read_unaligned(bytemuck::bytes_of(&order));
        assert_eq!(back.player(), PlayerId(2));
        assert_eq!(back.units(), 0x0104..0x0107);
        assert_eq!(back.target(), Coord::new(0x0201, 5));
    }
}
