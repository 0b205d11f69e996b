// Room catalog filtering for the home page and room pickers.

use crate::models::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    /// Up to Rp 500.000 per month.
    UpTo500k,
    /// Above Rp 500.000, up to Rp 1.000.000.
    From500kTo1m,
    /// Above Rp 1.000.000.
    Above1m,
}

impl PriceBand {
    pub fn contains(self, monthly_price: u64) -> bool {
        match self {
            PriceBand::UpTo500k => monthly_price <= 500_000,
            PriceBand::From500kTo1m => monthly_price > 500_000 && monthly_price <= 1_000_000,
            PriceBand::Above1m => monthly_price > 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    /// Case-insensitive substring of the room name.
    pub search: Option<String>,
    /// Case-insensitive substring of the room type. `None` means all types.
    pub room_type: Option<String>,
    pub price_band: Option<PriceBand>,
    pub hide_unavailable: bool,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        let search = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        if let Some(search) = search {
            if !room.name.to_lowercase().contains(&search) {
                return false;
            }
        }

        if let Some(room_type) = &self.room_type {
            if !room
                .room_type
                .to_lowercase()
                .contains(&room_type.to_lowercase())
            {
                return false;
            }
        }

        if !self
            .price_band
            .map_or(true, |band| band.contains(room.monthly_price()))
        {
            return false;
        }

        if self.hide_unavailable && !room.status.is_bookable() {
            return false;
        }

        true
    }
}

/// Rooms matching the filter, in their original order.
pub fn filter_rooms(rooms: &[Room], filter: &RoomFilter) -> Vec<Room> {
    rooms.iter().filter(|room| filter.matches(room)).cloned().collect()
}

/// Upper bound for the guest selector. Rooms without a recorded capacity allow one guest.
pub fn guest_limit(room: &Room) -> u32 {
    room.capacity.max(1)
}
