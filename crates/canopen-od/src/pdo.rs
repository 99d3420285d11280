// crates/canopen-od/src/pdo.rs

use core::ops::RangeInclusive;

/// RPDO communication parameters (CiA 301, 1400h to 15FFh).
pub const RPDO_COMMUNICATION: RangeInclusive<u16> = 0x1400..=0x15FF;
/// RPDO mapping parameters (CiA 301, 1600h to 17FFh).
pub const RPDO_MAPPING: RangeInclusive<u16> = 0x1600..=0x17FF;
/// TPDO communication parameters (CiA 301, 1800h to 19FFh).
pub const TPDO_COMMUNICATION: RangeInclusive<u16> = 0x1800..=0x19FF;
/// TPDO mapping parameters (CiA 301, 1A00h to 1BFFh).
pub const TPDO_MAPPING: RangeInclusive<u16> = 0x1A00..=0x1BFF;

/// Indices 0001h to 0007h name data types and may be mapped as placeholders.
pub const DUMMY_ENTRIES: RangeInclusive<u16> = 0x0001..=0x0007;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdoDirection {
    Receive,
    Transmit,
}

impl PdoDirection {
    pub const fn name(self) -> &'static str {
        match self {
            PdoDirection::Receive => "RPDO",
            PdoDirection::Transmit => "TPDO",
        }
    }

    pub fn of_mapping(index: u16) -> Option<Self> {
        if RPDO_MAPPING.contains(&index) {
            Some(PdoDirection::Receive)
        } else if TPDO_MAPPING.contains(&index) {
            Some(PdoDirection::Transmit)
        } else {
            None
        }
    }

    pub fn of_communication(index: u16) -> Option<Self> {
        if RPDO_COMMUNICATION.contains(&index) {
            Some(PdoDirection::Receive)
        } else if TPDO_COMMUNICATION.contains(&index) {
            Some(PdoDirection::Transmit)
        } else {
            None
        }
    }
}

/// A single PDO mapping entry, parsed from its UNSIGNED32 value.
/// (CiA 301, Figure 73)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdoMappingEntry {
    /// Object Dictionary index of the mapped object.
    pub index: u16,
    /// Object Dictionary sub-index of the mapped object.
    pub sub_index: u8,
    /// Length of the mapped object in bits.
    pub length_bits: u8,
}

impl PdoMappingEntry {
    pub const fn from_u32(value: u32) -> Self {
        Self {
            index: (value >> 16) as u16,
            sub_index: (value >> 8) as u8,
            length_bits: value as u8,
        }
    }

    pub const fn to_u32(&self) -> u32 {
        ((self.index as u32) << 16) | ((self.sub_index as u32) << 8) | self.length_bits as u32
    }

    pub fn is_dummy(&self) -> bool {
        DUMMY_ENTRIES.contains(&self.index)
    }
}

/// The COB-ID entry (sub-index 1) of a PDO communication parameter.
/// (CiA 301, Table 71)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CobId {
    pub raw: u32,
}

impl CobId {
    const INVALID: u32 = 1 << 31;
    const FRAME: u32 = 1 << 29;

    /// Bit 31 set means the PDO does not exist / is disabled.
    pub const fn is_enabled(&self) -> bool {
        self.raw & Self::INVALID == 0
    }

    /// Bit 29 set selects the 29-bit extended frame format.
    pub const fn is_extended(&self) -> bool {
        self.raw & Self::FRAME != 0
    }

    pub const fn can_id(&self) -> u32 {
        self.raw & 0x1FFF_FFFF
    }

    /// `true` if the identifier fits the selected frame format.
    pub const fn is_in_range(&self) -> bool {
        self.is_extended() || self.can_id() <= 0x7FF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_entry_layout() {
        let entry = PdoMappingEntry::from_u32(0x6000_0108);
        assert_eq!(entry.index, 0x6000);
        assert_eq!(entry.sub_index, 0x01);
        assert_eq!(entry.length_bits, 8);
        assert_eq!(entry.to_u32(), 0x6000_0108);
        assert!(!entry.is_dummy());
        assert!(PdoMappingEntry::from_u32(0x0005_0008).is_dummy());
    }

    #[test]
    fn test_cob_id_flags() {
        let disabled = CobId { raw: 0x8000_0180 };
        assert!(!disabled.is_enabled());
        let standard = CobId { raw: 0x181 };
        assert!(standard.is_enabled() && !standard.is_extended() && standard.is_in_range());
        assert!(!CobId { raw: 0x800 }.is_in_range());
        let extended = CobId { raw: 0x2000_0800 };
        assert!(extended.is_extended() && extended.is_in_range());
        assert_eq!(extended.can_id(), 0x800);
    }

    #[test]
    fn test_direction_ranges() {
        assert_eq!(PdoDirection::of_mapping(0x1600), Some(PdoDirection::Receive));
        assert_eq!(PdoDirection::of_mapping(0x1BFF), Some(PdoDirection::Transmit));
        assert_eq!(PdoDirection::of_mapping(0x1800), None);
        assert_eq!(PdoDirection::of_communication(0x1800), Some(PdoDirection::Transmit));
    }
}
