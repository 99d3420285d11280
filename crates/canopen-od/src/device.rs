// crates/canopen-od/src/device.rs

use crate::od::{ObjectDictionary, predefined};
use chrono::NaiveDateTime;

/// Metadata about the description file itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileInfo {
    pub file_name: String,
    pub file_version: u8,
    pub file_revision: u8,
    pub eds_version: String,
    pub description: String,
    pub creation: Option<NaiveDateTime>,
    pub created_by: String,
    pub modification: Option<NaiveDateTime>,
    pub modified_by: String,
}

impl FileInfo {
    /// Stamps the file as modified. The timestamp never moves backwards.
    pub fn mark_modified(&mut self, at: NaiveDateTime, by: impl Into<String>) {
        self.modification = Some(match self.modification {
            Some(previous) if previous > at => previous,
            _ => at,
        });
        self.modified_by = by.into();
    }
}

/// Supported CAN bit rates, in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaudRates {
    pub kbps_10: bool,
    pub kbps_20: bool,
    pub kbps_50: bool,
    pub kbps_125: bool,
    pub kbps_250: bool,
    pub kbps_500: bool,
    pub kbps_800: bool,
    pub kbps_1000: bool,
}

impl BaudRates {
    pub const RATES: [u16; 8] = [10, 20, 50, 125, 250, 500, 800, 1000];

    pub fn supports(&self, kbps: u16) -> bool {
        self.flag(kbps).is_some_and(|flag| flag)
    }

    fn flag(&self, kbps: u16) -> Option<bool> {
        match kbps {
            10 => Some(self.kbps_10),
            20 => Some(self.kbps_20),
            50 => Some(self.kbps_50),
            125 => Some(self.kbps_125),
            250 => Some(self.kbps_250),
            500 => Some(self.kbps_500),
            800 => Some(self.kbps_800),
            1000 => Some(self.kbps_1000),
            _ => None,
        }
    }

    /// Returns `false` when `kbps` is not a standard CANopen bit rate.
    pub fn set(&mut self, kbps: u16, supported: bool) -> bool {
        let slot = match kbps {
            10 => &mut self.kbps_10,
            20 => &mut self.kbps_20,
            50 => &mut self.kbps_50,
            125 => &mut self.kbps_125,
            250 => &mut self.kbps_250,
            500 => &mut self.kbps_500,
            800 => &mut self.kbps_800,
            1000 => &mut self.kbps_1000,
            _ => return false,
        };
        *slot = supported;
        true
    }
}

/// Identity and capability data (EDS `[DeviceInfo]`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceInfo {
    pub vendor_name: String,
    pub vendor_number: Option<u32>,
    pub product_name: String,
    pub product_number: Option<u32>,
    pub revision_number: Option<u32>,
    pub order_code: String,
    pub baud_rates: BaudRates,
    pub simple_boot_up_master: bool,
    pub simple_boot_up_slave: bool,
    pub granularity: u8,
    pub dynamic_channels_supported: u8,
    pub group_messaging: bool,
    pub nr_of_rx_pdo: u16,
    pub nr_of_tx_pdo: u16,
    pub lss_supported: bool,
}

/// Network settings of one installed device (EDS `[DeviceComissioning]`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceCommissioning {
    pub node_id: u8,
    pub node_name: String,
    /// kbit/s
    pub baud_rate: u16,
    pub net_number: u32,
    pub network_name: String,
    pub canopen_manager: bool,
    pub lss_serial_number: u32,
}

/// A named section the engine does not interpret, carried through verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VendorSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

/// A complete device description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Device {
    pub file_info: FileInfo,
    pub device_info: DeviceInfo,
    pub commissioning: DeviceCommissioning,
    pub object_dictionary: ObjectDictionary,
    /// Free-text lines of the EDS `[Comments]` section.
    pub comments: Vec<String>,
    pub vendor_sections: Vec<VendorSection>,
}

impl Device {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device carrying only the mandatory communication objects.
    pub fn minimal_profile() -> Self {
        let mut device = Self::new();
        device.file_info.file_version = 1;
        device.file_info.eds_version = "4.0".to_string();
        for (index, object) in predefined::mandatory_profile_objects() {
            device.object_dictionary.insert(index, object);
        }
        device
    }

    pub fn node_id(&self) -> u8 {
        self.commissioning.node_id
    }
}
