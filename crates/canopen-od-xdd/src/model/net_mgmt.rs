// crates/canopen-od-xdd/src/model/net_mgmt.rs

//! Contains model structs related to `<TransportLayers>` and `<NetworkManagement>`.
//! (Schema: `ProfileBody_CommunicationNetwork_CANopen.xsd`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TransportLayers {
    #[serde(rename = "PhysicalLayer", default)]
    pub physical_layer: PhysicalLayer,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct PhysicalLayer {
    #[serde(rename = "baudRate", default)]
    pub baud_rate: BaudRate,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct BaudRate {
    #[serde(rename = "supportedBaudRate", default)]
    pub supported_baud_rate: Vec<SupportedBaudRate>,
}

/// `<supportedBaudRate value="250 Kbps"/>`
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SupportedBaudRate {
    #[serde(rename = "@value")]
    pub value: String,
}

/// Represents `<NetworkManagement>` (from XSD `t_NetworkManagement`).
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct NetworkManagement {
    #[serde(rename = "CANopenGeneralFeatures", default)]
    pub general_features: GeneralFeatures,

    #[serde(
        rename = "CANopenMasterFeatures",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub master_features: Option<MasterFeatures>,

    #[serde(
        rename = "deviceCommissioning",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub device_commissioning: Option<DeviceCommissioning>,
}

/// Represents `<CANopenGeneralFeatures>` (from XSD `t_CANopenGeneralFeatures`).
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct GeneralFeatures {
    #[serde(rename = "@groupMessaging", default, skip_serializing_if = "Option::is_none")]
    pub group_messaging: Option<String>,
    #[serde(rename = "@dynamicChannels", default, skip_serializing_if = "Option::is_none")]
    pub dynamic_channels: Option<String>,
    #[serde(rename = "@granularity", default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<String>,
    #[serde(rename = "@nrOfRxPDO", default, skip_serializing_if = "Option::is_none")]
    pub nr_of_rx_pdo: Option<String>,
    #[serde(rename = "@nrOfTxPDO", default, skip_serializing_if = "Option::is_none")]
    pub nr_of_tx_pdo: Option<String>,
    #[serde(rename = "@bootUpSlave", default, skip_serializing_if = "Option::is_none")]
    pub boot_up_slave: Option<String>,
    #[serde(
        rename = "@layerSettingServiceSlave",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub layer_setting_service_slave: Option<String>,
}

/// Represents `<CANopenMasterFeatures>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct MasterFeatures {
    #[serde(rename = "@bootUpMaster", default, skip_serializing_if = "Option::is_none")]
    pub boot_up_master: Option<String>,
}

/// Represents `<deviceCommissioning>` (from XSD `t_deviceCommissioning`).
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DeviceCommissioning {
    #[serde(rename = "@nodeID", default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(rename = "@nodeName", default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// In kbit/s.
    #[serde(rename = "@actualBaudRate", default, skip_serializing_if = "Option::is_none")]
    pub actual_baud_rate: Option<String>,
    #[serde(rename = "@networkNumber", default, skip_serializing_if = "Option::is_none")]
    pub network_number: Option<String>,
    #[serde(rename = "@networkName", default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    #[serde(rename = "@CANopenManager", default, skip_serializing_if = "Option::is_none")]
    pub canopen_manager: Option<String>,
    #[serde(
        rename = "@LSS_SerialNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lss_serial_number: Option<String>,
}
