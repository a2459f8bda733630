//! Virtual hub configuration.

use serde::Deserialize;

/// Configuration for the simulated hub.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualHubConfig {
    /// Artificial delay applied to every hub call, in milliseconds.
    pub latency_ms: u64,
    /// Security code accepted by pairing. `None` accepts any code.
    pub security_code: Option<String>,
    /// Devices present at startup.
    pub devices: Vec<VirtualDeviceConfig>,
    /// Groups present at startup.
    pub groups: Vec<VirtualGroupConfig>,
}

/// One simulated device.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualDeviceConfig {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// One simulated group.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualGroupConfig {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub devices: Vec<u32>,
}

impl Default for VirtualHubConfig {
    fn default() -> Self {
        let device = |id: u32, name: &str| VirtualDeviceConfig {
            id,
            name: name.to_string(),
            model: Some("TRADFRI bulb E27 CWS opal 600lm".to_string()),
        };
        Self {
            latency_ms: 0,
            security_code: None,
            devices: vec![
                device(65_537, "Sofa lamp"),
                device(65_538, "Ceiling light"),
                device(65_539, "Desk lamp"),
            ],
            groups: vec![VirtualGroupConfig {
                id: 131_073,
                name: "Living room".to_string(),
                devices: vec![65_537, 65_538],
            }],
        }
    }
}
