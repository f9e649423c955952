use ash::vk::make_api_version;

pub const DEFAULT_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

#[cfg(feature = "enable_validations")]
const ENABLE_VALIDATIONS: bool = true;
#[cfg(not(feature = "enable_validations"))]
const ENABLE_VALIDATIONS: bool = false;

/// Whether the validation layers, the debug utils extension and the debug messenger
/// are turned on. All three follow the same flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    pub enabled: bool,
    pub layers: Vec<String>,
}

impl ValidationSettings {
    /// Settings selected at compile time through the `enable_validations` feature.
    pub fn from_build() -> Self {
        Self {
            enabled: ENABLE_VALIDATIONS,
            layers: vec![DEFAULT_VALIDATION_LAYER.to_owned()],
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            layers: vec![],
        }
    }

    /// The layers to actually enable, empty when validations are off.
    pub fn enabled_layers(&self) -> &[String] {
        if self.enabled {
            &self.layers
        } else {
            &[]
        }
    }
}

/// Immutable settings handed to the bootstrapper.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub validation: ValidationSettings,
}

impl BootstrapConfig {
    pub fn new(application_name: impl Into<String>, validation: ValidationSettings) -> Self {
        Self {
            application_name: application_name.into(),
            application_version: package_version(),
            engine_name: "No Engine".to_owned(),
            validation,
        }
    }

    pub fn from_build() -> Self {
        Self::new("HelloVulkan", ValidationSettings::from_build())
    }
}

#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Vulkan Renderer".to_owned(),
        }
    }
}

fn package_version() -> u32 {
    // cargo always sets these to plain integers
    let major = env!("CARGO_PKG_VERSION_MAJOR").parse::<u32>().unwrap_or(0);
    let minor = env!("CARGO_PKG_VERSION_MINOR").parse::<u32>().unwrap_or(0);
    let patch = env!("CARGO_PKG_VERSION_PATCH").parse::<u32>().unwrap_or(0);
    make_api_version(0, major, minor, patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_settings_enable_no_layers() {
        let settings = ValidationSettings {
            enabled: false,
            layers: vec![DEFAULT_VALIDATION_LAYER.to_owned()],
        };
        assert!(settings.enabled_layers().is_empty());
    }

    #[test]
    fn enabled_settings_enable_configured_layers() {
        let settings = ValidationSettings {
            enabled: true,
            layers: vec![DEFAULT_VALIDATION_LAYER.to_owned()],
        };
        assert_eq!(settings.enabled_layers(), [DEFAULT_VALIDATION_LAYER]);
    }

    #[test]
    fn build_settings_follow_feature() {
        let settings = ValidationSettings::from_build();
        assert_eq!(settings.enabled, cfg!(feature = "enable_validations"));
    }
}
