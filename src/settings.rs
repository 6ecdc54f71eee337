use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

pub const SETTING_VERBOSE_LOGGING: &str = "rendering/streamline/streamline_log";
pub const SETTING_DEBUG_OVERLAY: &str = "rendering/streamline/streamline_imgui";
pub const SETTING_LATENCY_MODE: &str = "rendering/streamline/reflex_mode";
pub const SETTING_FRAME_LIMIT_US: &str = "rendering/streamline/reflex_frame_limit_us";
pub const SETTING_UPSCALING_PRESET: &str = "rendering/streamline/dlss_preset";

const MAX_LATENCY_MODE: i64 = 2;
const MAX_FRAME_LIMIT_US: i64 = 1_000_000;

/// A value read from the host's configuration store.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

/// Editor hint attached to a setting definition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingHint {
    None,
    Range { min: i64, max: i64 },
    Enum(&'static [char]),
}

/// A setting the host should register with its configuration store.
#[derive(Clone, Copy, Debug)]
pub struct SettingDefinition {
    pub key: &'static str,
    pub default: DefaultValue,
    pub hint: SettingHint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

pub const SETTING_DEFINITIONS: [SettingDefinition; 5] = [
    SettingDefinition {
        key: SETTING_VERBOSE_LOGGING,
        default: DefaultValue::Bool(false),
        hint: SettingHint::None,
    },
    SettingDefinition {
        key: SETTING_DEBUG_OVERLAY,
        default: DefaultValue::Bool(cfg!(feature = "debug_overlay")),
        hint: SettingHint::None,
    },
    SettingDefinition {
        key: SETTING_LATENCY_MODE,
        default: DefaultValue::Int(0),
        hint: SettingHint::Range {
            min: 0,
            max: MAX_LATENCY_MODE,
        },
    },
    SettingDefinition {
        key: SETTING_FRAME_LIMIT_US,
        default: DefaultValue::Int(0),
        hint: SettingHint::Range {
            min: 0,
            max: MAX_FRAME_LIMIT_US,
        },
    },
    SettingDefinition {
        key: SETTING_UPSCALING_PRESET,
        default: DefaultValue::Str("?"),
        hint: SettingHint::Enum(&crate::UpscalingPreset::CODES),
    },
];

/// Read access to the host's global configuration store.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<SettingValue>;
}

impl SettingsStore for HashMap<String, SettingValue> {
    fn get(&self, key: &str) -> Option<SettingValue> {
        HashMap::get(self, key).cloned()
    }
}

/// In-memory [`SettingsStore`], for hosts without a configuration system of their own.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, SettingValue>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: impl Into<SettingValue>) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_owned(), value.into());
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn get(&self, key: &str) -> Option<SettingValue> {
        (**self).get(key)
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<SettingValue> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

/// Streamline settings resolved from a [`SettingsStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectSettings {
    pub verbose_logging: bool,
    pub debug_overlay: bool,
    /// Reflex level, `0..=2`.
    pub latency_mode: i64,
    pub frame_limit_us: i64,
    /// Raw preset string; only single-character values are applied.
    pub upscaling_preset: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            debug_overlay: cfg!(feature = "debug_overlay"),
            latency_mode: 0,
            frame_limit_us: 0,
            upscaling_preset: "?".to_owned(),
        }
    }
}

impl ProjectSettings {
    /// Reads every Streamline setting, falling back to defaults for missing or mistyped values
    /// and clamping numeric values to their registered ranges.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            verbose_logging: read_bool(store, SETTING_VERBOSE_LOGGING)
                .unwrap_or(defaults.verbose_logging),
            debug_overlay: read_bool(store, SETTING_DEBUG_OVERLAY).unwrap_or(defaults.debug_overlay),
            latency_mode: read_int(store, SETTING_LATENCY_MODE)
                .unwrap_or(defaults.latency_mode)
                .clamp(0, MAX_LATENCY_MODE),
            frame_limit_us: read_int(store, SETTING_FRAME_LIMIT_US)
                .unwrap_or(defaults.frame_limit_us)
                .clamp(0, MAX_FRAME_LIMIT_US),
            upscaling_preset: read_string(store, SETTING_UPSCALING_PRESET)
                .unwrap_or(defaults.upscaling_preset),
        }
    }
}

fn read_bool(store: &dyn SettingsStore, key: &str) -> Option<bool> {
    match store.get(key)? {
        SettingValue::Bool(value) => Some(value),
        SettingValue::Int(value) => Some(value != 0),
        other => {
            log::warn!("Streamline: setting {key} expects a bool, got {other:?}");
            None
        }
    }
}

fn read_int(store: &dyn SettingsStore, key: &str) -> Option<i64> {
    match store.get(key)? {
        SettingValue::Int(value) => Some(value),
        SettingValue::Float(value) => Some(value as i64),
        other => {
            log::warn!("Streamline: setting {key} expects an integer, got {other:?}");
            None
        }
    }
}

fn read_string(store: &dyn SettingsStore, key: &str) -> Option<String> {
    match store.get(key)? {
        SettingValue::String(value) => Some(value),
        other => {
            log::warn!("Streamline: setting {key} expects a string, got {other:?}");
            None
        }
    }
}
