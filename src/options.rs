use crate::sl;

/// Reflex low latency mode.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LatencyMode {
    #[default]
    Off,
    LowLatency,
    LowLatencyWithBoost,
}

impl LatencyMode {
    /// Resolves a numeric level: `<= 0` is off, `(0, 1]` is low latency, `> 1` adds boost.
    pub fn from_level(level: f64) -> Self {
        if level > 1.0 {
            LatencyMode::LowLatencyWithBoost
        } else if level > 0.0 {
            LatencyMode::LowLatency
        } else {
            LatencyMode::Off
        }
    }

    fn as_sl(self) -> sl::ReflexMode {
        match self {
            LatencyMode::Off => sl::ReflexMode::OFF,
            LatencyMode::LowLatency => sl::ReflexMode::LOW_LATENCY,
            LatencyMode::LowLatencyWithBoost => sl::ReflexMode::LOW_LATENCY_WITH_BOOST,
        }
    }
}

/// Hot key the driver watches to measure PC latency.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MarkerHotKey {
    UsePingMessage,
    #[default]
    F13,
    F14,
    F15,
}

impl MarkerHotKey {
    fn as_sl(self) -> sl::PCLHotKey {
        match self {
            MarkerHotKey::UsePingMessage => sl::PCLHotKey::USE_PING_MESSAGE,
            MarkerHotKey::F13 => sl::PCLHotKey::VK_F13,
            MarkerHotKey::F14 => sl::PCLHotKey::VK_F14,
            MarkerHotKey::F15 => sl::PCLHotKey::VK_F15,
        }
    }
}

/// Reflex options snapshot.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LatencyOptions {
    pub mode: LatencyMode,
    /// Frame time cap in microseconds, `0` for uncapped.
    pub frame_limit_us: u32,
    pub virtual_key: MarkerHotKey,
    pub use_markers_to_optimize: bool,
    pub thread_id: u32,
}

impl LatencyOptions {
    /// Whether the frame loop has to call the Reflex sleep.
    pub fn needs_sleep(&self) -> bool {
        self.mode != LatencyMode::Off || self.frame_limit_us > 0
    }

    pub(crate) fn to_sl(self) -> sl::ReflexOptions {
        sl::ReflexOptions {
            mode: self.mode.as_sl(),
            frame_limit_us: self.frame_limit_us,
            use_markers_to_optimize: self.use_markers_to_optimize,
            virtual_key: self.virtual_key.as_sl().0,
            id_thread: self.thread_id,
            ..sl::ReflexOptions::default()
        }
    }
}

/// PC Latency options snapshot.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct MarkerOptions {
    pub virtual_key: MarkerHotKey,
    pub thread_id: u32,
}

impl MarkerOptions {
    pub(crate) fn to_sl(self) -> sl::PCLOptions {
        sl::PCLOptions {
            virtual_key: self.virtual_key.as_sl(),
            id_thread: self.thread_id,
            ..sl::PCLOptions::default()
        }
    }
}

/// PC Latency marker kinds emitted per frame.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PipelineMarker {
    SimulationStart,
    SimulationEnd,
    RenderSubmitStart,
    RenderSubmitEnd,
    PresentStart,
    PresentEnd,
    Ping,
}

impl PipelineMarker {
    pub(crate) fn as_sl(self) -> sl::PCLMarker {
        match self {
            PipelineMarker::SimulationStart => sl::PCLMarker::SIMULATION_START,
            PipelineMarker::SimulationEnd => sl::PCLMarker::SIMULATION_END,
            PipelineMarker::RenderSubmitStart => sl::PCLMarker::RENDER_SUBMIT_START,
            PipelineMarker::RenderSubmitEnd => sl::PCLMarker::RENDER_SUBMIT_END,
            PipelineMarker::PresentStart => sl::PCLMarker::PRESENT_START,
            PipelineMarker::PresentEnd => sl::PCLMarker::PRESENT_END,
            PipelineMarker::Ping => sl::PCLMarker::PC_LATENCY_PING,
        }
    }
}

/// DLSS preset the host renderer should use.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum UpscalingPreset {
    /// Let DLSS pick, stored as `?`.
    #[default]
    Default,
    A,
    B,
    C,
    D,
    E,
    F,
    J,
    K,
}

impl UpscalingPreset {
    /// Preset codes accepted by the `dlss_preset` setting.
    pub const CODES: [char; 9] = ['?', 'A', 'B', 'C', 'D', 'E', 'F', 'J', 'K'];

    pub fn from_code(code: char) -> Option<Self> {
        Some(match code.to_ascii_uppercase() {
            '?' => UpscalingPreset::Default,
            'A' => UpscalingPreset::A,
            'B' => UpscalingPreset::B,
            'C' => UpscalingPreset::C,
            'D' => UpscalingPreset::D,
            'E' => UpscalingPreset::E,
            'F' => UpscalingPreset::F,
            'J' => UpscalingPreset::J,
            'K' => UpscalingPreset::K,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            UpscalingPreset::Default => '?',
            UpscalingPreset::A => 'A',
            UpscalingPreset::B => 'B',
            UpscalingPreset::C => 'C',
            UpscalingPreset::D => 'D',
            UpscalingPreset::E => 'E',
            UpscalingPreset::F => 'F',
            UpscalingPreset::J => 'J',
            UpscalingPreset::K => 'K',
        }
    }
}

/// Per-frame timing report from Reflex, timestamps in microseconds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FrameReport {
    pub frame_id: u64,
    pub input_sample_time: u64,
    pub sim_start_time: u64,
    pub sim_end_time: u64,
    pub render_submit_start_time: u64,
    pub render_submit_end_time: u64,
    pub present_start_time: u64,
    pub present_end_time: u64,
    pub driver_start_time: u64,
    pub driver_end_time: u64,
    pub os_render_queue_start_time: u64,
    pub os_render_queue_end_time: u64,
    pub gpu_render_start_time: u64,
    pub gpu_render_end_time: u64,
    pub gpu_active_render_time_us: u32,
    pub gpu_frame_time_us: u32,
}

impl FrameReport {
    /// Simulation start to present end.
    pub fn pc_latency_us(&self) -> u64 {
        self.present_end_time.saturating_sub(self.sim_start_time)
    }
}

/// Reflex state as reported by the SDK.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LatencyState {
    pub low_latency_available: bool,
    pub latency_report_available: bool,
    pub flash_indicator_driver_controlled: bool,
    /// Reports with a nonzero frame id, oldest first as delivered.
    pub frame_reports: Vec<FrameReport>,
    pub stats_window_message: u32,
}

impl From<&sl::ReflexState> for LatencyState {
    fn from(state: &sl::ReflexState) -> Self {
        Self {
            low_latency_available: state.low_latency_available,
            latency_report_available: state.latency_report_available,
            flash_indicator_driver_controlled: state.flash_indicator_driver_controlled,
            frame_reports: state
                .frame_report
                .iter()
                .filter(|report| report.frame_id != 0)
                .map(|report| FrameReport {
                    frame_id: report.frame_id,
                    input_sample_time: report.input_sample_time,
                    sim_start_time: report.sim_start_time,
                    sim_end_time: report.sim_end_time,
                    render_submit_start_time: report.render_submit_start_time,
                    render_submit_end_time: report.render_submit_end_time,
                    present_start_time: report.present_start_time,
                    present_end_time: report.present_end_time,
                    driver_start_time: report.driver_start_time,
                    driver_end_time: report.driver_end_time,
                    os_render_queue_start_time: report.os_render_queue_start_time,
                    os_render_queue_end_time: report.os_render_queue_end_time,
                    gpu_render_start_time: report.gpu_render_start_time,
                    gpu_render_end_time: report.gpu_render_end_time,
                    gpu_active_render_time_us: report.gpu_active_render_time_us,
                    gpu_frame_time_us: report.gpu_frame_time_us,
                })
                .collect(),
            stats_window_message: state.stats_window_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_level_thresholds() {
        assert_eq!(LatencyMode::from_level(-1.0), LatencyMode::Off);
        assert_eq!(LatencyMode::from_level(0.0), LatencyMode::Off);
        assert_eq!(LatencyMode::from_level(0.5), LatencyMode::LowLatency);
        assert_eq!(LatencyMode::from_level(1.0), LatencyMode::LowLatency);
        assert_eq!(LatencyMode::from_level(2.0), LatencyMode::LowLatencyWithBoost);
    }

    #[test]
    fn sleep_is_needed_for_mode_or_frame_cap() {
        let mut options = LatencyOptions::default();
        assert!(!options.needs_sleep());

        options.frame_limit_us = 16_666;
        assert!(options.needs_sleep());

        options.frame_limit_us = 0;
        options.mode = LatencyMode::LowLatency;
        assert!(options.needs_sleep());
    }

    #[test]
    fn latency_options_convert_to_sl() {
        let options = LatencyOptions {
            mode: LatencyMode::LowLatencyWithBoost,
            frame_limit_us: 5000,
            ..LatencyOptions::default()
        };
        let raw = options.to_sl();
        assert_eq!(raw.mode, sl::ReflexMode::LOW_LATENCY_WITH_BOOST);
        assert_eq!(raw.frame_limit_us, 5000);
        assert_eq!(raw.virtual_key, sl::PCLHotKey::VK_F13.0);
        assert_eq!(raw.base.struct_type, sl::REFLEX_OPTIONS_TYPE);
    }

    #[test]
    fn preset_codes() {
        for code in UpscalingPreset::CODES {
            assert_eq!(UpscalingPreset::from_code(code).map(UpscalingPreset::code), Some(code));
        }
        assert_eq!(UpscalingPreset::from_code('b'), Some(UpscalingPreset::B));
        assert_eq!(UpscalingPreset::from_code('G'), None);
    }

    #[test]
    fn latency_state_skips_empty_reports() {
        let mut raw = sl::ReflexState::default();
        raw.low_latency_available = true;
        raw.frame_report[3].frame_id = 42;
        raw.frame_report[3].sim_start_time = 1_000;
        raw.frame_report[3].present_end_time = 9_000;

        let state = LatencyState::from(&raw);
        assert!(state.low_latency_available);
        assert_eq!(state.frame_reports.len(), 1);
        assert_eq!(state.frame_reports[0].frame_id, 42);
        assert_eq!(state.frame_reports[0].pc_latency_us(), 8_000);
    }
}
