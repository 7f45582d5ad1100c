use crate::clock::FpsCounter;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Enable debug mode
    pub debug: bool,
    /// Show the control instructions
    pub show_help: bool,
    /// Frames per second over the last second
    pub fps: FpsCounter,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            debug: false,
            show_help: true,
            fps: FpsCounter::new(),
        }
    }
}
