pub mod activation;
pub mod error;
pub mod host;
pub mod mover;
pub mod scale;
pub mod selection;
pub mod session;
pub mod settings;
pub mod view;

pub const TOOL_NAME: &str = "push_pull";
pub const SETTINGS_PATH: &str = "config/pushpull.ron";
pub const DEFAULT_SENSITIVITY: f32 = 0.005;
pub const DEFAULT_ORTHO_SPEED: f32 = 2.0;
