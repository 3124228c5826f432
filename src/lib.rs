pub mod push_pull;
pub mod replay;
pub mod scene;
pub mod viewport;

pub use push_pull::activation::PushPullTool;
pub use push_pull::host::SceneHost;
pub use push_pull::settings::PushPullSettings;
