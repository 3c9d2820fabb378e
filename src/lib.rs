pub mod assets;
pub mod config;
pub mod fireflies;
pub mod graphics;
pub mod logging;
pub mod math;
pub mod render_thread;
pub mod timing;
