mod app;

use splash_engine::device::GpuInit;
use splash_engine::logging::{LoggingConfig, init_logging};
use splash_engine::window::{Runtime, RuntimeConfig};

use app::SplashApp;

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Splash".to_string(),
        size: None,
    };

    // Startup and media failures are logged, never turned into a nonzero
    // exit: on a machine without a usable GPU this quits cleanly.
    if let Err(e) = Runtime::run(config, GpuInit::default(), SplashApp::new()) {
        log::error!("runtime error: {e:#}");
    }
}
