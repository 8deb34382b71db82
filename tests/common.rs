use std::path::{Path, PathBuf};
use std::sync::Once;

use portcat::AppInstance;

static START: Once = Once::new();

/// Initialise logging once for the test binary
pub fn setup() {
    START.call_once(|| {
        // ignore failures if another test binary already set a logger
        let _ = loggerv::Logger::new().verbosity(1).module_path(true).init();
    });
}

/// Path to one of the fake apps in tests/apps
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("apps").join(format!("{}.yml", name))
}

pub fn load(name: &str) -> AppInstance {
    setup();
    AppInstance::read(&fixture(name)).unwrap() // better to unwrap and get full trace
}
