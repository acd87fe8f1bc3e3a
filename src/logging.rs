//! Developer console logging.

use hoverzoom_core::LogLevel;

/// Route the `log` facade to the browser console.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init(level: LogLevel) {
    let Some(level) = level.to_level_filter().to_level() else {
        log::set_max_level(log::LevelFilter::Off);
        return;
    };
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}
