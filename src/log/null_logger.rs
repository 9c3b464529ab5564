//! Without the `logging` feature no logger is installed. The configuration is still tracked so
//! the public API behaves the same, and `log::max_level` is kept in sync so disabled messages
//! cost nothing.

use crate::log::LogConfiguration;

impl LogConfiguration {
    pub(in crate::log) fn set_config(&mut self) {
        log::set_max_level(self.global_log_level);
    }
}
