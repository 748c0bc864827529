//! Bounded activity log attached to every company.
//!
//! The log is a most-recent-first list of human-readable lines, each
//! prefixed with a UTC `[HH:MM:SS]` stamp. It never holds more than
//! [`LOG_CAPACITY`] entries; older lines fall off the end.

use chrono::DateTime;

use crate::company::Company;

/// Maximum number of lines kept in a company's log.
pub const LOG_CAPACITY: usize = 20;

/// Format a log line stamped with the wall-clock time of `now_ms`.
pub fn format_entry(now_ms: i64, text: &str) -> String {
    DateTime::from_timestamp_millis(now_ms).map_or_else(
        || format!("[--:--:--] {text}"),
        |at| format!("[{}] {text}", at.format("%H:%M:%S")),
    )
}

/// Insert a line at the front of `log` and drop anything past capacity.
pub fn push_entry(log: &mut Vec<String>, now_ms: i64, text: &str) {
    log.insert(0, format_entry(now_ms, text));
    log.truncate(LOG_CAPACITY);
}

impl Company {
    /// Append a stamped line to the front of this company's log.
    pub fn push_log(&mut self, now_ms: i64, text: &str) {
        push_entry(&mut self.log, now_ms, text);
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_time_stamped() {
        // 1970-01-01T01:02:03Z
        let line = format_entry(3_723_000, "hello");
        assert_eq!(line, "[01:02:03] hello");
    }

    #[test]
    fn newest_entry_is_first() {
        let mut log = Vec::new();
        push_entry(&mut log, 0, "first");
        push_entry(&mut log, 1_000, "second");
        assert_eq!(log.len(), 2);
        assert!(log[0].ends_with("second"));
        assert!(log[1].ends_with("first"));
    }

    #[test]
    fn log_is_bounded() {
        let mut company = Company::base("ann");
        for i in 0..50 {
            company.push_log(0, &format!("line {i}"));
        }
        assert_eq!(company.log.len(), LOG_CAPACITY);
        assert!(company.log[0].ends_with("line 49"));
        assert!(company.log[LOG_CAPACITY - 1].ends_with("line 30"));
    }
}
