//! Elapsed-time formatting

use std::time::Duration;

/// Format a duration as `Xh Ym Z.ZZs`
#[must_use]
pub fn format_execution_time(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total - hours * 3600.0 - minutes * 60.0;
    format!("{}h {}m {seconds:.2}s", hours as u64, minutes as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_execution_time() {
        assert_eq!(format_execution_time(Duration::from_millis(1_250)), "0h 0m 1.25s");
        assert_eq!(format_execution_time(Duration::from_secs(3_725)), "1h 2m 5.00s");
        assert_eq!(format_execution_time(Duration::ZERO), "0h 0m 0.00s");
    }
}
