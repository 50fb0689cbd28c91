use ratatui::style::Color;

use crate::JobState;

/// Color for anything the tables do not know
pub const DEFAULT_COLOR: Color = Color::Reset;

const ORANGE: Color = Color::Rgb(0xFF, 0xA5, 0x00);
const DODGER_BLUE: Color = Color::Rgb(0x1E, 0x90, 0xFF);
const PURPLE: Color = Color::Rgb(0x80, 0x00, 0x80);

/// Color for a job state
pub fn job_state_color(state: &JobState) -> Color {
    match state {
        JobState::Successful => Color::Green,
        JobState::Faulted => Color::Red,
        JobState::Stopped => ORANGE,
        _ => DEFAULT_COLOR,
    }
}

/// Color for a log level, keyed by its wire name
pub fn log_level_color(level: &str) -> Color {
    match level {
        "Fatal" => PURPLE,
        "Error" => Color::Red,
        "Warn" => ORANGE,
        "Info" => DODGER_BLUE,
        "Debug" => Color::Green,
        "Trace" => Color::DarkGray,
        "Verbose" => Color::Gray,
        _ => DEFAULT_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogLevel;

    #[test]
    fn test_unknown_inputs_use_default() {
        assert_eq!(log_level_color("Notice"), DEFAULT_COLOR);
        assert_eq!(log_level_color(""), DEFAULT_COLOR);
        assert_eq!(
            job_state_color(&JobState::Other("Suspended".into())),
            DEFAULT_COLOR
        );
        assert_eq!(job_state_color(&JobState::Running), DEFAULT_COLOR);
    }

    #[test]
    fn test_known_levels_are_colored() {
        for level in LogLevel::ALL {
            assert_ne!(level.color(), DEFAULT_COLOR, "{level} has no color");
        }
        assert_eq!(JobState::Faulted.color(), Color::Red);
        assert_eq!(JobState::Successful.color(), Color::Green);
    }
}
