//! Colored rendering of configuration errors for terminals

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

/// Renders a [`ConfigError`] with colors when stderr is a terminal
pub struct ErrorFormatter<'a> {
    error: &'a ConfigError,
    use_colors: bool,
}

impl<'a> ErrorFormatter<'a> {
    pub fn new(error: &'a ConfigError) -> Self {
        Self {
            error,
            use_colors: supports_color(),
        }
    }

    pub fn format(&self) -> String {
        if self.use_colors {
            self.format_colored()
        } else {
            self.error.to_string()
        }
    }

    fn format_colored(&self) -> String {
        let cross = "✗".red().bold();
        match self.error {
            ConfigError::InvalidEnum {
                field,
                value,
                options,
                hint,
            } => format!(
                "{} Invalid value {} for {}\n  {}: {}\n  {}: {}",
                cross,
                format!("'{}'", value).yellow(),
                field.cyan(),
                "Valid options".bold(),
                options,
                "Hint".bold(),
                hint.green()
            ),
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => format!(
                "{} {} must be between {} and {}, got {}",
                cross,
                field.cyan(),
                min.green(),
                max.green(),
                value.red()
            ),
            ConfigError::InvalidInteger { field, value, min } => format!(
                "{} {} must be > {}, got {}",
                cross,
                field.cyan(),
                min.green(),
                value.red()
            ),
            ConfigError::ValidationError { field, message } => {
                format!("{} {}: {}", cross, field.cyan(), message)
            }
            ConfigError::FileNotFound { path } => format!(
                "{} Configuration file not found: {}",
                cross,
                path.display().to_string().yellow()
            ),
            other => format!("{} {}", cross, other),
        }
    }
}

/// NO_COLOR wins; otherwise color only when stderr is a TTY
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

impl fmt::Display for ErrorFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
