//! Engine configuration
//!
//! All knobs can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DEFAULT_DEPARTMENT | KITCHEN | Destination for unmapped categories |
//! | LINGERING_MINUTES | 5 | How long finished orders stay visible |
//! | DELAY_WARNING_MINUTES | 15 | Elapsed minutes before warning band |
//! | DELAY_CRITICAL_MINUTES | 25 | Elapsed minutes before critical band |
//! | PRINT_ENABLED | false | Trigger the print collaborator on new tickets |
//! | LOG_LEVEL | info | Tracing level |
//! | LOG_DIR | (none) | Optional daily-rolling log directory |

use shared::menu::Department;
use shared::settings::DepartmentSettings;

#[derive(Debug, Clone)]
pub struct Config {
    /// Destination for categories with no explicit mapping
    pub default_department: Department,
    /// Lingering window after Delivered / department-cleared (minutes)
    pub lingering_minutes: i64,
    /// Elapsed minutes at which an order enters the warning band
    pub delay_warning_minutes: i64,
    /// Elapsed minutes at which an order enters the critical band
    pub delay_critical_minutes: i64,
    /// Whether new tickets trigger the print collaborator
    pub print_enabled: bool,
    /// Tracing level: trace | debug | info | warn | error
    pub log_level: String,
    /// Optional log directory for daily-rolling file output
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, using defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        // Best-effort: a missing .env file is not an error.
        let _ = dotenv::dotenv();

        Self {
            default_department: std::env::var("DEFAULT_DEPARTMENT")
                .ok()
                .and_then(|v| serde_json::from_str(&format!("\"{}\"", v.to_uppercase())).ok())
                .unwrap_or(Department::Kitchen),
            lingering_minutes: env_i64("LINGERING_MINUTES", 5),
            delay_warning_minutes: env_i64("DELAY_WARNING_MINUTES", 15),
            delay_critical_minutes: env_i64("DELAY_CRITICAL_MINUTES", 25),
            print_enabled: std::env::var("PRINT_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    pub fn lingering_millis(&self) -> i64 {
        self.lingering_minutes * 60_000
    }

    /// Seed routing settings from the environment-driven knobs. Later
    /// changes arrive through the settings provider, not through here.
    pub fn department_settings(&self) -> DepartmentSettings {
        DepartmentSettings {
            default_department: self.default_department,
            print_enabled: self.print_enabled,
            ..DepartmentSettings::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_department: Department::Kitchen,
            lingering_minutes: 5,
            delay_warning_minutes: 15,
            delay_critical_minutes: 25,
            print_enabled: false,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
