use chrono::NaiveTime;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub leave: LeaveConfig,
    pub attendance: AttendanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC secret for signing tokens. Empty means token issuance fails;
    /// production deployments must set JWT_SECRET.
    pub jwt_secret: String,
    pub access_token_ttl_mins: u64,
    pub refresh_token_ttl_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveConfig {
    /// Per-type cumulative caps in days.
    pub casual_cap_days: i64,
    pub sick_cap_days: i64,
    /// Yearly allowance backing the remaining_leaves counter.
    pub annual_allowance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Check-ins strictly after this time of day are flagged late.
    pub office_start: NaiveTime,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_TTL_MINS") {
            self.security.access_token_ttl_mins = v.parse().unwrap_or(self.security.access_token_ttl_mins);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_TTL_DAYS") {
            self.security.refresh_token_ttl_days = v.parse().unwrap_or(self.security.refresh_token_ttl_days);
        }

        // Leave quota overrides
        if let Ok(v) = env::var("LEAVE_CASUAL_CAP_DAYS") {
            self.leave.casual_cap_days = v.parse().unwrap_or(self.leave.casual_cap_days);
        }
        if let Ok(v) = env::var("LEAVE_SICK_CAP_DAYS") {
            self.leave.sick_cap_days = v.parse().unwrap_or(self.leave.sick_cap_days);
        }
        if let Ok(v) = env::var("LEAVE_ANNUAL_ALLOWANCE") {
            self.leave.annual_allowance = v.parse().unwrap_or(self.leave.annual_allowance);
        }

        // Attendance overrides, e.g. ATTENDANCE_OFFICE_START=11:30
        if let Ok(v) = env::var("ATTENDANCE_OFFICE_START") {
            if let Ok(t) = NaiveTime::parse_from_str(&v, "%H:%M") {
                self.attendance.office_start = t;
            }
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "crew-dev-secret-change-me".to_string(),
                access_token_ttl_mins: 60,
                refresh_token_ttl_days: 7,
            },
            leave: LeaveConfig {
                casual_cap_days: 10,
                sick_cap_days: 10,
                annual_allowance: 20,
            },
            attendance: AttendanceConfig {
                office_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_ttl_mins: 30,
                refresh_token_ttl_days: 7,
            },
            leave: LeaveConfig {
                casual_cap_days: 10,
                sick_cap_days: 10,
                annual_allowance: 20,
            },
            attendance: AttendanceConfig {
                office_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_ttl_mins: 15,
                refresh_token_ttl_days: 7,
            },
            leave: LeaveConfig {
                casual_cap_days: 10,
                sick_cap_days: 10,
                annual_allowance: 20,
            },
            attendance: AttendanceConfig {
                office_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.leave.casual_cap_days, 10);
        assert_eq!(config.leave.annual_allowance, 20);
        assert_eq!(config.attendance.office_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_has_no_baked_in_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.access_token_ttl_mins, 15);
    }

    #[test]
    fn office_start_parses_from_hh_mm() {
        let t = NaiveTime::parse_from_str("11:30", "%H:%M").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
    }
}
