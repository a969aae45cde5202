//! Session lifecycle configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token lifetime, background refresh, and idle-monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of an access token, and the span every activity extension grants.
    #[serde(default = "default_access_lifetime")]
    pub access_lifetime_minutes: u64,
    /// Hard ceiling on optimistic extensions, counted from login.
    #[serde(default = "default_absolute_lifetime")]
    pub absolute_lifetime_hours: u64,
    /// Interval of the silent background refresh. Must be shorter than the
    /// access lifetime.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u64,
    /// Interval of the idle monitor's remaining-time check.
    #[serde(default = "default_check_interval")]
    pub activity_check_interval_seconds: u64,
    /// Remaining time below which the expiration warning is raised.
    #[serde(default = "default_warning_window")]
    pub warning_window_minutes: u64,
}

impl SessionConfig {
    /// Access token lifetime.
    pub fn access_lifetime(&self) -> Duration {
        Duration::from_secs(self.access_lifetime_minutes.saturating_mul(60))
    }

    /// Absolute ceiling for optimistic extensions.
    pub fn absolute_lifetime(&self) -> Duration {
        Duration::from_secs(self.absolute_lifetime_hours.saturating_mul(3600))
    }

    /// Background refresh period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_minutes.saturating_mul(60))
    }

    /// Idle monitor check period.
    pub fn activity_check_interval(&self) -> Duration {
        Duration::from_secs(self.activity_check_interval_seconds)
    }

    /// Expiration warning window.
    pub fn warning_window(&self) -> Duration {
        Duration::from_secs(self.warning_window_minutes.saturating_mul(60))
    }

    /// Rejects combinations that would let the token lapse between refreshes,
    /// keep the expiry warning up for the whole session, or make the timers
    /// spin.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_lifetime_minutes == 0 {
            return Err(AppError::configuration(
                "session.access_lifetime_minutes must be positive",
            ));
        }
        if self.refresh_interval_minutes == 0
            || self.refresh_interval_minutes >= self.access_lifetime_minutes
        {
            return Err(AppError::configuration(format!(
                "session.refresh_interval_minutes ({}) must be positive and shorter than the access lifetime ({})",
                self.refresh_interval_minutes, self.access_lifetime_minutes
            )));
        }
        if self.warning_window_minutes >= self.access_lifetime_minutes {
            return Err(AppError::configuration(format!(
                "session.warning_window_minutes ({}) must be shorter than the access lifetime ({})",
                self.warning_window_minutes, self.access_lifetime_minutes
            )));
        }
        if self.activity_check_interval_seconds == 0 {
            return Err(AppError::configuration(
                "session.activity_check_interval_seconds must be positive",
            ));
        }
        if self.absolute_lifetime() < self.access_lifetime() {
            return Err(AppError::configuration(
                "session.absolute_lifetime_hours must cover at least one access lifetime",
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_lifetime_minutes: default_access_lifetime(),
            absolute_lifetime_hours: default_absolute_lifetime(),
            refresh_interval_minutes: default_refresh_interval(),
            activity_check_interval_seconds: default_check_interval(),
            warning_window_minutes: default_warning_window(),
        }
    }
}

fn default_access_lifetime() -> u64 {
    60
}

fn default_absolute_lifetime() -> u64 {
    12
}

fn default_refresh_interval() -> u64 {
    50
}

fn default_check_interval() -> u64 {
    60
}

fn default_warning_window() -> u64 {
    5
}
