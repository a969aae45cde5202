//! Role and department enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles assigned to staff accounts.
///
/// A role is fixed when the account is created; only a caller holding the
/// role-management capability may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted operator of the platform.
    SuperAdmin,
    /// Agency administrator.
    Administrator,
    /// Maintains the website and the platform itself.
    WebDeveloper,
    /// Handles tour bookings.
    BookingDepartment,
    /// Handles visa applications.
    VisaDepartment,
    /// Front-line customer support.
    CustomerServiceRepresentative,
}

impl Role {
    /// Every role, in privilege order.
    pub const ALL: [Role; 6] = [
        Self::SuperAdmin,
        Self::Administrator,
        Self::WebDeveloper,
        Self::BookingDepartment,
        Self::VisaDepartment,
        Self::CustomerServiceRepresentative,
    ];

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Administrator => "administrator",
            Self::WebDeveloper => "web_developer",
            Self::BookingDepartment => "booking_department",
            Self::VisaDepartment => "visa_department",
            Self::CustomerServiceRepresentative => "customer_service_representative",
        }
    }

    /// Human-readable role name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Administrator => "Administrator",
            Self::WebDeveloper => "Web Developer",
            Self::BookingDepartment => "Booking Department",
            Self::VisaDepartment => "Visa Department",
            Self::CustomerServiceRepresentative => "Customer Service Representative",
        }
    }

    /// The department label derived from this role.
    pub fn department(&self) -> Department {
        match self {
            Self::SuperAdmin | Self::Administrator => Department::Management,
            Self::WebDeveloper => Department::Technology,
            Self::BookingDepartment => Department::Bookings,
            Self::VisaDepartment => Department::Visa,
            Self::CustomerServiceRepresentative => Department::CustomerService,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = tourdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "super_admin" => Ok(Self::SuperAdmin),
            "administrator" => Ok(Self::Administrator),
            "web_developer" => Ok(Self::WebDeveloper),
            "booking_department" => Ok(Self::BookingDepartment),
            "visa_department" => Ok(Self::VisaDepartment),
            "customer_service_representative" => Ok(Self::CustomerServiceRepresentative),
            _ => Err(tourdesk_core::AppError::validation(format!(
                "Invalid role: '{s}'"
            ))),
        }
    }
}

/// Department label shown alongside a user, derived from the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Agency management.
    Management,
    /// Web and platform engineering.
    Technology,
    /// Booking desk.
    Bookings,
    /// Visa desk.
    Visa,
    /// Customer service desk.
    CustomerService,
}

impl Department {
    /// Human-readable department label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Management => "Management",
            Self::Technology => "Technology",
            Self::Bookings => "Bookings",
            Self::Visa => "Visa",
            Self::CustomerService => "Customer Service",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
