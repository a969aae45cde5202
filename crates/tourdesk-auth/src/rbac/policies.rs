//! Role-to-capability mapping definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tourdesk_core::error::AppError;
use tourdesk_entity::user::Role;

/// A single named boolean permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // Overview
    /// Open the dashboard.
    AccessDashboard,

    // Bookings
    /// View bookings.
    AccessBookings,
    /// Move bookings between statuses (confirm, cancel, complete).
    ManageBookingStatus,

    // Tours
    /// View the tour catalogue.
    AccessTours,
    /// Create tours.
    CreateTours,
    /// Edit tours.
    EditTours,
    /// Delete tours.
    DeleteTours,

    // Customers
    /// View customers.
    AccessCustomers,
    /// Edit customer records.
    ManageCustomers,

    // Visa desk
    /// View visa applications.
    AccessVisaApplications,
    /// Move visa applications between statuses.
    ManageVisaStatus,

    // Front office
    /// View customer inquiries.
    AccessInquiries,
    /// View and work internal tasks.
    AccessTasks,

    // Administration
    /// Open user management.
    AccessUserManagement,
    /// Change the role of an existing account.
    ManageUserRoles,
    /// Create staff accounts.
    RegisterUsers,
    /// Open platform settings.
    AccessSettings,
    /// Open reports.
    AccessReports,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 18] = [
        Self::AccessDashboard,
        Self::AccessBookings,
        Self::ManageBookingStatus,
        Self::AccessTours,
        Self::CreateTours,
        Self::EditTours,
        Self::DeleteTours,
        Self::AccessCustomers,
        Self::ManageCustomers,
        Self::AccessVisaApplications,
        Self::ManageVisaStatus,
        Self::AccessInquiries,
        Self::AccessTasks,
        Self::AccessUserManagement,
        Self::ManageUserRoles,
        Self::RegisterUsers,
        Self::AccessSettings,
        Self::AccessReports,
    ];

    /// Return the capability as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDashboard => "access_dashboard",
            Self::AccessBookings => "access_bookings",
            Self::ManageBookingStatus => "manage_booking_status",
            Self::AccessTours => "access_tours",
            Self::CreateTours => "create_tours",
            Self::EditTours => "edit_tours",
            Self::DeleteTours => "delete_tours",
            Self::AccessCustomers => "access_customers",
            Self::ManageCustomers => "manage_customers",
            Self::AccessVisaApplications => "access_visa_applications",
            Self::ManageVisaStatus => "manage_visa_status",
            Self::AccessInquiries => "access_inquiries",
            Self::AccessTasks => "access_tasks",
            Self::AccessUserManagement => "access_user_management",
            Self::ManageUserRoles => "manage_user_roles",
            Self::RegisterUsers => "register_users",
            Self::AccessSettings => "access_settings",
            Self::AccessReports => "access_reports",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AppError::validation(format!("Unknown capability: '{s}'")))
    }
}

/// The full capability record of one role. Every field is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub access_dashboard: bool,
    pub access_bookings: bool,
    pub manage_booking_status: bool,
    pub access_tours: bool,
    pub create_tours: bool,
    pub edit_tours: bool,
    pub delete_tours: bool,
    pub access_customers: bool,
    pub manage_customers: bool,
    pub access_visa_applications: bool,
    pub manage_visa_status: bool,
    pub access_inquiries: bool,
    pub access_tasks: bool,
    pub access_user_management: bool,
    pub manage_user_roles: bool,
    pub register_users: bool,
    pub access_settings: bool,
    pub access_reports: bool,
}

impl Capabilities {
    /// A record with every capability denied.
    pub const fn none() -> Self {
        Self {
            access_dashboard: false,
            access_bookings: false,
            manage_booking_status: false,
            access_tours: false,
            create_tours: false,
            edit_tours: false,
            delete_tours: false,
            access_customers: false,
            manage_customers: false,
            access_visa_applications: false,
            manage_visa_status: false,
            access_inquiries: false,
            access_tasks: false,
            access_user_management: false,
            manage_user_roles: false,
            register_users: false,
            access_settings: false,
            access_reports: false,
        }
    }

    /// A record with every capability granted.
    pub fn all() -> Self {
        Self::none().grant(&Capability::ALL)
    }

    /// Returns a copy with `capabilities` granted.
    pub fn grant(mut self, capabilities: &[Capability]) -> Self {
        for capability in capabilities {
            *self.field_mut(*capability) = true;
        }
        self
    }

    /// Returns a copy with `capabilities` denied.
    pub fn revoke(mut self, capabilities: &[Capability]) -> Self {
        for capability in capabilities {
            *self.field_mut(*capability) = false;
        }
        self
    }

    /// Look up a single capability.
    pub fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::AccessDashboard => self.access_dashboard,
            Capability::AccessBookings => self.access_bookings,
            Capability::ManageBookingStatus => self.manage_booking_status,
            Capability::AccessTours => self.access_tours,
            Capability::CreateTours => self.create_tours,
            Capability::EditTours => self.edit_tours,
            Capability::DeleteTours => self.delete_tours,
            Capability::AccessCustomers => self.access_customers,
            Capability::ManageCustomers => self.manage_customers,
            Capability::AccessVisaApplications => self.access_visa_applications,
            Capability::ManageVisaStatus => self.manage_visa_status,
            Capability::AccessInquiries => self.access_inquiries,
            Capability::AccessTasks => self.access_tasks,
            Capability::AccessUserManagement => self.access_user_management,
            Capability::ManageUserRoles => self.manage_user_roles,
            Capability::RegisterUsers => self.register_users,
            Capability::AccessSettings => self.access_settings,
            Capability::AccessReports => self.access_reports,
        }
    }

    /// The granted capabilities, in declaration order.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.get(*c))
            .collect()
    }

    fn field_mut(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::AccessDashboard => &mut self.access_dashboard,
            Capability::AccessBookings => &mut self.access_bookings,
            Capability::ManageBookingStatus => &mut self.manage_booking_status,
            Capability::AccessTours => &mut self.access_tours,
            Capability::CreateTours => &mut self.create_tours,
            Capability::EditTours => &mut self.edit_tours,
            Capability::DeleteTours => &mut self.delete_tours,
            Capability::AccessCustomers => &mut self.access_customers,
            Capability::ManageCustomers => &mut self.manage_customers,
            Capability::AccessVisaApplications => &mut self.access_visa_applications,
            Capability::ManageVisaStatus => &mut self.manage_visa_status,
            Capability::AccessInquiries => &mut self.access_inquiries,
            Capability::AccessTasks => &mut self.access_tasks,
            Capability::AccessUserManagement => &mut self.access_user_management,
            Capability::ManageUserRoles => &mut self.manage_user_roles,
            Capability::RegisterUsers => &mut self.register_users,
            Capability::AccessSettings => &mut self.access_settings,
            Capability::AccessReports => &mut self.access_reports,
        }
    }
}

/// The static Role → Capabilities table.
///
/// The match over [`Role`] has no wildcard arm, so a role added without a
/// matrix entry is rejected at compile time instead of silently defaulting.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// The full capability record of `role`.
    pub fn capabilities_for(role: Role) -> Capabilities {
        use Capability::*;

        match role {
            Role::SuperAdmin | Role::WebDeveloper => Capabilities::all(),
            Role::Administrator => Capabilities::all().revoke(&[AccessSettings]),
            Role::BookingDepartment => Capabilities::none().grant(&[
                AccessDashboard,
                AccessBookings,
                ManageBookingStatus,
                AccessTours,
                AccessCustomers,
                AccessInquiries,
                AccessTasks,
            ]),
            Role::VisaDepartment => Capabilities::none().grant(&[
                AccessDashboard,
                AccessVisaApplications,
                ManageVisaStatus,
                AccessCustomers,
                AccessTasks,
            ]),
            Role::CustomerServiceRepresentative => Capabilities::none().grant(&[
                AccessDashboard,
                AccessBookings,
                AccessTours,
                AccessCustomers,
                ManageCustomers,
                AccessInquiries,
                AccessTasks,
            ]),
        }
    }

    /// Checks whether `role` holds `capability`.
    pub fn has_capability(role: Role, capability: Capability) -> bool {
        Self::capabilities_for(role).get(capability)
    }

    /// Roles holding `capability`.
    pub fn roles_with(capability: Capability) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| Self::has_capability(*role, capability))
            .collect()
    }
}
