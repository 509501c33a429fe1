//! Harvest resource models.
//!
//! Each model declares its envelope name and id accessors; the toggleable
//! ones also expose their active flag. Optional fields are left out of
//! request bodies when unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{ShortDate, Timeframe};
use crate::{Resource, Toggle};

fn is_zero(id: &u64) -> bool {
    *id == 0
}

macro_rules! resource {
    ($type:ty, $name:literal) => {
        impl Resource for $type {
            const NAME: &'static str = $name;

            fn id(&self) -> u64 {
                self.id
            }

            fn set_id(&mut self, id: u64) {
                self.id = id;
            }
        }
    };
}

macro_rules! toggle {
    ($type:ty, $flag:ident) => {
        impl Toggle for $type {
            fn is_active(&self) -> bool {
                self.$flag
            }

            fn toggle_active(&mut self) -> bool {
                self.$flag = !self.$flag;
                self.$flag
            }
        }
    };
}

/// A person with access to the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub has_access_to_all_future_projects: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

resource!(User, "user");
toggle!(User, is_active);

/// A project tracked for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub client_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub billable: bool,
    /// `Tasks`, `People` or `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_by: Option<String>,
    /// `project`, `project_cost`, `task`, `person` or `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub hint_earliest_record_at: ShortDate,
    #[serde(default)]
    pub hint_latest_record_at: ShortDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

resource!(Project, "project");
toggle!(Project, active);

/// A customer projects and invoices belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub default_invoice_timeframe: Timeframe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

resource!(Client, "client");
toggle!(Client, active);

/// A kind of work time is tracked against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub billable_by_default: bool,
    #[serde(default)]
    pub deactivated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(default)]
    pub is_default: bool,
}

resource!(Task, "task");

/// A bill sent to a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub client_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// One of the states listed by [`InvoiceStatus`](crate::InvoiceStatus).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub issued_at: ShortDate,
    #[serde(default)]
    pub due_at: ShortDate,
    #[serde(default)]
    pub period_start: ShortDate,
    #[serde(default)]
    pub period_end: ShortDate,
}

resource!(Invoice, "invoice");

/// Time tracked by one user on one task of one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub project_id: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub task_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub spent_at: ShortDate,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_billed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

resource!(DayEntry, "dayentry");

/// A task made available on one project, with its per-project billing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(rename = "task-id", default, skip_serializing_if = "is_zero")]
    pub task_id: u64,
    #[serde(rename = "project-id", default, skip_serializing_if = "is_zero")]
    pub project_id: u64,
    #[serde(default)]
    pub billable: bool,
    /// No more hours can be logged against the task on this project.
    #[serde(default)]
    pub deactivated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(rename = "hourly-rate", default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

resource!(TaskAssignment, "task-assignment");

/// The authenticated user and the company they belong to, as returned by
/// `account/who_am_i`. Not a resource: the body is not enveloped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Account-wide settings of a Harvest company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub base_uri: String,
    #[serde(default)]
    pub full_domain: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    /// `Sunday`, `Saturday` or `Monday`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start_day: Option<String>,
    /// `decimal` or `hours_minutes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    /// `12h` or `24h`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thousands_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Modules>,
}

/// Optional product modules enabled for a company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modules {
    #[serde(default)]
    pub expenses: bool,
    #[serde(default)]
    pub invoices: bool,
    #[serde(default)]
    pub estimates: bool,
    #[serde(default)]
    pub approval: bool,
}
