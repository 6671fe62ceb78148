use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use dps_common::Dollars;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

//--------------------------------------        Role        ----------------------------------------------------------
/// The application-side privilege level of a logged-in user.
///
/// Roles are derived afresh at every login from the user's provider-side group memberships (see
/// [`crate::roles`]) and are carried in the bearer credential only; they are never persisted.
/// Variants are declared in ascending order of privilege so that the derived ordering can be used
/// for comparisons. `Owner` and `Manager` are the only admin roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Member,
    Customer,
    Manager,
    Owner,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Manager)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Guest => write!(f, "guest"),
            Role::Member => write!(f, "member"),
            Role::Customer => write!(f, "customer"),
            Role::Manager => write!(f, "manager"),
            Role::Owner => write!(f, "owner"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleConversionError(String);

impl FromStr for Role {
    type Err = RoleConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Self::Guest),
            "member" => Ok(Self::Member),
            "customer" => Ok(Self::Customer),
            "manager" => Ok(Self::Manager),
            "owner" => Ok(Self::Owner),
            s => Err(RoleConversionError(s.to_string())),
        }
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// The order fulfilment state machine.
///
/// `Pending` is the initial state of every submitted order. Admins move orders to `Approved` or
/// `Rejected`, and approved orders on to `Delivered`. Legal transitions are checked by
/// [`OrderStatusType::is_valid_transition`]; the SQL layer itself only validates membership in the
/// enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order is newly submitted and awaiting review.
    Pending,
    /// An admin has approved the order.
    Approved,
    /// An admin has rejected the order.
    Rejected,
    /// The vehicle has been handed over. Terminal.
    Delivered,
}

impl OrderStatusType {
    /// Whether moving an order from `self` to `to` is a legal transition.
    ///
    /// Setting the same status again is a permitted no-op, and admins may move `Approved` or
    /// `Rejected` orders back to `Pending` to undo a review decision. `Delivered` is terminal.
    pub fn is_valid_transition(&self, to: OrderStatusType) -> bool {
        use OrderStatusType::*;
        match (self, to) {
            (a, b) if *a == b => true,
            (Pending, Approved) | (Pending, Rejected) => true,
            (Approved, Delivered) => true,
            (Approved, Pending) | (Rejected, Pending) => true,
            _ => false,
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Approved => write!(f, "approved"),
            OrderStatusType::Rejected => write!(f, "rejected"),
            OrderStatusType::Delivered => write!(f, "delivered"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "delivered" => Ok(Self::Delivered),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// The provider-side identity id of the customer who placed the order.
    pub discord_id: String,
    pub customer_name: String,
    pub vehicle_id: i64,
    pub vehicle_name: String,
    pub price: Dollars,
    pub primary_color: String,
    pub secondary_color: String,
    pub pearl_color: String,
    pub special_requests: Option<String>,
    pub payment_method: String,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The identity id of the admin that last moved the order out of `Pending`.
    pub approved_by: Option<String>,
}

//--------------------------------------       NewOrder       --------------------------------------------------------
/// The insert shape for a new order. Orders always enter the book as `Pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub discord_id: String,
    pub customer_name: String,
    pub vehicle_id: i64,
    pub vehicle_name: String,
    pub price: Dollars,
    pub primary_color: String,
    pub secondary_color: String,
    pub pearl_color: String,
    pub special_requests: Option<String>,
    pub payment_method: String,
}

//--------------------------------------    OrderWithOwner    --------------------------------------------------------
/// An order joined with the summary of the user that placed it, for the admin order board.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

//--------------------------------------       Vehicle        --------------------------------------------------------
/// A catalogue entry. Read-only from the engine's perspective.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub price: Dollars,
    pub class: String,
    pub category: String,
    pub seats: i64,
    pub top_speed: String,
    pub acceleration: String,
    pub description: String,
    pub stock: i64,
    pub is_active: bool,
}

//--------------------------------------      UserRecord      --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRecord {
    pub discord_id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub global_name: Option<String>,
    pub discriminator: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The upsert shape for a user record, refreshed on every successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserRecord {
    pub discord_id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub global_name: Option<String>,
    pub discriminator: Option<String>,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::{OrderStatusType, Role};

    #[test]
    fn role_privilege_ordering() {
        assert!(Role::Owner > Role::Manager);
        assert!(Role::Manager > Role::Customer);
        assert!(Role::Customer > Role::Member);
        assert!(Role::Member > Role::Guest);
    }

    #[test]
    fn admin_roles() {
        assert!(Role::Owner.is_admin());
        assert!(Role::Manager.is_admin());
        assert!(!Role::Customer.is_admin());
        assert!(!Role::Member.is_admin());
        assert!(!Role::Guest.is_admin());
    }

    #[test]
    fn role_string_round_trip() {
        for role in [Role::Guest, Role::Member, Role::Customer, Role::Manager, Role::Owner] {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn status_string_round_trip() {
        use OrderStatusType::*;
        for status in [Pending, Approved, Rejected, Delivered] {
            assert_eq!(OrderStatusType::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(OrderStatusType::from_str("shipped").is_err());
        assert!(OrderStatusType::from_str("Pending").is_err());
    }

    #[test]
    fn legal_transitions() {
        use OrderStatusType::*;
        assert!(Pending.is_valid_transition(Approved));
        assert!(Pending.is_valid_transition(Rejected));
        assert!(Approved.is_valid_transition(Delivered));
        assert!(Approved.is_valid_transition(Pending));
        assert!(Rejected.is_valid_transition(Pending));
        assert!(Pending.is_valid_transition(Pending));
    }

    #[test]
    fn illegal_transitions() {
        use OrderStatusType::*;
        assert!(!Pending.is_valid_transition(Delivered));
        assert!(!Rejected.is_valid_transition(Approved));
        assert!(!Rejected.is_valid_transition(Delivered));
        assert!(!Delivered.is_valid_transition(Pending));
        assert!(!Delivered.is_valid_transition(Approved));
        assert!(!Delivered.is_valid_transition(Rejected));
    }

    #[test]
    fn serde_uses_lowercase() {
        let s = serde_json::to_string(&Role::Owner).unwrap();
        assert_eq!(s, r#""owner""#);
        let s = serde_json::to_string(&OrderStatusType::Delivered).unwrap();
        assert_eq!(s, r#""delivered""#);
        let status: OrderStatusType = serde_json::from_str(r#""approved""#).unwrap();
        assert_eq!(status, OrderStatusType::Approved);
    }
}
