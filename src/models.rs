// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(LedgerError::invalid(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Cash,
    Bank,
    Card,
    Investment,
    Other,
}

wire_enum!(AssetType {
    Cash => "cash",
    Bank => "bank",
    Card => "card",
    Investment => "investment",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

wire_enum!(CategoryType {
    Income => "income",
    Expense => "expense",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Income,
    Expense,
    Transfer,
}

wire_enum!(BillType {
    Income => "income",
    Expense => "expense",
    Transfer => "transfer",
});

impl BillType {
    /// Category type a bill of this type must use; transfers are exempt.
    pub fn category_type(&self) -> Option<CategoryType> {
        match self {
            BillType::Income => Some(CategoryType::Income),
            BillType::Expense => Some(CategoryType::Expense),
            BillType::Transfer => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persisted identity record: the current user plus the signed-in flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub logged_in: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub verified: Option<bool>,
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub is_shared: bool,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `USD` when omitted.
    pub currency: Option<String>,
    pub is_shared: bool,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub currency: Option<String>,
    pub is_shared: Option<bool>,
    pub members: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub balance: Decimal,
    /// Balance before any bill touched the asset.
    #[serde(default)]
    pub opening_balance: Decimal,
    pub currency: String,
    pub include_in_total: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub asset_type: AssetType,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    pub include_in_total: Option<bool>,
    pub notes: Option<String>,
}

impl NewAsset {
    pub fn new(name: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            name: name.into(),
            asset_type,
            balance: None,
            currency: None,
            include_in_total: None,
            notes: None,
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub asset_type: Option<AssetType>,
    /// Direct balance override (reconciliation). Shifts `opening_balance` too.
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    pub include_in_total: Option<bool>,
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<String>,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub category_type: CategoryType,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, category_type: CategoryType) -> Self {
        Self {
            name: name.into(),
            category_type,
            icon: None,
            color: None,
            parent_id: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub category_type: Option<CategoryType>,
    pub icon: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub parent_id: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub account_id: String,
    pub asset_id: String,
    pub to_account_id: Option<String>,
    pub to_asset_id: Option<String>,
    pub category_id: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(rename = "type")]
    pub bill_type: BillType,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Display snapshots taken when the reference was set; not kept in sync
    // with later renames.
    pub account_name: String,
    pub asset_name: String,
    pub to_account_name: Option<String>,
    pub to_asset_name: Option<String>,
    pub category_name: String,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBill {
    pub account_id: String,
    pub asset_id: String,
    pub to_account_id: Option<String>,
    pub to_asset_id: Option<String>,
    pub category_id: String,
    pub amount: Decimal,
    /// Defaults to the source asset's currency.
    pub currency: Option<String>,
    pub bill_type: BillType,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct BillPatch {
    pub account_id: Option<String>,
    pub asset_id: Option<String>,
    pub to_account_id: Option<Option<String>>,
    pub to_asset_id: Option<Option<String>>,
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub bill_type: Option<BillType>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

impl BillPatch {
    /// Whether applying this patch can change the bill's balance effect.
    pub fn touches_balance(&self) -> bool {
        self.amount.is_some()
            || self.asset_id.is_some()
            || self.to_asset_id.is_some()
            || self.bill_type.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.account_id.is_none()
            && self.asset_id.is_none()
            && self.to_account_id.is_none()
            && self.to_asset_id.is_none()
            && self.category_id.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.bill_type.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}
