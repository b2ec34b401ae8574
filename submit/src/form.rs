//! Report-level form fields accompanying the line set.

use serde::{Deserialize, Serialize};

/// Overall report category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Travel,
    Other,
}

impl ExpenseCategory {
    /// Wire value for the `expense-type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Travel => "travel",
            ExpenseCategory::Other => "other",
        }
    }
}

/// Travel details, required in full when the category is
/// [`ExpenseCategory::Travel`]. Dates stay in their wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelDetails {
    pub purpose: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    /// Sent as the `return` field.
    pub return_date: String,
}

impl TravelDetails {
    /// Whether every field is filled.
    pub fn is_complete(&self) -> bool {
        ![
            &self.purpose,
            &self.from,
            &self.to,
            &self.departure,
            &self.return_date,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

/// Report-level fields collected alongside the lines.
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub category: ExpenseCategory,
    /// Required when the category is `other`.
    pub comment: Option<String>,
    /// Required when the category is `travel`.
    pub travel: Option<TravelDetails>,
}

impl ReportForm {
    /// A form for the `other` category with the given comment.
    pub fn other(comment: impl Into<String>) -> Self {
        Self {
            category: ExpenseCategory::Other,
            comment: Some(comment.into()),
            travel: None,
        }
    }

    /// A form for the `travel` category with the given details.
    pub fn travel(details: TravelDetails) -> Self {
        Self {
            category: ExpenseCategory::Travel,
            comment: None,
            travel: Some(details),
        }
    }
}
