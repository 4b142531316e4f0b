//! Project and work-item statuses
//!
//! [`WorkItemStatus`] is the lifecycle state machine:
//!
//! ```text
//! ToDo -> InProgress -> Review -> Done
//!             ^            |  \-> Rejected
//!             \------------/
//! ```
//!
//! `Done` and `Rejected` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::literal::ParseLiteralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorkItemStatus {
    #[default]
    ToDo,
    InProgress,
    Review,
    Done,
    Rejected,
}

impl WorkItemStatus {
    pub const ALL: [WorkItemStatus; 5] = [
        WorkItemStatus::ToDo,
        WorkItemStatus::InProgress,
        WorkItemStatus::Review,
        WorkItemStatus::Done,
        WorkItemStatus::Rejected,
    ];

    const LITERALS: &'static [&'static str] = &["ToDo", "InProgress", "Review", "Done", "Rejected"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "ToDo",
            Self::InProgress => "InProgress",
            Self::Review => "Review",
            Self::Done => "Done",
            Self::Rejected => "Rejected",
        }
    }

    /// Items still counted against the assignee's workload
    pub fn is_open(self) -> bool {
        matches!(self, Self::ToDo | Self::InProgress | Self::Review)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Rejected)
    }

    pub fn valid_transitions(self) -> &'static [WorkItemStatus] {
        match self {
            Self::ToDo => &[Self::InProgress],
            Self::InProgress => &[Self::Review],
            Self::Review => &[Self::Done, Self::InProgress, Self::Rejected],
            Self::Done | Self::Rejected => &[],
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.valid_transitions().contains(&target)
    }

    /// Transitions decided by a reviewer rather than the assignee
    pub fn is_review_decision(self, target: Self) -> bool {
        self == Self::Review && self.can_transition_to(target)
    }

    pub fn check_transition(self, target: Self) -> Result<(), InvalidTransition> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkItemStatus {
    type Err = ParseLiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ToDo" => Ok(Self::ToDo),
            "InProgress" => Ok(Self::InProgress),
            "Review" => Ok(Self::Review),
            "Done" => Ok(Self::Done),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseLiteralError::new("status", other, Self::LITERALS)),
        }
    }
}

/// A status change the lifecycle does not allow
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub from: WorkItemStatus,
    pub to: WorkItemStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    Active,
    Closed,
}

impl ProjectStatus {
    const LITERALS: &'static [&'static str] = &["Active", "Closed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseLiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Closed" => Ok(Self::Closed),
            other => Err(ParseLiteralError::new("status", other, Self::LITERALS)),
        }
    }
}
