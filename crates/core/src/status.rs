//! Lifecycle enums and their transition tables.
//!
//! Member names are the wire literals (`READY_TO_START`, `VERY_HIGH`, ...) and
//! must match exactly, case-sensitively, both on create/replace and on patch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// An enum whose members are addressed by their literal wire name.
pub trait NamedEnum: Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == name)
    }
}

macro_rules! define_named_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $lit)] $variant ),+
        }

        impl NamedEnum for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $lit ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_named_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Empty = "EMPTY",
        ReadyToStart = "READY_TO_START",
        InProgress = "IN_PROGRESS",
        Done = "DONE",
        Canceled = "CANCELED",
    }
}

define_named_enum! {
    /// Task lifecycle status.
    TaskStatus {
        ReadyToStart = "READY_TO_START",
        InProgress = "IN_PROGRESS",
        Done = "DONE",
        Canceled = "CANCELED",
    }
}

define_named_enum! {
    /// Task priority.
    Priority {
        VeryLow = "VERY_LOW",
        Low = "LOW",
        Medium = "MEDIUM",
        High = "HIGH",
        VeryHigh = "VERY_HIGH",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

// ---------------------------------------------------------------------------
// State machines
// ---------------------------------------------------------------------------

/// A status enum with an explicit transition table.
pub trait StateMachine: NamedEnum {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Targets reachable from `self`, including `self` where allowed.
    fn valid_transitions(self) -> &'static [Self];

    /// Terminal states are where work on the entity is considered finished.
    fn is_terminal(self) -> bool;

    fn can_transition(self, to: Self) -> bool {
        self.valid_transitions().contains(&to)
    }

    fn validate_transition(self, to: Self) -> CoreResult<()> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::bad_request(format!(
                "Invalid {} status transition: {self} -> {to}",
                Self::ENTITY
            )))
        }
    }
}

impl ProjectStatus {
    /// Status assumed when a project was created without one.
    pub const INITIAL: ProjectStatus = ProjectStatus::Empty;
}

impl StateMachine for ProjectStatus {
    const ENTITY: &'static str = "Project";

    fn valid_transitions(self) -> &'static [Self] {
        match self {
            // Open states may move anywhere, terminal ones included.
            ProjectStatus::Empty | ProjectStatus::ReadyToStart | ProjectStatus::InProgress => {
                ProjectStatus::ALL
            }
            ProjectStatus::Done | ProjectStatus::Canceled => &[],
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, ProjectStatus::Done | ProjectStatus::Canceled)
    }
}

impl TaskStatus {
    /// The only status a task may be created in.
    pub const INITIAL: TaskStatus = TaskStatus::ReadyToStart;
}

impl StateMachine for TaskStatus {
    const ENTITY: &'static str = "Task";

    // Tasks do not lock once finished: every status stays reachable.
    fn valid_transitions(self) -> &'static [Self] {
        TaskStatus::ALL
    }

    fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    #[test]
    fn names_round_trip() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_name(status.as_str()), Some(*status));
        }
        for priority in Priority::ALL {
            assert_eq!(Priority::from_name(priority.as_str()), Some(*priority));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(TaskStatus::from_name("done"), None);
        assert_eq!(TaskStatus::from_name("Done"), None);
        assert_eq!(TaskStatus::from_name("DONE"), Some(TaskStatus::Done));
    }

    #[test]
    fn serde_uses_wire_literals() {
        let json = serde_json::to_string(&Priority::VeryHigh).unwrap();
        assert_eq!(json, "\"VERY_HIGH\"");
        let status: ProjectStatus = serde_json::from_str("\"READY_TO_START\"").unwrap();
        assert_eq!(status, ProjectStatus::ReadyToStart);
    }

    #[test]
    fn default_priority_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    // -----------------------------------------------------------------------
    // Project transitions
    // -----------------------------------------------------------------------

    #[test]
    fn open_project_reaches_every_state() {
        for from in [
            ProjectStatus::Empty,
            ProjectStatus::ReadyToStart,
            ProjectStatus::InProgress,
        ] {
            for to in ProjectStatus::ALL {
                assert!(from.can_transition(*to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn terminal_project_has_no_outgoing_edges() {
        for from in [ProjectStatus::Done, ProjectStatus::Canceled] {
            assert!(from.is_terminal());
            assert!(from.valid_transitions().is_empty());
            let err = from.validate_transition(ProjectStatus::InProgress).unwrap_err();
            assert!(err.to_string().contains("Invalid Project status transition"));
            assert!(err.to_string().contains(&format!("{from} -> IN_PROGRESS")));
        }
    }

    // -----------------------------------------------------------------------
    // Task transitions
    // -----------------------------------------------------------------------

    #[test]
    fn task_transitions_are_permissive() {
        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                assert!(from.validate_transition(*to).is_ok(), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn task_terminal_states_are_marked() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Canceled.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert_eq!(TaskStatus::INITIAL, TaskStatus::ReadyToStart);
    }
}
