//! The opinionated five-stage story workflow.
//!
//! The stages are fixed; only the mapping from each stage to a concrete
//! VersionOne status OID is instance-specific (discovered during `v1 setup`
//! and stored in [`crate::StatusMapping`]).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    Backlog,
    Ready,
    InProgress,
    Review,
    Done,
}

impl StoryStatus {
    pub const ALL: [StoryStatus; 5] = [
        StoryStatus::Backlog,
        StoryStatus::Ready,
        StoryStatus::InProgress,
        StoryStatus::Review,
        StoryStatus::Done,
    ];

    /// Canonical lowercase name, as stored in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Backlog => "backlog",
            StoryStatus::Ready => "ready",
            StoryStatus::InProgress => "in_progress",
            StoryStatus::Review => "review",
            StoryStatus::Done => "done",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StoryStatus::Backlog => "○",
            StoryStatus::Ready => "◔",
            StoryStatus::InProgress => "●",
            StoryStatus::Review => "◐",
            StoryStatus::Done => "✓",
        }
    }

    /// Color role understood by `v1cli_common::Colors::role`.
    pub fn color(&self) -> &'static str {
        match self {
            StoryStatus::Backlog => "dim",
            StoryStatus::Ready => "cyan",
            StoryStatus::InProgress => "yellow",
            StoryStatus::Review => "magenta",
            StoryStatus::Done => "green",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryStatus {
    type Err = String;

    /// Parses user input, accepting common aliases.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "backlog" | "todo" | "new" => Ok(StoryStatus::Backlog),
            "ready" => Ok(StoryStatus::Ready),
            "in_progress" | "progress" | "inprogress" | "wip" => Ok(StoryStatus::InProgress),
            "review" => Ok(StoryStatus::Review),
            "done" | "complete" | "completed" | "finished" => Ok(StoryStatus::Done),
            _ => Err(format!("invalid status: {value}")),
        }
    }
}

/// Stages reachable in one step from `current`.
pub fn valid_transitions(current: StoryStatus) -> &'static [StoryStatus] {
    match current {
        StoryStatus::Backlog => &[StoryStatus::Ready],
        StoryStatus::Ready => &[StoryStatus::Backlog, StoryStatus::InProgress],
        StoryStatus::InProgress => &[StoryStatus::Ready, StoryStatus::Review],
        StoryStatus::Review => &[StoryStatus::InProgress, StoryStatus::Done],
        StoryStatus::Done => &[StoryStatus::Review],
    }
}

pub fn can_transition(from: StoryStatus, to: StoryStatus) -> bool {
    valid_transitions(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_canonical() {
        assert_eq!("backlog".parse::<StoryStatus>(), Ok(StoryStatus::Backlog));
        assert_eq!(
            "in_progress".parse::<StoryStatus>(),
            Ok(StoryStatus::InProgress)
        );
        assert_eq!("done".parse::<StoryStatus>(), Ok(StoryStatus::Done));
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("wip".parse::<StoryStatus>(), Ok(StoryStatus::InProgress));
        assert_eq!(
            "progress".parse::<StoryStatus>(),
            Ok(StoryStatus::InProgress)
        );
        assert_eq!("todo".parse::<StoryStatus>(), Ok(StoryStatus::Backlog));
        assert_eq!("completed".parse::<StoryStatus>(), Ok(StoryStatus::Done));
    }

    #[test]
    fn test_from_str_normalizes_separators() {
        assert_eq!(
            "In Progress".parse::<StoryStatus>(),
            Ok(StoryStatus::InProgress)
        );
        assert_eq!(
            "in-progress".parse::<StoryStatus>(),
            Ok(StoryStatus::InProgress)
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("blocked".parse::<StoryStatus>().is_err());
    }

    #[test]
    fn test_transitions_forward_and_back() {
        assert!(can_transition(StoryStatus::Backlog, StoryStatus::Ready));
        assert!(can_transition(StoryStatus::Ready, StoryStatus::Backlog));
        assert!(can_transition(StoryStatus::InProgress, StoryStatus::Review));
        assert!(can_transition(StoryStatus::Review, StoryStatus::Done));
        assert!(can_transition(StoryStatus::Done, StoryStatus::Review));
    }

    #[test]
    fn test_no_stage_skipping() {
        assert!(!can_transition(StoryStatus::Backlog, StoryStatus::Done));
        assert!(!can_transition(StoryStatus::Backlog, StoryStatus::InProgress));
        assert!(!can_transition(StoryStatus::Done, StoryStatus::Backlog));
        assert!(!can_transition(StoryStatus::Ready, StoryStatus::Review));
    }

    #[test]
    fn test_every_stage_has_an_exit() {
        for status in StoryStatus::ALL {
            assert!(!valid_transitions(status).is_empty());
        }
    }
}
