//! Player-facing notifications produced by the weekly tick.
//!
//! Inbox items are write-once and append-only. Ordering inside a tick
//! is insertion order; ordering across stages is the fixed pipeline
//! order documented in engine.rs.

use crate::error::{SimError, SimResult};
use crate::types::Week;
use serde::{Deserialize, Serialize};

/// Closed set of notification categories.
///
/// Persisted as strings through the explicit mapping below — never
/// through derived name lookup, so renaming a variant is a compile
/// error at the mapping table instead of silent data drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxKind {
    News,
    Contract,
    Incident,
    Generation,
    Youth,
    WorldSim,
    Scouting,
    Finance,
    Performance,
}

impl InboxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Contract => "contrat",
            Self::Incident => "incident",
            Self::Generation => "generation",
            Self::Youth => "youth",
            Self::WorldSim => "monde",
            Self::Scouting => "scouting",
            Self::Finance => "finance",
            Self::Performance => "performance",
        }
    }

    pub fn parse(value: &str) -> SimResult<Self> {
        match value {
            "news" => Ok(Self::News),
            "contrat" => Ok(Self::Contract),
            "incident" => Ok(Self::Incident),
            "generation" => Ok(Self::Generation),
            "youth" => Ok(Self::Youth),
            "monde" => Ok(Self::WorldSim),
            "scouting" => Ok(Self::Scouting),
            "finance" => Ok(Self::Finance),
            "performance" => Ok(Self::Performance),
            other => Err(SimError::UnknownInboxKind {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxItem {
    pub kind: InboxKind,
    pub title: String,
    pub body: String,
    pub week: Week,
}

impl InboxItem {
    pub fn new(kind: InboxKind, title: impl Into<String>, body: impl Into<String>, week: Week) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            week,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mapping_round_trips() {
        let kinds = [
            InboxKind::News,
            InboxKind::Contract,
            InboxKind::Incident,
            InboxKind::Generation,
            InboxKind::Youth,
            InboxKind::WorldSim,
            InboxKind::Scouting,
            InboxKind::Finance,
            InboxKind::Performance,
        ];
        for kind in kinds {
            assert_eq!(InboxKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(InboxKind::parse("gossip").is_err());
    }
}
