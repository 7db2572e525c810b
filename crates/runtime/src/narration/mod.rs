//! Suggested night actions derived from the moderator's narration.
//!
//! A [`NarrationParser`] turns free text into name-based proposals. The
//! proposals are only suggestions: they are resolved against the roster here
//! and then validated again by the engine when merged into the night's
//! action buffer, so a parser can never commit an ineligible action.

mod json;
mod keyword;

pub use json::decode_actions_json;
pub use keyword::KeywordNarrationParser;

use async_trait::async_trait;
use mafia_core::{NightProposal, ProposalKind, Roster};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One suggested action, still keyed by display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedAction {
    pub actor: String,
    pub action_type: ProposalKind,
    pub target: String,
}

impl ProposedAction {
    pub fn new(actor: impl Into<String>, action_type: ProposalKind, target: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action_type,
            target: target.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("nothing to analyse: the narration is empty")]
    EmptyNarration,

    #[error("suggestion source unavailable: {0}")]
    Unavailable(String),

    #[error("could not decode suggested actions: {0}")]
    Decode(String),
}

/// Source of suggested night actions.
///
/// `living` holds the display names of the living players, exactly as the
/// parser is expected to return them.
#[async_trait]
pub trait NarrationParser: Send + Sync {
    async fn propose(
        &self,
        narration: &str,
        living: &[String],
    ) -> Result<Vec<ProposedAction>, NarrationError>;
}

/// Proposals mapped onto seats, plus the ones naming nobody at the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedProposals {
    pub proposals: Vec<NightProposal>,
    pub unresolved: Vec<ProposedAction>,
}

/// Maps names to player ids. Unknown names are set aside, never guessed.
pub fn resolve_proposals(roster: &Roster, actions: &[ProposedAction]) -> ResolvedProposals {
    let mut resolved = ResolvedProposals::default();
    for action in actions {
        match (roster.resolve(&action.actor), roster.resolve(&action.target)) {
            (Ok(actor), Ok(target)) => resolved.proposals.push(NightProposal {
                actor,
                kind: action.action_type,
                target,
            }),
            _ => resolved.unresolved.push(action.clone()),
        }
    }
    resolved
}
