//! Action validation errors.
//!
//! Every moderator input (night intents, gun transfers, day guns, vote
//! tallies) is checked against the current roster before it is accepted.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Player, PlayerId, Roster, RosterError};

/// Errors raised when an input is invalid or the actor is not eligible.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Actor has already been eliminated.
    #[error("player {0} is eliminated and cannot act")]
    ActorEliminated(PlayerId),

    /// Target has already been eliminated.
    #[error("player {0} is already eliminated")]
    TargetEliminated(PlayerId),

    /// Actor already spent their night shot.
    #[error("player {0} has no shot left")]
    NoShotLeft(PlayerId),

    /// Actor already spent their night save.
    #[error("player {0} has no save left")]
    NoSaveLeft(PlayerId),

    /// Another Mafia member already carries tonight's team shot.
    #[error("the mafia already shoot tonight through player {shooter}")]
    MafiaShotTaken { shooter: PlayerId },

    /// A player cannot fire at themselves.
    #[error("player {0} cannot shoot themselves")]
    SelfTarget(PlayerId),

    /// No day gun at the given index.
    #[error("player {player} holds {held} gun(s), no gun at index {index}")]
    NoSuchGun {
        player: PlayerId,
        index: usize,
        held: usize,
    },

    /// Transfer slot does not belong to a player eliminated tonight with a
    /// gun to give.
    #[error("player {0} has no gun to hand down")]
    NotATransferSource(PlayerId),

    /// A gun cannot be handed back to its previous owner.
    #[error("player {0} cannot hand their gun to themselves")]
    SelfTransfer(PlayerId),

    /// Flavor or recipient missing on a transfer slot.
    #[error("gun transfer from {from} is missing a flavor or a recipient")]
    IncompleteTransfer { from: PlayerId },

    /// Player is not on the ballot being tallied.
    #[error("player {0} is not on the ballot")]
    NotOnBallot(PlayerId),

    /// More votes than there are living voters.
    #[error("{tally} votes exceed the {living} living players")]
    TallyAboveLiving { tally: u32, living: u32 },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            Roster(err) => err.severity(),
            IncompleteTransfer { .. } | TallyAboveLiving { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            Roster(err) => err.error_code(),
            ActorEliminated(_) => "ACTION_ACTOR_ELIMINATED",
            TargetEliminated(_) => "ACTION_TARGET_ELIMINATED",
            NoShotLeft(_) => "ACTION_NO_SHOT_LEFT",
            NoSaveLeft(_) => "ACTION_NO_SAVE_LEFT",
            MafiaShotTaken { .. } => "ACTION_MAFIA_SHOT_TAKEN",
            SelfTarget(_) => "ACTION_SELF_TARGET",
            NoSuchGun { .. } => "ACTION_NO_SUCH_GUN",
            NotATransferSource(_) => "ACTION_NOT_A_TRANSFER_SOURCE",
            SelfTransfer(_) => "ACTION_SELF_TRANSFER",
            IncompleteTransfer { .. } => "ACTION_INCOMPLETE_TRANSFER",
            NotOnBallot(_) => "ACTION_NOT_ON_BALLOT",
            TallyAboveLiving { .. } => "ACTION_TALLY_ABOVE_LIVING",
        }
    }
}

/// Checks that `id` is seated and still alive.
pub(crate) fn require_living_actor(
    roster: &Roster,
    id: PlayerId,
) -> Result<&Player, ActionError> {
    let player = roster.require(id)?;
    if !player.is_alive {
        return Err(ActionError::ActorEliminated(id));
    }
    Ok(player)
}

/// Checks that `id` is seated and still alive, reported as a target.
pub(crate) fn require_living_target(
    roster: &Roster,
    id: PlayerId,
) -> Result<&Player, ActionError> {
    let player = roster.require(id)?;
    if !player.is_alive {
        return Err(ActionError::TargetEliminated(id));
    }
    Ok(player)
}
