pub mod action;
pub mod error;
pub mod phase;
pub mod player;
pub mod role;
pub mod role_card;

pub use action::{Ability, Action, Modifier, SideEffect};
pub use error::ParseError;
pub use phase::{GamePhase, PhaseKind, MAX_CYCLE};
pub use player::{Player, UserId};
pub use role::{Alignment, Role};
pub use role_card::{RoleCard, RoleCardTemplate};
