//! Target patterns of skills.

/// The pattern of targets a skill can hit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ActionScope {
    User,
    OneEnemy,
    OneAlly,
    OneAllyNotUser,
    OneAllyKo,
    OneTarget,
    NotUser,
    TwoEnemies,
    TwoAllies,
    AllEnemies,
    AllAllies,
    AllAlliesKo,
    AllTargets,
    AllNotUser,
    OneParty,
    #[default]
    NoScope,
}

/// How many of the candidate targets a selection takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetCount {
    None,
    One,
    Two,
    All,
    /// Every living member of one chosen party.
    Party,
}

/// Which side a candidate is on, relative to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Ally,
    Enemy,
}

impl ActionScope {
    pub const fn count(self) -> TargetCount {
        match self {
            Self::User
            | Self::OneEnemy
            | Self::OneAlly
            | Self::OneAllyNotUser
            | Self::OneAllyKo
            | Self::OneTarget
            | Self::NotUser => TargetCount::One,
            Self::TwoEnemies | Self::TwoAllies => TargetCount::Two,
            Self::AllEnemies
            | Self::AllAllies
            | Self::AllAlliesKo
            | Self::AllTargets
            | Self::AllNotUser => TargetCount::All,
            Self::OneParty => TargetCount::Party,
            Self::NoScope => TargetCount::None,
        }
    }

    /// Scopes that pick among knocked-out allies.
    pub const fn targets_ko(self) -> bool {
        matches!(self, Self::OneAllyKo | Self::AllAlliesKo)
    }

    /// Scopes whose single target may be swapped when it dies mid-plan.
    pub const fn can_retarget(self) -> bool {
        matches!(
            self,
            Self::OneEnemy | Self::OneAlly | Self::OneAllyNotUser | Self::OneTarget | Self::NotUser
        )
    }

    /// Whether a candidate qualifies for this scope.
    ///
    /// `is_user` marks the user itself, `side` is the candidate's side
    /// relative to the user and `alive` its current state.
    pub const fn admits(self, is_user: bool, side: Side, alive: bool) -> bool {
        let ally = matches!(side, Side::Ally);
        match self {
            Self::User => is_user && alive,
            Self::OneEnemy | Self::TwoEnemies | Self::AllEnemies => !ally && alive,
            Self::OneAlly | Self::TwoAllies | Self::AllAllies => ally && alive,
            Self::OneAllyNotUser => ally && !is_user && alive,
            Self::OneAllyKo | Self::AllAlliesKo => ally && !is_user && !alive,
            Self::OneTarget | Self::AllTargets | Self::OneParty => alive,
            Self::NotUser | Self::AllNotUser => !is_user && alive,
            Self::NoScope => false,
        }
    }
}
