use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionPhase {
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request produced a result.
    Settled,
    /// A guard or the provider failed.
    Failed,
    Cancelled,
    /// Blocked by the plan's monthly ceiling.
    UpgradeRequired,
}

impl ActionPhase {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Every phase except `Pending` accepts a new submission.
    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Pending => "Working",
            Self::Settled => "Done",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::UpgradeRequired => "Upgrade required",
        }
    }
}
