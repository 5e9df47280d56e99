use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Local,
    Dev,
    Staging,
    Prod,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Prod, Stage::Staging, Stage::Dev, Stage::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Local => "local",
            Stage::Dev => "dev",
            Stage::Staging => "staging",
            Stage::Prod => "prod",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Stage::Local)
    }
}

impl FromStr for Stage {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| DeployError::InvalidStage(s.to_string()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
