use serde::{Deserialize, Serialize};

/// Final safety classification of a submitted link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Verdict {
  Safe,
  Unsafe { reason: Option<String> },
  Unknown { reason: Option<String> },
}

impl Verdict {
  pub fn unsafe_because(reason: impl Into<String>) -> Self {
    Self::Unsafe {
      reason: Some(reason.into()),
    }
  }

  pub fn unknown_because(reason: impl Into<String>) -> Self {
    Self::Unknown {
      reason: Some(reason.into()),
    }
  }

  pub fn reason(&self) -> Option<&str> {
    match self {
      Self::Safe => None,
      Self::Unsafe { reason } | Self::Unknown { reason } => reason.as_deref(),
    }
  }
}
