use serde::{Deserialize, Serialize};

/// A named, ordered list of lowercase substrings to block on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternList {
  pub name: String,
  pub patterns: Vec<String>,
}

/// Blocklists evaluated in configuration order; the first list with a hit wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
  lists: Vec<PatternList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
  pub list: String,
  pub pattern: String,
}

impl RuleSet {
  /// Patterns are matched lowercase; normalize once here so each lookup stays
  /// a plain substring scan. Blank patterns are dropped.
  pub fn new(lists: Vec<PatternList>) -> Self {
    let lists = lists
      .into_iter()
      .map(|list| PatternList {
        name: list.name,
        patterns: list
          .patterns
          .into_iter()
          .map(|p| p.trim().to_lowercase())
          .filter(|p| !p.is_empty())
          .collect(),
      })
      .collect();

    Self { lists }
  }

  pub fn first_match(&self, link: &str) -> Option<RuleMatch> {
    let lowered = link.to_lowercase();

    for list in &self.lists {
      if let Some(pattern) = list.patterns.iter().find(|p| lowered.contains(p.as_str())) {
        return Some(RuleMatch {
          list: list.name.clone(),
          pattern: pattern.clone(),
        });
      }
    }

    None
  }

  pub fn is_empty(&self) -> bool {
    self.lists.iter().all(|l| l.patterns.is_empty())
  }
}
