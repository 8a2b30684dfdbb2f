use std::sync::Arc;

use crate::reputation::ReputationLookup;
use crate::rules::RuleSet;
use crate::types::Verdict;

/// The classification pipeline: local blocklists first, then a single remote
/// reputation check. Stateless between calls.
pub struct Classifier {
  rules: RuleSet,
  reputation: Arc<dyn ReputationLookup>,
}

impl Classifier {
  pub fn new(rules: RuleSet, reputation: Arc<dyn ReputationLookup>) -> Self {
    if rules.is_empty() {
      tracing::warn!("no blocklist patterns configured; verdicts rely on the reputation service only");
    }
    Self { rules, reputation }
  }

  pub async fn classify(&self, link: &str) -> Verdict {
    if link.trim().is_empty() {
      return Verdict::unknown_because("no link provided");
    }

    if let Some(hit) = self.rules.first_match(link) {
      tracing::info!(list = %hit.list, pattern = %hit.pattern, "local rule matched");
      return Verdict::unsafe_because(format!("matched {} blocklist", hit.list));
    }

    match self.reputation.check_url(link).await {
      Ok(result) if result.is_flagged() => {
        tracing::info!(matches = result.matches.len(), "reputation service flagged link");
        Verdict::unsafe_because("flagged by external reputation service")
      }
      Ok(_) => Verdict::Safe,
      Err(e) => {
        tracing::error!(error = %e, "reputation lookup failed");
        Verdict::unknown_because(format!("reputation lookup failed: {e}"))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::reputation::{LookupError, ReputationResult, ThreatEntry, ThreatMatch};
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  enum Outcome {
    NoMatches,
    Flagged,
    Fail,
  }

  struct FakeLookup {
    outcome: Outcome,
    calls: AtomicUsize,
  }

  impl FakeLookup {
    fn new(outcome: Outcome) -> Arc<Self> {
      Arc::new(Self {
        outcome,
        calls: AtomicUsize::new(0),
      })
    }

    fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl ReputationLookup for FakeLookup {
    async fn check_url(&self, url: &str) -> Result<ReputationResult, LookupError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      match self.outcome {
        Outcome::NoMatches => Ok(ReputationResult::default()),
        Outcome::Flagged => Ok(ReputationResult {
          matches: vec![ThreatMatch {
            threat_type: "SOCIAL_ENGINEERING".to_string(),
            platform_type: Some("ANY_PLATFORM".to_string()),
            threat_entry_type: Some("URL".to_string()),
            threat: Some(ThreatEntry {
              url: url.to_string(),
            }),
          }],
        }),
        Outcome::Fail => Err(LookupError::Http {
          status: reqwest::StatusCode::BAD_GATEWAY,
          body: "bad gateway".to_string(),
        }),
      }
    }
  }

  fn classifier_with(lookup: Arc<FakeLookup>) -> Classifier {
    Classifier::new(RuleSet::new(Config::default().rules), lookup)
  }

  #[tokio::test]
  async fn restricted_keyword_is_unsafe_without_a_lookup() {
    let lookup = FakeLookup::new(Outcome::Fail);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("https://cheap-viagra.example.com/buy").await;
    assert_eq!(
      verdict.reason(),
      Some("matched restricted-content blocklist")
    );
    assert_eq!(lookup.calls(), 0);
  }

  #[tokio::test]
  async fn suspicious_fragment_is_unsafe_without_a_lookup() {
    let lookup = FakeLookup::new(Outcome::Fail);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("http://paypai-secure-login.xyz").await;
    assert_eq!(verdict.reason(), Some("matched suspicious-domain blocklist"));
    assert_eq!(lookup.calls(), 0);
  }

  #[tokio::test]
  async fn first_configured_list_names_the_reason() {
    let lookup = FakeLookup::new(Outcome::Fail);
    let classifier = classifier_with(lookup.clone());

    // Hits both lists; restricted-content is configured first.
    let verdict = classifier.classify("http://casino-secure-login.xyz").await;
    assert_eq!(
      verdict.reason(),
      Some("matched restricted-content blocklist")
    );
  }

  #[tokio::test]
  async fn matching_ignores_case() {
    let lookup = FakeLookup::new(Outcome::Fail);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("HTTP://PAYPAI.COM/WEBSCR").await;
    assert!(matches!(verdict, Verdict::Unsafe { .. }));
    assert_eq!(lookup.calls(), 0);
  }

  #[tokio::test]
  async fn clean_link_with_zero_matches_is_safe() {
    let lookup = FakeLookup::new(Outcome::NoMatches);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("https://example.com").await;
    assert_eq!(verdict, Verdict::Safe);
    assert_eq!(lookup.calls(), 1);
  }

  #[tokio::test]
  async fn clean_link_flagged_remotely_is_unsafe() {
    let lookup = FakeLookup::new(Outcome::Flagged);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("https://example.com").await;
    assert_eq!(
      verdict.reason(),
      Some("flagged by external reputation service")
    );
    assert_eq!(lookup.calls(), 1);
  }

  #[tokio::test]
  async fn empty_link_is_unknown_without_a_lookup() {
    let lookup = FakeLookup::new(Outcome::NoMatches);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("").await;
    assert_eq!(verdict.reason(), Some("no link provided"));
    assert_eq!(lookup.calls(), 0);

    let verdict = classifier.classify("   ").await;
    assert_eq!(verdict.reason(), Some("no link provided"));
    assert_eq!(lookup.calls(), 0);
  }

  #[tokio::test]
  async fn lookup_failure_is_unknown_not_a_panic() {
    let lookup = FakeLookup::new(Outcome::Fail);
    let classifier = classifier_with(lookup.clone());

    let verdict = classifier.classify("https://example.com").await;
    match verdict {
      Verdict::Unknown { reason } => {
        assert!(reason.unwrap().contains("reputation lookup failed"));
      }
      other => panic!("expected unknown verdict, got: {other:?}"),
    }
    assert_eq!(lookup.calls(), 1);
  }
}
