//! Sequential fallback execution of the predicate cascade.

use parcel_estimate_models::{ParcelCandidate, Predicate};

use crate::ParcelRegistry;

/// Runs predicates in order and stops at the first stage that yields at
/// least one candidate. Registry ordering within a stage is preserved.
///
/// A transport or decoding failure on a stage is logged and treated as
/// zero candidates for that stage; the cascade simply moves on. When
/// every stage comes up empty the result is an empty list, which the
/// caller reports as "no match".
pub async fn run_cascade(
    registry: &dyn ParcelRegistry,
    predicates: &[Predicate],
) -> Vec<ParcelCandidate> {
    for (stage, predicate) in predicates.iter().enumerate() {
        log::debug!(
            "cascade stage {}/{} ({}): {}",
            stage + 1,
            predicates.len(),
            predicate.label,
            predicate.where_clause
        );

        match registry.query(&predicate.where_clause).await {
            Ok(candidates) if !candidates.is_empty() => {
                log::info!(
                    "cascade stage {} ({}) matched {} parcel(s)",
                    stage + 1,
                    predicate.label,
                    candidates.len()
                );
                return candidates;
            }
            Ok(_) => {
                log::debug!("cascade stage {} ({}) matched nothing", stage + 1, predicate.label);
            }
            Err(e) => {
                // Degraded to an empty stage rather than aborting the
                // cascade; the cause still lands in the log for
                // diagnostics.
                log::warn!(
                    "cascade stage {} ({}) failed: {e}",
                    stage + 1,
                    predicate.label
                );
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use parcel_estimate_models::{CountySchema, SearchIntent};

    use super::*;
    use crate::RegistryError;

    /// Stub registry that records every `where` clause it sees and
    /// replies from a canned per-call script.
    struct ScriptedRegistry {
        calls: Mutex<Vec<String>>,
        script: Mutex<Vec<Result<Vec<ParcelCandidate>, RegistryError>>>,
    }

    impl ScriptedRegistry {
        fn new(script: Vec<Result<Vec<ParcelCandidate>, RegistryError>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                script: Mutex::new(script),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ParcelRegistry for ScriptedRegistry {
        async fn query(&self, where_clause: &str) -> Result<Vec<ParcelCandidate>, RegistryError> {
            self.calls.lock().unwrap().push(where_clause.to_string());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok(Vec::new())
            } else {
                script.remove(0)
            }
        }
    }

    fn candidate(quickref: &str) -> ParcelCandidate {
        let mut properties = serde_json::Map::new();
        properties.insert("quickrefid".to_string(), serde_json::json!(quickref));
        ParcelCandidate {
            properties,
            geometry: None,
        }
    }

    fn json_error() -> RegistryError {
        RegistryError::Json(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
    }

    fn address_predicates(raw: &str) -> Vec<Predicate> {
        crate::build_predicates(
            &SearchIntent::Address {
                raw: raw.to_string(),
            },
            &CountySchema::fort_bend(),
        )
    }

    #[tokio::test]
    async fn stops_at_first_non_empty_stage() {
        let registry = ScriptedRegistry::new(vec![Ok(vec![candidate("R1")])]);
        let predicates = address_predicates("123 Main St");
        assert_eq!(predicates.len(), 3);

        let matches = run_cascade(&registry, &predicates).await;
        assert_eq!(matches.len(), 1);
        // Later, less specific stages must not run once a stage succeeds.
        assert_eq!(registry.call_count(), 1);
    }

    #[tokio::test]
    async fn falls_through_empty_stages() {
        let registry = ScriptedRegistry::new(vec![
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(vec![candidate("R2"), candidate("R3")]),
        ]);
        let predicates = address_predicates("123 Main St");

        let matches = run_cascade(&registry, &predicates).await;
        assert_eq!(matches.len(), 2);
        assert_eq!(registry.call_count(), 3);
        // Registry ordering is preserved as-is.
        assert_eq!(matches[0].prop_str("quickrefid").as_deref(), Some("R2"));
    }

    #[tokio::test]
    async fn transport_failure_falls_through_to_next_stage() {
        let registry =
            ScriptedRegistry::new(vec![Err(json_error()), Ok(vec![candidate("R9")])]);
        let predicates = address_predicates("123 Main St");

        let matches = run_cascade(&registry, &predicates).await;
        assert_eq!(matches.len(), 1);
        assert_eq!(registry.call_count(), 2);
    }

    #[tokio::test]
    async fn all_stages_empty_yields_no_match() {
        let registry = ScriptedRegistry::new(vec![Ok(Vec::new())]);
        let predicates = address_predicates("Main");

        let matches = run_cascade(&registry, &predicates).await;
        assert!(matches.is_empty());
        assert_eq!(registry.call_count(), 1);
    }

    #[tokio::test]
    async fn failure_on_final_stage_is_an_empty_result() {
        let registry = ScriptedRegistry::new(vec![Err(json_error())]);
        let predicates = address_predicates("Main");

        let matches = run_cascade(&registry, &predicates).await;
        assert!(matches.is_empty());
    }
}
