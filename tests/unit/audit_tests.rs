/*!
 * Tests for the audit trail
 */

use termguard::terminology::{AuditCollector, enforce};

use crate::common::glossary;

#[test]
fn test_appliedTerms_shouldSerializeWithAllFields() {
    let g = glossary(&[("customer", "klant")]);
    let result = enforce("The Customer called.", &g);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["enforced_text"], "The Klant called.");
    let applied = &json["applied_terms"][0];
    assert_eq!(applied["source_term"], "customer");
    assert_eq!(applied["target_term"], "klant");
    assert_eq!(applied["matched_text"], "Customer");
    assert_eq!(applied["position"], 4);
    assert_eq!(applied["replacement"], "Klant");
}

#[test]
fn test_appliedTerms_countShouldEqualClaimedSpans() {
    let g = glossary(&[("critical incident", "incident"), ("incident", "voorval")]);
    let text = "incident, critical incident, incident";
    let result = enforce(text, &g);

    assert_eq!(result.applied_terms().len(), 3);
    let positions: Vec<usize> = result.applied_terms().iter().map(|a| a.position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert_eq!(positions, vec![0, 10, 29]);
}

#[test]
fn test_results_fromSeparateCalls_shouldNotShareAuditState() {
    let g = glossary(&[("customer", "klant")]);
    let first = enforce("customer", &g);
    let second = enforce("no match", &g);

    assert_eq!(first.applied_terms().len(), 1);
    assert!(second.applied_terms().is_empty());
}

#[test]
fn test_summary_shouldListReplacementsInOrder() {
    let g = glossary(&[("customer", "klant"), ("problem", "probleem")]);
    let summary = enforce("problem for the customer, another problem", &g).summary();

    assert_eq!(summary.total_replacements, 3);
    assert_eq!(summary.unique_terms, 2);
    let order: Vec<&str> = summary.replacements.iter().map(|r| r.source_term.as_str()).collect();
    assert_eq!(order, vec!["problem", "customer", "problem"]);
}

#[test]
fn test_collector_fromManyThreads_shouldCountEveryCall() {
    let g = std::sync::Arc::new(glossary(&[("customer", "klant")]));
    let collector = std::sync::Arc::new(AuditCollector::new(5));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let g = std::sync::Arc::clone(&g);
            let collector = std::sync::Arc::clone(&collector);
            std::thread::spawn(move || {
                for _ in 0..5 {
                    let result = enforce("customer", &g);
                    collector.record("customer", &result, Some(g.fingerprint()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = collector.statistics();
    assert_eq!(stats.total_audits, 20);
    assert_eq!(stats.total_replacements, 20);
    assert_eq!(collector.recent(100).len(), 5);
}
