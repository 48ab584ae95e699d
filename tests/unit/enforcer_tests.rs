/*!
 * Tests for the enforcement engine
 */

use termguard::terminology::{EnforcementEngine, RegexMatcher, enforce};
use termguard::GlossarySnapshot;

use crate::common::glossary;

fn sources(result: &termguard::EnforcementResult) -> Vec<&str> {
    result
        .applied_terms()
        .iter()
        .map(|applied| applied.source_term.as_str())
        .collect()
}

#[test]
fn test_enforce_withNestedTerms_shouldApplyLongestMatchOnly() {
    let g = glossary(&[("critical incident", "incident"), ("incident", "voorval")]);
    let result = enforce("a critical incident happened", &g);

    assert_eq!(result.enforced_text(), "a incident happened");
    assert_eq!(result.applied_terms().len(), 1);
    assert_eq!(result.applied_terms()[0].source_term, "critical incident");
    assert_eq!(result.applied_terms()[0].matched_text, "critical incident");
    assert_eq!(result.applied_terms()[0].position, 2);
}

#[test]
fn test_enforce_withShorterTermDeclaredFirst_shouldStillPreferLonger() {
    let g = glossary(&[("incident", "voorval"), ("critical incident", "incident")]);
    let result = enforce("a critical incident happened", &g);

    assert_eq!(result.enforced_text(), "a incident happened");
    assert_eq!(sources(&result), vec!["critical incident"]);
}

#[test]
fn test_enforce_withTermInsideLongerWord_shouldLeaveTextUnchanged() {
    let g = glossary(&[("incident", "voorval")]);
    let result = enforce("incidental report", &g);

    assert_eq!(result.enforced_text(), "incidental report");
    assert!(result.applied_terms().is_empty());
}

#[test]
fn test_enforce_withUpperCaseMatch_shouldUpperCaseTarget() {
    let g = glossary(&[("service desk", "servicedesk")]);
    assert_eq!(enforce("SERVICE DESK", &g).enforced_text(), "SERVICEDESK");
}

#[test]
fn test_enforce_withTitleCaseMatch_shouldTitleCaseTarget() {
    let g = glossary(&[("service desk", "servicedesk")]);
    assert_eq!(enforce("Service Desk", &g).enforced_text(), "Servicedesk");
}

#[test]
fn test_enforce_withLowerCaseMatch_shouldKeepCanonicalTarget() {
    let g = glossary(&[("service desk", "servicedesk")]);
    assert_eq!(enforce("service desk", &g).enforced_text(), "servicedesk");
}

#[test]
fn test_enforce_withSeveralTerms_shouldAuditInTextOrder() {
    let g = glossary(&[
        ("service desk", "servicedesk"),
        ("critical incident", "incident"),
        ("customer", "klant"),
    ]);
    let text = "The Service Desk received a critical incident. The customer called.";
    let result = enforce(text, &g);

    assert_eq!(
        result.enforced_text(),
        "The Servicedesk received a incident. The klant called."
    );
    assert_eq!(sources(&result), vec!["service desk", "critical incident", "customer"]);

    let positions: Vec<usize> = result.applied_terms().iter().map(|a| a.position).collect();
    assert_eq!(positions, vec![4, 28, 51]);
    assert_eq!(&text[28..45], "critical incident");
    assert_eq!(&text[51..59], "customer");
}

#[test]
fn test_enforce_shouldRecordOriginalAndInsertedText() {
    let g = glossary(&[("service desk", "servicedesk")]);
    let result = enforce("Call the Service Desk.", &g);
    let applied = &result.applied_terms()[0];

    assert_eq!(applied.matched_text, "Service Desk");
    assert_eq!(applied.target_term, "servicedesk");
    assert_eq!(applied.replacement, "Servicedesk");
    assert_eq!(applied.position, 9);
}

#[test]
fn test_enforce_withEmptyText_shouldReturnEmptyResult() {
    let g = glossary(&[("incident", "voorval")]);
    let result = enforce("", &g);

    assert_eq!(result.enforced_text(), "");
    assert!(result.applied_terms().is_empty());
}

#[test]
fn test_enforce_withNoMatchingTerms_shouldReturnInputUnchanged() {
    let g = glossary(&[("incident", "voorval")]);
    let text = "This is a test with no glossary terms";
    let result = enforce(text, &g);

    assert_eq!(result.enforced_text(), text);
    assert!(result.is_unchanged());
}

#[test]
fn test_enforce_withEmptyGlossary_shouldReturnInputUnchanged() {
    let text = "Any incident at all.";
    let result = enforce(text, &GlossarySnapshot::empty());

    assert_eq!(result.enforced_text(), text);
    assert!(result.applied_terms().is_empty());
}

#[test]
fn test_enforce_withAdjacentPunctuation_shouldKeepPunctuation() {
    let g = glossary(&[("problem", "probleem"), ("service desk", "servicedesk")]);
    let result = enforce("Problem: see the service desk, (problem)!", &g);

    assert_eq!(result.enforced_text(), "Probleem: see the servicedesk, (probleem)!");
    assert_eq!(result.applied_terms().len(), 3);
}

#[test]
fn test_enforce_withRepeatedTerm_shouldReplaceEveryOccurrence() {
    let g = glossary(&[("incident", "voorval"), ("problem", "probleem")]);
    let result = enforce("The incident caused a problem. Another INCIDENT was logged.", &g);

    assert_eq!(
        result.enforced_text(),
        "The voorval caused a probleem. Another VOORVAL was logged."
    );
    assert_eq!(result.summary().total_replacements, 3);
    assert_eq!(result.summary().unique_terms, 2);
}

#[test]
fn test_enforce_withEqualLengthOverlap_shouldPreferFirstDeclared() {
    let g = glossary(&[("alpha beta", "AB"), ("beta gamma", "BG")]);
    let result = enforce("alpha beta gamma", &g);

    assert_eq!(result.enforced_text(), "AB gamma");
    assert_eq!(sources(&result), vec!["alpha beta"]);
}

#[test]
fn test_enforce_withPrefixTermAfterClaim_shouldNotDisplaceClaim() {
    let g = glossary(&[("change request form", "wijzigingsformulier"), ("change request", "wijzigingsverzoek")]);
    let result = enforce("Fill in the change request form or file a change request.", &g);

    assert_eq!(
        result.enforced_text(),
        "Fill in the wijzigingsformulier or file a wijzigingsverzoek."
    );
    assert_eq!(sources(&result), vec!["change request form", "change request"]);
}

#[test]
fn test_enforce_withPreconditionMet_shouldBeIdempotent() {
    let g = glossary(&[
        ("service desk", "servicedesk"),
        ("critical incident", "kritiek voorval"),
        ("customer", "klant"),
    ]);
    assert!(g.idempotence_conflicts().is_empty());

    let text = "The SERVICE DESK logged a Critical Incident for the customer.";
    let once = enforce(text, &g);
    let twice = enforce(once.enforced_text(), &g);

    assert_eq!(twice.enforced_text(), once.enforced_text());
    assert!(twice.applied_terms().is_empty());
}

#[test]
fn test_enforce_withTargetEqualToSource_shouldNotBeIdempotent() {
    let g = glossary(&[("critical incident", "incident"), ("incident", "voorval")]);
    assert!(!g.idempotence_conflicts().is_empty());

    let once = enforce("a critical incident happened", &g);
    let twice = enforce(once.enforced_text(), &g);

    assert_eq!(twice.enforced_text(), "a voorval happened");
    assert_ne!(twice.enforced_text(), once.enforced_text());
}

#[test]
fn test_enforce_withRegexMatcher_shouldMatchDefaultEngine() {
    let g = glossary(&[
        ("critical incident", "incident"),
        ("incident", "voorval"),
        ("service desk", "servicedesk"),
    ]);
    let engine = EnforcementEngine::with_matcher(RegexMatcher::new());
    let texts = [
        "a critical incident happened",
        "incidental report",
        "SERVICE DESK, Service Desk, service desk.",
        "",
    ];

    for text in texts {
        assert_eq!(engine.enforce(text, &g), enforce(text, &g), "text: {text:?}");
    }
}

#[test]
fn test_enforce_fromManyThreads_shouldGiveIdenticalResults() {
    let g = std::sync::Arc::new(glossary(&[("critical incident", "incident"), ("customer", "klant")]));
    let text = "A critical incident for the customer.";
    let expected = enforce(text, &g);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let g = std::sync::Arc::clone(&g);
            std::thread::spawn(move || enforce(text, &g))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_enforce_withSentenceCaseAndMinorWords_shouldKeepCapitals() {
    let g = glossary(&[("critical incident", "kritiek voorval"), ("chief of staff", "stafchef")]);
    let result = enforce("Critical incident reported. Chief of Staff called.", &g);

    assert_eq!(result.enforced_text(), "Kritiek Voorval reported. Stafchef called.");
    assert_eq!(result.applied_terms()[0].replacement, "Kritiek Voorval");
}
