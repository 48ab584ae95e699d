/*!
 * Tests for replacement casing
 */

use termguard::terminology::CaseStyle;
use termguard::terminology::case::{adapt, title_case};

#[test]
fn test_adapt_withServiceDeskVariants_shouldFollowInputCasing() {
    let cases = [
        ("SERVICE DESK", "SERVICEDESK"),
        ("Service Desk", "Servicedesk"),
        ("service desk", "servicedesk"),
    ];
    for (matched, expected) in cases {
        assert_eq!(adapt("servicedesk", matched), expected, "matched {matched:?}");
    }
}

#[test]
fn test_adapt_withSingleWordTitle_shouldCapitalizeFirstLetter() {
    assert_eq!(adapt("probleem", "Problem"), "Probleem");
    assert_eq!(adapt("voorval", "Incident"), "Voorval");
}

#[test]
fn test_adapt_withMixedCase_shouldUseStoredForm() {
    assert_eq!(CaseStyle::classify("SerVice desk"), CaseStyle::Mixed);
    assert_eq!(adapt("Servicedesk", "SerVice desk"), "Servicedesk");
}

#[test]
fn test_adapt_withLowerCase_shouldNotLowercaseStoredCapitals() {
    // Stored casing is canonical for lowercase matches
    assert_eq!(adapt("ServiceNow", "service now"), "ServiceNow");
}

#[test]
fn test_adapt_withAllUpperAndEszett_shouldExpandLetters() {
    assert_eq!(adapt("straße", "ROAD"), "STRASSE");
}

#[test]
fn test_titleCase_shouldKeepWhitespaceAndPunctuation() {
    assert_eq!(title_case("kritiek  incident-melding"), "Kritiek  Incident-melding");
    assert_eq!(title_case("'t voorval"), "'T Voorval");
}

#[test]
fn test_classify_withLowercaseMinorWords_shouldBeTitle() {
    assert_eq!(CaseStyle::classify("Chief of Staff"), CaseStyle::Title);
    assert_eq!(CaseStyle::classify("Critical incident"), CaseStyle::Title);
    assert_eq!(CaseStyle::classify("Chief Of sTaff"), CaseStyle::Mixed);
    assert_eq!(CaseStyle::classify("chief of Staff"), CaseStyle::Mixed);
}

#[test]
fn test_adapt_withSentenceInitialMatch_shouldCapitalizeTarget() {
    assert_eq!(adapt("kritiek voorval", "Critical incident"), "Kritiek Voorval");
    assert_eq!(adapt("stafchef", "Chief of Staff"), "Stafchef");
}
