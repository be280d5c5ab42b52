use regex::Regex;

use crate::models::{ReminderSuggestion, ReminderType};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// One phrase pattern in the extraction rule table.
///
/// The capture groups are fixed across all rules: group 1 is the amount,
/// group 2 the unit (minute/hour/day, optionally plural).
struct SuggestionRule {
    pattern: Regex,
    reminder_type: ReminderType,
    title: &'static str,
}

/// Rule-based extractor that scans free-text AI responses for time-bearing
/// care instructions and proposes reminder candidates.
///
/// Pure function of its input: no state beyond the compiled rule table, never
/// fails on malformed text, and performs no scheduling. The explicit rule
/// table keeps the matching swappable for a real intent model later.
pub struct SuggestionExtractor {
    rules: Vec<SuggestionRule>,
    time_tail: Regex,
}

impl SuggestionExtractor {
    pub fn new() -> Self {
        let rule = |pattern: &str, reminder_type, title| SuggestionRule {
            pattern: Regex::new(pattern).expect("invalid suggestion pattern"),
            reminder_type,
            title,
        };
        Self {
            rules: vec![
                rule(
                    r"(?i)check.*?(?:on|up).*?(?:in|after)\s+(\d+)\s*(minute|hour|day)s?",
                    ReminderType::Checkup,
                    "Health Check Reminder",
                ),
                rule(
                    r"(?i)give.*?medication.*?(?:in|after)\s+(\d+)\s*(minute|hour|day)s?",
                    ReminderType::Medication,
                    "Medication Reminder",
                ),
                rule(
                    r"(?i)monitor.*?(?:for|in)\s+(\d+)\s*(minute|hour|day)s?",
                    ReminderType::Checkup,
                    "Health Check Reminder",
                ),
                rule(
                    r"(?i)follow.*?up.*?(?:in|after)\s+(\d+)\s*(minute|hour|day)s?",
                    ReminderType::VetFollowup,
                    "Health Check Reminder",
                ),
            ],
            time_tail: Regex::new(r"(?i)\s*(?:in|after|for)\s+\d+.*$")
                .expect("invalid time tail pattern"),
        }
    }

    /// Extract reminder candidates from a block of free text.
    ///
    /// Matching is case-insensitive; every match of every rule yields an
    /// independent candidate, so overlapping rules may produce duplicates.
    /// Text with no matches yields an empty list.
    pub fn extract(&self, text: &str, pet_id: Option<&str>) -> Vec<ReminderSuggestion> {
        let pet_word = if pet_id.is_some() { "your pet" } else { "them" };
        let mut suggestions = Vec::new();

        for rule in &self.rules {
            for captures in rule.pattern.captures_iter(text) {
                let (Some(amount), Some(unit)) = (captures.get(1), captures.get(2)) else {
                    continue;
                };
                // Digit runs too long for i64 are ignored rather than failing.
                let Ok(amount) = amount.as_str().parse::<i64>() else {
                    continue;
                };
                let time_in_minutes = match unit.as_str().to_lowercase().as_str() {
                    "hour" => amount * MINUTES_PER_HOUR,
                    "day" => amount * MINUTES_PER_DAY,
                    _ => amount,
                };

                let matched = captures.get(0).map(|m| m.as_str()).unwrap_or_default();
                let action = self
                    .time_tail
                    .replace(&matched.to_lowercase(), "")
                    .trim()
                    .to_string();

                suggestions.push(ReminderSuggestion {
                    title: rule.title.to_string(),
                    message: format!("Time to {action} {pet_word}"),
                    time_in_minutes,
                    reminder_type: rule.reminder_type,
                });
            }
        }

        suggestions
    }
}

impl Default for SuggestionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_on_phrase_yields_checkup_candidate() {
        let extractor = SuggestionExtractor::new();
        let suggestions = extractor.extract("Please check on your pet in 30 minutes", Some("p1"));

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].reminder_type, ReminderType::Checkup);
        assert_eq!(suggestions[0].time_in_minutes, 30);
        assert_eq!(suggestions[0].title, "Health Check Reminder");
    }

    #[test]
    fn test_medication_and_followup_in_one_response() {
        let extractor = SuggestionExtractor::new();
        let suggestions =
            extractor.extract("Give medication in 2 hours and follow up in 1 day", None);

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].reminder_type, ReminderType::Medication);
        assert_eq!(suggestions[0].time_in_minutes, 120);
        assert_eq!(suggestions[0].title, "Medication Reminder");
        assert_eq!(suggestions[1].reminder_type, ReminderType::VetFollowup);
        assert_eq!(suggestions[1].time_in_minutes, 1440);
    }

    #[test]
    fn test_monitor_phrase_yields_checkup_candidate() {
        let extractor = SuggestionExtractor::new();
        let suggestions = extractor.extract("Monitor the swelling for 45 minutes", None);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].reminder_type, ReminderType::Checkup);
        assert_eq!(suggestions[0].time_in_minutes, 45);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let extractor = SuggestionExtractor::new();
        let suggestions = extractor.extract("CHECK UP ON HIM AFTER 2 HOURS", None);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].time_in_minutes, 120);
    }

    #[test]
    fn test_day_unit_converts_to_minutes() {
        let extractor = SuggestionExtractor::new();
        let suggestions = extractor.extract("Give the medication after 3 days", None);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].time_in_minutes, 3 * 1440);
    }

    #[test]
    fn test_no_time_bearing_phrase_yields_empty_list() {
        let extractor = SuggestionExtractor::new();
        assert!(extractor
            .extract("Your pet looks healthy, keep up the good work!", None)
            .is_empty());
        assert!(extractor.extract("", None).is_empty());
        assert!(extractor
            .extract("check on your pet in a few minutes", None)
            .is_empty());
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let extractor = SuggestionExtractor::new();
        let text = "Give medication in 2 hours and follow up in 1 day";

        let first = extractor.extract(text, Some("p1"));
        let second = extractor.extract(text, Some("p1"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_multiple_matches_of_one_rule_are_independent() {
        let extractor = SuggestionExtractor::new();
        let suggestions = extractor.extract(
            "Check on the wound in 30 minutes. Later, check on the bandage in 2 hours.",
            None,
        );

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].time_in_minutes, 30);
        assert_eq!(suggestions[1].time_in_minutes, 120);
    }

    #[test]
    fn test_message_strips_time_clause_and_names_pet() {
        let extractor = SuggestionExtractor::new();

        let with_pet = extractor.extract("Give the medication in 2 hours", Some("p1"));
        assert_eq!(with_pet[0].message, "Time to give the medication your pet");

        let without_pet = extractor.extract("Give the medication in 2 hours", None);
        assert_eq!(without_pet[0].message, "Time to give the medication them");
    }
}
