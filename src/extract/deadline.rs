//! Deadline phrase normalisation.
//!
//! Recognises a closed set of phrases and maps them to a calendar day relative
//! to a reference date. Anything else resolves to `None`.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

/// Longest phrase, in words, tried after a trigger word.
const MAX_PHRASE_WORDS: usize = 5;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

lazy_static! {
    static ref SPAN: Regex =
        Regex::new(r"^(?:in|within)\s+(\d+|a|an|one|two|three|four|five|six|seven|eight|nine|ten)\s+(day|week|month)s?$")
            .expect("span regex");
    static ref TRIGGER: Regex =
        Regex::new(r"(?i)\b(by|before|until|till|on|due|in|within|deadline\s*:?)\s+")
            .expect("trigger regex");
}

/// Resolve a complete phrase such as `"by Friday"`, `"within 3 days"` or
/// `"2025-08-15"` against `today`.
#[must_use]
pub fn resolve(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let phrase = normalise(phrase);
    let phrase = strip_leading_prepositions(&phrase);
    if phrase.is_empty() {
        return None;
    }

    match phrase {
        "today" | "tonight" | "eod" | "end of day" | "end of the day" => return Some(today),
        "tomorrow" => return today.checked_add_days(Days::new(1)),
        "day after tomorrow" | "the day after tomorrow" => {
            return today.checked_add_days(Days::new(2));
        }
        "next week" => return today.checked_add_days(Days::new(7)),
        "next month" => return today.checked_add_months(Months::new(1)),
        "end of week" | "end of the week" | "this weekend" | "the weekend" => {
            return Some(upcoming(today, Weekday::Sun, true));
        }
        "end of month" | "end of the month" => return last_day_of_month(today),
        _ => {}
    }

    if let Some(date) = resolve_span(phrase, today) {
        return Some(date);
    }

    let weekday_word = phrase
        .strip_prefix("this ")
        .or_else(|| phrase.strip_prefix("next "))
        .or_else(|| phrase.strip_prefix("coming "))
        .unwrap_or(phrase);
    if let Ok(weekday) = Weekday::from_str(weekday_word) {
        return Some(upcoming(today, weekday, false));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(phrase, fmt).ok())
}

/// Try the leading words of `text`, longest first, and return the words that
/// resolved together with the date.
#[must_use]
pub fn resolve_leading(text: &str, today: NaiveDate) -> Option<(String, NaiveDate)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let longest = words.len().min(MAX_PHRASE_WORDS);
    (1..=longest).rev().find_map(|n| {
        let candidate = normalise(&words[..n].join(" "));
        resolve(&candidate, today).map(|date| (candidate, date))
    })
}

/// Scan free text for `by …`, `before …`, `within …`, `deadline: …` style
/// phrases; the first one that resolves wins.
#[must_use]
pub fn scan_text(text: &str, today: NaiveDate) -> Option<(String, NaiveDate)> {
    TRIGGER.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let trigger = caps.get(1)?.as_str().to_lowercase();
        let rest = &text[whole.end()..];
        let rest = rest
            .split(['.', ';', '!', '\n'])
            .next()
            .unwrap_or_default();
        if trigger == "in" || trigger == "within" {
            resolve_leading(&format!("{} {}", trigger, rest), today)
        } else {
            resolve_leading(rest, today)
        }
    })
}

fn normalise(phrase: &str) -> String {
    phrase
        .trim()
        .trim_end_matches(|c: char| c == ',' || c == '.' || c == '!' || c == ';' || c == '?')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_leading_prepositions(phrase: &str) -> &str {
    let mut rest = phrase;
    loop {
        let stripped = ["by ", "before ", "until ", "till ", "on ", "due ", "deadline: ", "deadline "]
            .iter()
            .find_map(|p| rest.strip_prefix(p));
        match stripped {
            Some(next) => rest = next.trim_start(),
            None => return rest,
        }
    }
}

fn resolve_span(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = SPAN.captures(phrase)?;
    let count: u32 = match caps.get(1)?.as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().ok()?,
    };
    match caps.get(2)?.as_str() {
        "day" => today.checked_add_days(Days::new(u64::from(count))),
        "week" => today.checked_add_days(Days::new(u64::from(count) * 7)),
        "month" => today.checked_add_months(Months::new(count)),
        _ => None,
    }
}

/// Next `weekday` after `today`. With `include_today`, today itself counts.
fn upcoming(today: NaiveDate, weekday: Weekday, include_today: bool) -> NaiveDate {
    let from = today.weekday().num_days_from_monday();
    let to = weekday.num_days_from_monday();
    let mut ahead = (7 + to - from) % 7;
    if ahead == 0 && !include_today {
        ahead = 7;
    }
    today + Days::new(u64::from(ahead))
}

fn last_day_of_month(today: NaiveDate) -> Option<NaiveDate> {
    let first = today.with_day(1)?;
    first
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Monday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 11).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(resolve("today", today()), ymd(2025, 8, 11));
        assert_eq!(resolve("Tomorrow", today()), ymd(2025, 8, 12));
        assert_eq!(resolve("day after tomorrow", today()), ymd(2025, 8, 13));
        assert_eq!(resolve("by tomorrow.", today()), ymd(2025, 8, 12));
    }

    #[test]
    fn test_weekdays_are_strictly_in_the_future() {
        assert_eq!(resolve("Friday", today()), ymd(2025, 8, 15));
        assert_eq!(resolve("by friday", today()), ymd(2025, 8, 15));
        assert_eq!(resolve("next Monday", today()), ymd(2025, 8, 18));
        assert_eq!(resolve("monday", today()), ymd(2025, 8, 18));
        assert_eq!(resolve("on Sun", today()), ymd(2025, 8, 17));
    }

    #[test]
    fn test_spans() {
        assert_eq!(resolve("within 3 days", today()), ymd(2025, 8, 14));
        assert_eq!(resolve("in two weeks", today()), ymd(2025, 8, 25));
        assert_eq!(resolve("within a month", today()), ymd(2025, 9, 11));
        assert_eq!(resolve("in 1 day", today()), ymd(2025, 8, 12));
    }

    #[test]
    fn test_end_of_periods() {
        assert_eq!(resolve("end of week", today()), ymd(2025, 8, 17));
        assert_eq!(resolve("by end of the month", today()), ymd(2025, 8, 31));
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(resolve("end of month", feb), ymd(2024, 2, 29));
    }

    #[test]
    fn test_explicit_dates() {
        assert_eq!(resolve("2025-09-01", today()), ymd(2025, 9, 1));
        assert_eq!(resolve("01/09/2025", today()), ymd(2025, 9, 1));
        assert_eq!(resolve("by 15 August 2025", today()), ymd(2025, 8, 15));
        assert_eq!(resolve("Aug 20, 2025", today()), ymd(2025, 8, 20));
    }

    #[test]
    fn test_unrecognised_phrases() {
        assert_eq!(resolve("soon", today()), None);
        assert_eq!(resolve("whenever you can", today()), None);
        assert_eq!(resolve("", today()), None);
        assert_eq!(resolve("by", today()), None);
    }

    #[test]
    fn test_resolve_leading_drops_trailing_words() {
        let (phrase, date) = resolve_leading("Friday evening please", today()).unwrap();
        assert_eq!(phrase, "friday");
        assert_eq!(Some(date), ymd(2025, 8, 15));
    }

    #[test]
    fn test_scan_text_finds_trigger_phrases() {
        let (phrase, date) =
            scan_text("I'll design a logo by Friday, you'll pay ₹2000", today()).unwrap();
        assert_eq!(phrase, "friday");
        assert_eq!(Some(date), ymd(2025, 8, 15));

        let (phrase, date) = scan_text("Deliver the photos within 3 days.", today()).unwrap();
        assert_eq!(phrase, "within 3 days");
        assert_eq!(Some(date), ymd(2025, 8, 14));

        let (_, date) = scan_text("Deadline: 2025-12-01. Payment after.", today()).unwrap();
        assert_eq!(Some(date), ymd(2025, 12, 1));
    }

    #[test]
    fn test_scan_text_skips_non_deadline_triggers() {
        let (_, date) = scan_text("Put it in the folder by tomorrow", today()).unwrap();
        assert_eq!(Some(date), ymd(2025, 8, 12));
        assert!(scan_text("Pay $50 for the report", today()).is_none());
    }
}
