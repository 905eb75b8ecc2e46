//! Best-effort extraction of structured fields from free-text agreement terms.
//!
//! Nothing in here fails. A field that cannot be found is `None` (or an empty
//! list), and callers must read that as "unknown", never as zero.

pub mod deadline;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Currency recognised next to a payment amount. Serialised as its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "₹")]
    Rupee,
    #[serde(rename = "$")]
    Dollar,
    #[serde(rename = "€")]
    Euro,
    #[serde(rename = "£")]
    Pound,
}

impl Currency {
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Rupee => "₹",
            Currency::Dollar => "$",
            Currency::Euro => "€",
            Currency::Pound => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Rupee => "INR",
            Currency::Dollar => "USD",
            Currency::Euro => "EUR",
            Currency::Pound => "GBP",
        }
    }

    fn from_marker(marker: &str) -> Option<Self> {
        let marker = marker.trim().trim_end_matches('.').to_lowercase();
        match marker.as_str() {
            "₹" | "rs" | "inr" | "rupee" | "rupees" => Some(Currency::Rupee),
            "$" | "usd" | "dollar" | "dollars" | "bucks" => Some(Currency::Dollar),
            "€" | "eur" | "euro" | "euros" => Some(Currency::Euro),
            "£" | "gbp" | "pound" | "pounds" => Some(Currency::Pound),
            _ => None,
        }
    }
}

/// Fields derived from an agreement's terms at creation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    /// Deadline normalised to a calendar day.
    pub deadline: Option<NaiveDate>,
    /// The phrase the deadline was read from, or the unrecognised deadline
    /// argument kept verbatim.
    pub deadline_phrase: Option<String>,
    pub task: Option<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// A payment found in free text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payment {
    pub amount: f64,
    pub currency: Currency,
}

const NUMBER: &str = r"\d+(?:,\d+)*(?:\.\d+)?";

lazy_static! {
    static ref MARKER_BEFORE_AMOUNT: Regex = Regex::new(&format!(
        r"(?i)(₹|\$|€|£|\b(?:rs\.?|inr|usd|eur|gbp|rupees?|dollars?|euros?|pounds?))\s*({})",
        NUMBER
    ))
    .expect("payment prefix regex");
    static ref MARKER_AFTER_AMOUNT: Regex = Regex::new(&format!(
        r"(?i)({})\s*(₹|\$|€|£|(?:rupees?|rs|inr|usd|dollars?|bucks|eur|euros?|gbp|pounds?)\b)",
        NUMBER
    ))
    .expect("payment suffix regex");
    static ref TASK_LABEL: Regex =
        Regex::new(r"(?i)\btask\s*:\s*([^.\n]+)").expect("task label regex");
    static ref FIRST_PERSON_PROMISE: Regex = Regex::new(
        r"(?i)\bi(?:'ll|’ll|\s+will)\s+(.+?)(?:\s+(?:by|before|within|for)\b|[,.;!]|$)"
    )
    .expect("promise regex");
    static ref WORK_PHRASE: Regex = Regex::new(
        r"(?i)\b((?:design|create|build|deliver|complete|write|fix|develop|make|paint|translate|edit|review|teach|help)\b[^,.;!]*?)(?:\s+(?:by|before|within|for)\b|[,.;!]|$)"
    )
    .expect("work phrase regex");
}

/// Extract every structured field from `terms` and the explicit `deadline`
/// argument. Relative deadlines resolve against `today`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use quickpact::extract::{Currency, extract_fields};
///
/// // 2025-08-11 is a Monday
/// let today = NaiveDate::from_ymd_opt(2025, 8, 11).unwrap();
/// let fields = extract_fields("I'll design a logo by Friday, you'll pay ₹2000", "", today);
/// assert_eq!(fields.amount, Some(2000.0));
/// assert_eq!(fields.currency, Some(Currency::Rupee));
/// assert_eq!(fields.deadline, NaiveDate::from_ymd_opt(2025, 8, 15));
/// assert_eq!(fields.task.as_deref(), Some("design a logo"));
/// ```
#[must_use]
pub fn extract_fields(terms: &str, deadline_text: &str, today: NaiveDate) -> ExtractedFields {
    let payment = extract_payment(terms);
    let (deadline_phrase, deadline) = extract_deadline(terms, deadline_text, today);
    let task = extract_task(terms);
    let deliverables = extract_deliverables(terms);

    debug!(
        has_payment = payment.is_some(),
        has_deadline = deadline.is_some(),
        deliverables = deliverables.len(),
        "extracted agreement fields"
    );

    ExtractedFields {
        amount: payment.map(|p| p.amount),
        currency: payment.map(|p| p.currency),
        deadline,
        deadline_phrase,
        task,
        deliverables,
    }
}

/// First amount in `text` that carries a currency marker on either side.
#[must_use]
pub fn extract_payment(text: &str) -> Option<Payment> {
    let before = MARKER_BEFORE_AMOUNT
        .captures(text)
        .and_then(|c| Some((c.get(0)?.start(), c.get(1)?.as_str(), c.get(2)?.as_str())));
    let after = MARKER_AFTER_AMOUNT
        .captures(text)
        .and_then(|c| Some((c.get(0)?.start(), c.get(2)?.as_str(), c.get(1)?.as_str())));

    let (_, marker, number) = match (before, after) {
        (Some(b), Some(a)) => {
            if a.0 < b.0 {
                a
            } else {
                b
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };

    let currency = Currency::from_marker(marker)?;
    let amount = number.replace(',', "").parse::<f64>().ok()?;
    Some(Payment { amount, currency })
}

/// The deadline argument wins when it resolves; otherwise the terms are
/// scanned. An unresolvable argument is still reported as the phrase.
fn extract_deadline(
    terms: &str,
    deadline_text: &str,
    today: NaiveDate,
) -> (Option<String>, Option<NaiveDate>) {
    let explicit = deadline_text.trim();
    if !explicit.is_empty() {
        if let Some((phrase, date)) = deadline::resolve_leading(explicit, today) {
            return (Some(phrase), Some(date));
        }
    }
    if let Some((phrase, date)) = deadline::scan_text(terms, today) {
        return (Some(phrase), Some(date));
    }
    let verbatim = (!explicit.is_empty()).then(|| explicit.to_string());
    (verbatim, None)
}

/// An explicit `task:` label, else a first-person promise ("I'll …"), else
/// the whole terms string.
#[must_use]
pub fn extract_task(terms: &str) -> Option<String> {
    let labelled = TASK_LABEL
        .captures(terms)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    let promised = || {
        FIRST_PERSON_PROMISE
            .captures(terms)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };
    labelled
        .filter(|t| !t.is_empty())
        .or_else(|| promised().filter(|t| !t.is_empty()))
        .or_else(|| {
            let whole = terms.trim();
            (!whole.is_empty()).then(|| whole.to_string())
        })
}

/// Work phrases ("design a logo", "deliver the report"), de-duplicated
/// case-insensitively, in order of appearance.
#[must_use]
pub fn extract_deliverables(terms: &str) -> Vec<String> {
    let mut deliverables: Vec<String> = Vec::new();
    let promises = FIRST_PERSON_PROMISE
        .captures_iter(terms)
        .filter_map(|c| c.get(1).map(|m| (m.start(), m.as_str())));
    let phrases = WORK_PHRASE
        .captures_iter(terms)
        .filter_map(|c| c.get(1).map(|m| (m.start(), m.as_str())));

    let mut found: Vec<(usize, &str)> = promises.chain(phrases).collect();
    found.sort_by_key(|(start, _)| *start);

    for (_, phrase) in found {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            continue;
        }
        if !deliverables
            .iter()
            .any(|d| d.eq_ignore_ascii_case(phrase))
        {
            deliverables.push(phrase.to_string());
        }
    }
    deliverables
}
