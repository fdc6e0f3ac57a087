//! Registration validation schema.
//!
//! One rule table drives both call sites: [`RegistrationSchema::validate_field`]
//! gives per-field feedback while a form is being filled in, and
//! [`RegistrationSchema::parse`] runs every rule at once as the server-side gate.
//! Fields are checked independently and all issues are reported together.

use crate::reference;
use crate::registration::NewRegistration;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static LETTERS_AND_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\s]+$").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// A registration form field, serialized with its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Age,
    Email,
    Country,
    State,
    Industry,
}

impl Field {
    pub const ALL: [Self; 6] =
        [Self::FullName, Self::Age, Self::Email, Self::Country, Self::State, Self::Industry];

    /// Name of the field in JSON submissions.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Age => "age",
            Self::Email => "email",
            Self::Country => "country",
            Self::State => "state",
            Self::Industry => "industry",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    fn rule(self) -> &'static FieldRule {
        &RULES[self as usize]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: Field,
    pub message: &'static str,
}

/// Every issue found in a submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// Messages reported for `field`.
    pub fn messages(&self, field: Field) -> impl Iterator<Item = &'static str> + '_ {
        self.issues.iter().filter(move |issue| issue.field == field).map(|issue| issue.message)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", issue.field, issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug)]
enum Check {
    Text {
        min: (usize, &'static str),
        max: Option<(usize, &'static str)>,
        letters_only: Option<&'static str>,
    },
    WholeNumber {
        min: (i64, &'static str),
        max: (i64, &'static str),
        fraction: &'static str,
    },
    Email {
        invalid: &'static str,
    },
}

#[derive(Debug)]
struct FieldRule {
    /// Reported when the value is absent or has the wrong JSON type.
    missing: &'static str,
    check: Check,
}

/// Indexed by `Field as usize`.
static RULES: [FieldRule; 6] = [
    FieldRule {
        missing: "Full name is required",
        check: Check::Text {
            min: (2, "Full name must be at least 2 characters long"),
            max: Some((100, "Full name cannot exceed 100 characters")),
            letters_only: Some("Full name can only contain letters and spaces"),
        },
    },
    FieldRule {
        missing: "Age must be a number",
        check: Check::WholeNumber {
            min: (13, "Age must be at least 13"),
            max: (120, "Age cannot exceed 120"),
            fraction: "Age must be a whole number",
        },
    },
    FieldRule {
        missing: "Email is required",
        check: Check::Email { invalid: "Please provide a valid email address" },
    },
    FieldRule {
        missing: "Country is required",
        check: Check::Text { min: (1, "Please select a country"), max: None, letters_only: None },
    },
    FieldRule {
        missing: "State is required",
        check: Check::Text {
            min: (1, "Please select a state/province"),
            max: None,
            letters_only: None,
        },
    },
    FieldRule {
        missing: "Industry is required",
        check: Check::Text {
            min: (2, "Industry is required"),
            max: Some((60, "Industry name is too long")),
            letters_only: None,
        },
    },
];

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Number(i64),
}

impl FieldValue {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl FieldRule {
    #[allow(clippy::cast_precision_loss)]
    fn apply(&self, field: Field, value: Option<&Value>) -> Result<FieldValue, Vec<ValidationIssue>> {
        let issue = |message| ValidationIssue { field, message };
        let mut issues = Vec::new();

        let parsed = match (&self.check, value) {
            (Check::Text { min, max, letters_only }, Some(Value::String(text))) => {
                let len = text.chars().count();
                if len < min.0 {
                    issues.push(issue(min.1));
                }
                if let Some((limit, message)) = max
                    && len > *limit
                {
                    issues.push(issue(*message));
                }
                if let Some(message) = letters_only
                    && !LETTERS_AND_SPACES.is_match(text)
                {
                    issues.push(issue(*message));
                }
                FieldValue::Text(text.clone())
            },
            (Check::Email { invalid }, Some(Value::String(text))) => {
                if !is_email(text) {
                    issues.push(issue(*invalid));
                }
                FieldValue::Text(text.to_lowercase())
            },
            (Check::WholeNumber { min, max, fraction }, Some(Value::Number(number))) => {
                match number.as_i64().or_else(|| number.as_f64().and_then(whole_float)) {
                    Some(n) => {
                        if n < min.0 {
                            issues.push(issue(min.1));
                        }
                        if n > max.0 {
                            issues.push(issue(max.1));
                        }
                        FieldValue::Number(n)
                    },
                    None => {
                        let approx = number.as_f64().unwrap_or(f64::NAN);
                        if approx.fract() != 0.0 {
                            issues.push(issue(*fraction));
                        }
                        if approx < min.0 as f64 {
                            issues.push(issue(min.1));
                        }
                        if approx > max.0 as f64 {
                            issues.push(issue(max.1));
                        }
                        FieldValue::Number(0)
                    },
                }
            },
            _ => return Err(vec![issue(self.missing)]),
        };

        if issues.is_empty() { Ok(parsed) } else { Err(issues) }
    }
}

/// Floats such as `30.0` count as whole numbers.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_float(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then(|| value as i64)
}

fn is_email(text: &str) -> bool {
    !text.starts_with('.') && !text.contains("..") && EMAIL.is_match(text)
}

/// The registration validation schema.
///
/// The default schema accepts any non-empty country and state. [`RegistrationSchema::strict`]
/// additionally requires a known country code and a state belonging to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationSchema {
    strict_regions: bool,
}

impl RegistrationSchema {
    #[must_use]
    pub const fn new() -> Self {
        Self { strict_regions: false }
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self { strict_regions: true }
    }

    #[must_use]
    pub const fn with_strict_regions(strict_regions: bool) -> Self {
        Self { strict_regions }
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict_regions
    }

    /// Checks a single field value in isolation.
    ///
    /// Region membership needs both country and state, so it is only checked by [`parse`](Self::parse).
    ///
    /// # Errors
    /// Returns the issues found for `field`.
    pub fn validate_field(&self, field: Field, value: &Value) -> Result<(), ValidationErrors> {
        field.rule().apply(field, Some(value)).map(drop).map_err(|issues| ValidationErrors { issues })
    }

    /// Validates a whole submission and returns the normalized registration.
    ///
    /// Unknown keys are ignored. A non-object input reports every field as missing.
    ///
    /// # Errors
    /// Returns every issue across all fields.
    pub fn parse(&self, input: &Value) -> Result<NewRegistration, ValidationErrors> {
        let mut issues = Vec::new();
        let [full_name, age, email, country, state, industry] = Field::ALL.map(|field| {
            field.rule().apply(field, input.get(field.key())).map_err(|found| issues.extend(found)).ok()
        });

        if self.strict_regions
            && let (Some(FieldValue::Text(country)), Some(FieldValue::Text(state))) =
                (&country, &state)
        {
            match reference::country_by_code(country) {
                None => issues.push(ValidationIssue {
                    field: Field::Country,
                    message: Field::Country.rule().check.min_message(),
                }),
                Some(known) if !known.states.contains(&state.as_str()) => {
                    issues.push(ValidationIssue {
                        field: Field::State,
                        message: Field::State.rule().check.min_message(),
                    });
                },
                Some(_) => {},
            }
        }

        if !issues.is_empty() {
            return Err(ValidationErrors { issues });
        }

        let assembled = (|| {
            Some(NewRegistration {
                full_name: full_name?.into_text()?,
                age: age?.as_number()?,
                email: email?.into_text()?,
                country: country?.into_text()?,
                state: state?.into_text()?,
                industry: industry?.into_text()?,
            })
        })();

        assembled.ok_or_else(|| ValidationErrors { issues })
    }
}

impl Check {
    /// The "please select" style message of a text rule.
    fn min_message(&self) -> &'static str {
        match self {
            Self::Text { min, .. } => min.1,
            Self::WholeNumber { min, .. } => min.1,
            Self::Email { invalid } => *invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rules_are_indexed_by_field() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::Age.rule().missing, "Age must be a number");
        assert_eq!(Field::Industry.rule().missing, "Industry is required");
    }

    #[test]
    fn email_syntax() {
        for ok in ["a@b.co", "first.last+tag@sub.example.org", "O'Neil@example.ie"] {
            assert!(is_email(ok), "{ok}");
        }
        for bad in [
            "plainaddress",
            "@example.com",
            "a@b",
            ".a@example.com",
            "a..b@example.com",
            "a@-b.com",
            "a.@example.com",
        ] {
            assert!(!is_email(bad), "{bad}");
        }
    }

    #[test]
    fn fractional_age_reports_every_failed_bound() {
        let err = RegistrationSchema::new().validate_field(Field::Age, &json!(12.5)).unwrap_err();
        let messages: Vec<_> = err.messages(Field::Age).collect();
        assert_eq!(messages, ["Age must be a whole number", "Age must be at least 13"]);
    }

    #[test]
    fn integral_float_age_is_accepted() {
        let schema = RegistrationSchema::new();
        assert!(schema.validate_field(Field::Age, &json!(30.0)).is_ok());
        assert!(schema.validate_field(Field::Age, &json!(30)).is_ok());
    }
}
