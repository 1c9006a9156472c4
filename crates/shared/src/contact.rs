use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, protocol::ContactSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "~50万円")]
    UpTo500k,
    #[serde(rename = "50-100万円")]
    From500kTo1m,
    #[serde(rename = "100-300万円")]
    From1mTo3m,
    #[serde(rename = "300-500万円")]
    From3mTo5m,
    #[serde(rename = "500万円~")]
    Over5m,
    #[serde(rename = "相談して決めたい")]
    ToBeDiscussed,
}

impl BudgetRange {
    pub const ALL: [BudgetRange; 6] = [
        BudgetRange::UpTo500k,
        BudgetRange::From500kTo1m,
        BudgetRange::From1mTo3m,
        BudgetRange::From3mTo5m,
        BudgetRange::Over5m,
        BudgetRange::ToBeDiscussed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BudgetRange::UpTo500k => "~50万円",
            BudgetRange::From500kTo1m => "50-100万円",
            BudgetRange::From1mTo3m => "100-300万円",
            BudgetRange::From3mTo5m => "300-500万円",
            BudgetRange::Over5m => "500万円~",
            BudgetRange::ToBeDiscussed => "相談して決めたい",
        }
    }

    /// Empty or unknown labels mean "no selection".
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|range| range.label() == label)
    }
}

impl fmt::Display for BudgetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form field names as they appear in the contact form markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Name,
    Email,
    Company,
    Budget,
    Message,
    Privacy,
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "name" => Ok(FieldKey::Name),
            "email" => Ok(FieldKey::Email),
            "company" => Ok(FieldKey::Company),
            "budget" => Ok(FieldKey::Budget),
            "message" => Ok(FieldKey::Message),
            "privacy" => Ok(FieldKey::Privacy),
            other => Err(format!("unknown contact field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Checked(checked) => checked.to_string(),
        }
    }

    fn into_checked(self) -> bool {
        match self {
            FieldValue::Checked(checked) => checked,
            FieldValue::Text(text) => matches!(text.trim(), "on" | "true"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checked(value)
    }
}

/// In-progress contact form entry, owned by one client session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub budget: Option<BudgetRange>,
    pub message: String,
    pub privacy: bool,
}

impl ContactDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes one field, coercing the value to the field's type. Never fails.
    pub fn apply(&mut self, key: FieldKey, value: FieldValue) {
        match key {
            FieldKey::Name => self.name = value.into_text(),
            FieldKey::Email => self.email = value.into_text(),
            FieldKey::Company => self.company = value.into_text(),
            FieldKey::Budget => self.budget = BudgetRange::from_label(&value.into_text()),
            FieldKey::Message => self.message = value.into_text(),
            FieldKey::Privacy => self.privacy = value.into_checked(),
        }
    }

    /// Consent is checked before the required text fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.privacy {
            return Err(ValidationError::ConsentRequired);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        Ok(())
    }

    pub fn to_submission(&self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            budget: self
                .budget
                .map(|range| range.label().to_string())
                .unwrap_or_default(),
            message: self.message.clone(),
            privacy: self.privacy,
        }
    }
}

/// Basic `local@domain.tld` shape, the same bar a browser `type="email"` input sets.
pub fn is_plausible_email(raw: &str) -> bool {
    let email = raw.trim();
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.starts_with('.')
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
