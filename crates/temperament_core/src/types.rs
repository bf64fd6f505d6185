//! Domain types shared by the classifier, the compositor and the stores.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Temperament ──────────────────────────────────────────────

/// One of the four top-level classifications on the hot/cold × humid/dry grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperament {
    Sanguine,
    Choleric,
    Melancholic,
    Phlegmatic,
}

impl Temperament {
    pub const ALL: [Temperament; 4] = [
        Temperament::Sanguine,
        Temperament::Choleric,
        Temperament::Melancholic,
        Temperament::Phlegmatic,
    ];

    /// Stored label. Reference tables are keyed by this value.
    pub fn label(&self) -> &'static str {
        match self {
            Temperament::Sanguine => "Sanguíneo",
            Temperament::Choleric => "Colérico",
            Temperament::Melancholic => "Melancólico",
            Temperament::Phlegmatic => "Fleumático",
        }
    }

    pub fn display_name(&self, lang: Language) -> &'static str {
        match lang {
            Language::Pt => self.label(),
            Language::En => match self {
                Temperament::Sanguine => "Sanguine",
                Temperament::Choleric => "Choleric",
                Temperament::Melancholic => "Melancholic",
                Temperament::Phlegmatic => "Phlegmatic",
            },
        }
    }

    /// Accepts the stored label or the English name.
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == s || t.display_name(Language::En).eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Temperament {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── SubTemperament ───────────────────────────────────────────

/// One of the twelve finer classifications voted in the last answer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubTemperament {
    Faisca,
    Fogo,
    Brasa,
    Pedra,
    Terra,
    Argila,
    Gelo,
    Agua,
    Vapor,
    Brisa,
    Ar,
    Vento,
}

impl SubTemperament {
    /// Declaration order. Vote ties resolve to the earliest entry, and the
    /// dial angle table is indexed by position in this array.
    pub const DECLARATION_ORDER: [SubTemperament; 12] = [
        SubTemperament::Faisca,
        SubTemperament::Fogo,
        SubTemperament::Brasa,
        SubTemperament::Pedra,
        SubTemperament::Terra,
        SubTemperament::Argila,
        SubTemperament::Gelo,
        SubTemperament::Agua,
        SubTemperament::Vapor,
        SubTemperament::Brisa,
        SubTemperament::Ar,
        SubTemperament::Vento,
    ];

    /// Answer token and stored label.
    pub fn label(&self) -> &'static str {
        match self {
            SubTemperament::Faisca => "Faisca",
            SubTemperament::Fogo => "Fogo",
            SubTemperament::Brasa => "Brasa",
            SubTemperament::Pedra => "Pedra",
            SubTemperament::Terra => "Terra",
            SubTemperament::Argila => "Argila",
            SubTemperament::Gelo => "Gelo",
            SubTemperament::Agua => "Água",
            SubTemperament::Vapor => "Vapor",
            SubTemperament::Brisa => "Brisa",
            SubTemperament::Ar => "Ar",
            SubTemperament::Vento => "Vento",
        }
    }

    pub fn display_name(&self, lang: Language) -> &'static str {
        match lang {
            Language::Pt => self.label(),
            Language::En => match self {
                SubTemperament::Faisca => "Spark",
                SubTemperament::Fogo => "Fire",
                SubTemperament::Brasa => "Ember",
                SubTemperament::Pedra => "Stone",
                SubTemperament::Terra => "Earth",
                SubTemperament::Argila => "Clay",
                SubTemperament::Gelo => "Ice",
                SubTemperament::Agua => "Water",
                SubTemperament::Vapor => "Steam",
                SubTemperament::Brisa => "Breeze",
                SubTemperament::Ar => "Air",
                SubTemperament::Vento => "Wind",
            },
        }
    }

    /// Position in [`Self::DECLARATION_ORDER`].
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::DECLARATION_ORDER.into_iter().find(|s2| s2.label() == s)
    }
}

impl std::fmt::Display for SubTemperament {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub temperament: Temperament,
    pub subtemperament: SubTemperament,
}

// ─── Language ─────────────────────────────────────────────────

/// Report language. Selects reference columns, labels and the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Language::En,
            _ => Language::Pt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }

    /// Name under which the report template is stored.
    pub fn template_name(&self) -> String {
        format!("template_{}", self.as_str())
    }
}

// ─── Records ──────────────────────────────────────────────────

/// Stored result identifier.
pub type ResultId = i64;

/// A validated submission ready to persist. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReportRecord {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
    pub test_date: NaiveDate,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub test_duration: String,
    pub age: u32,
    pub consent_terms: bool,
    pub consent_contact: bool,
    pub classification: Classification,
}

/// One completed test as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ResultId,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
    pub test_date: NaiveDate,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub test_duration: String,
    pub age: u32,
    pub consent_terms: bool,
    pub consent_contact: bool,
    pub classification: Classification,
    pub created_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn from_new(id: ResultId, new: NewReportRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            birth_date: new.birth_date,
            test_date: new.test_date,
            started_at: new.started_at,
            finished_at: new.finished_at,
            test_duration: new.test_duration,
            age: new.age,
            consent_terms: new.consent_terms,
            consent_contact: new.consent_contact,
            classification: new.classification,
            created_at,
        }
    }
}

// ─── Reference text ───────────────────────────────────────────

/// Long-form text for one temperament in one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperamentText {
    pub description: Option<String>,
    pub behavior: Option<String>,
    pub positive: Option<String>,
    pub caution: Option<String>,
    pub challenge: Option<String>,
    pub suggestion: Option<String>,
}

/// Everything the compositor reads from the reference store for one report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceText {
    pub temperament: Option<TemperamentText>,
    pub subtemperament_description: Option<String>,
    /// At most three related-character blurbs.
    pub characters: Vec<String>,
}
