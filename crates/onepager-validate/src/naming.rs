//! File and folder naming conventions of the one-pager storage
//!
//! Documents are named `"<FamilyName>, <Name>_<LOCALE>_<yyMMdd>.pptx"` and
//! live in per-employee folders named `<Name>_<FamilyName>_<EmployeeId>`.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use onepager_deck::Locale;
use regex::Regex;

/// Parsed one-pager file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnePagerFileName {
    pub family_name: String,
    pub name: String,
    pub locale: Locale,
    pub date: NaiveDate,
}

fn file_name_regex() -> &'static Regex {
    static FILE_NAME_RE: OnceLock<Regex> = OnceLock::new();
    FILE_NAME_RE.get_or_init(|| {
        Regex::new(r"(?i)^(.+), (.+)_(DE|EN)_(\d{2})(\d{2})(\d{2})\.pptx$").unwrap()
    })
}

impl OnePagerFileName {
    pub fn new(
        family_name: impl Into<String>,
        name: impl Into<String>,
        locale: Locale,
        date: NaiveDate,
    ) -> Self {
        Self {
            family_name: family_name.into(),
            name: name.into(),
            locale,
            date,
        }
    }

    /// Parse a file name; `None` if it does not follow the convention
    ///
    /// The two-digit year is read as 20yy.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = file_name_regex().captures(file_name)?;
        let locale = caps[3].parse::<Locale>().ok()?;
        let year: i32 = caps[4].parse().ok()?;
        let month: u32 = caps[5].parse().ok()?;
        let day: u32 = caps[6].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(2000 + year, month, day)?;

        Some(Self {
            family_name: caps[1].to_string(),
            name: caps[2].to_string(),
            locale,
            date,
        })
    }

    /// Whether a name matches the convention (date digits are not checked)
    pub fn matches(file_name: &str) -> bool {
        file_name_regex().is_match(file_name)
    }
}

impl std::fmt::Display for OnePagerFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}_{}_{:02}{:02}{:02}.pptx",
            self.family_name,
            self.name,
            self.locale,
            self.date.year().rem_euclid(100),
            self.date.month(),
            self.date.day()
        )
    }
}

/// Locale indicator embedded in a document name, e.g. `_DE_` or `_en.`
///
/// Looser than [`OnePagerFileName::parse`] so that badly named documents
/// still report their indicator.
pub fn locale_from_file_name(file_name: &str) -> Option<Locale> {
    if let Some(parsed) = OnePagerFileName::parse(file_name) {
        return Some(parsed.locale);
    }

    static INDICATOR_RE: OnceLock<Regex> = OnceLock::new();
    let re = INDICATOR_RE.get_or_init(|| Regex::new(r"(?i)_(DE|EN)(?:[_.]|$)").unwrap());
    re.captures(file_name)
        .and_then(|caps| caps[1].parse::<Locale>().ok())
}

/// Per-employee storage folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFolder {
    pub name: String,
    pub family_name: String,
    pub employee_id: String,
}

impl EmployeeFolder {
    /// Parse `<Name>_<FamilyName>_<EmployeeId>`; the id must be numeric
    pub fn parse(folder_name: &str) -> Option<Self> {
        let mut parts = folder_name.split('_');
        let name = parts.next()?;
        let family_name = parts.next()?;
        let employee_id = parts.next()?;
        if parts.next().is_some()
            || name.is_empty()
            || family_name.is_empty()
            || employee_id.is_empty()
            || !employee_id.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            family_name: family_name.to_string(),
            employee_id: employee_id.to_string(),
        })
    }
}

impl std::fmt::Display for EmployeeFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.name, self.family_name, self.employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_name() {
        let parsed = OnePagerFileName::parse("Mustermann, Max_DE_240131.pptx").unwrap();
        assert_eq!(parsed.family_name, "Mustermann");
        assert_eq!(parsed.name, "Max");
        assert_eq!(parsed.locale, Locale::De);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parsed = OnePagerFileName::parse("Doe, Jane_en_231005.PPTX").unwrap();
        assert_eq!(parsed.locale, Locale::En);
    }

    #[test]
    fn test_parse_rejects_invalid_names() {
        assert!(OnePagerFileName::parse("Max Mustermann.pptx").is_none());
        assert!(OnePagerFileName::parse("Mustermann, Max_FR_240131.pptx").is_none());
        assert!(OnePagerFileName::parse("Mustermann, Max_DE_241341.pptx").is_none());
        assert!(OnePagerFileName::parse("Mustermann, Max_DE_240131.docx").is_none());
    }

    #[test]
    fn test_format_file_name() {
        let name = OnePagerFileName::new(
            "Mustermann",
            "Max",
            Locale::En,
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        );
        assert_eq!(name.to_string(), "Mustermann, Max_EN_250307.pptx");
        assert_eq!(OnePagerFileName::parse(&name.to_string()), Some(name));
    }

    #[test]
    fn test_locale_from_loose_names() {
        assert_eq!(locale_from_file_name("Profil_EN.pptx"), Some(Locale::En));
        assert_eq!(locale_from_file_name("profil_de_final.pptx"), Some(Locale::De));
        assert_eq!(locale_from_file_name("Profil.pptx"), None);
        assert_eq!(locale_from_file_name("DESIGN_ENGINEER.pptx"), None);
    }

    #[test]
    fn test_employee_folder() {
        let folder = EmployeeFolder::parse("Max_Mustermann_4711").unwrap();
        assert_eq!(folder.employee_id, "4711");
        assert_eq!(folder.to_string(), "Max_Mustermann_4711");

        assert!(EmployeeFolder::parse("Max_Mustermann").is_none());
        assert!(EmployeeFolder::parse("Max_Mustermann_abc").is_none());
        assert!(EmployeeFolder::parse("Max_Mustermann_47_11").is_none());
    }
}
