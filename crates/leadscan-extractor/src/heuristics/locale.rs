use crate::error::{ExtractionError, Result};
use leadscan_core::{ConfigError, LocaleConfig};
use regex::Regex;

/// Compiled locale policy for the text-based heuristics.
#[derive(Debug, Clone)]
pub struct PhoneLocale {
    name: String,
    boilerplate: Option<Regex>,
    address: Option<Regex>,
    postal_code: Regex,
    phone: Regex,
}

impl PhoneLocale {
    /// Compile the locale policy from configuration.
    pub fn from_config(config: &LocaleConfig) -> Result<Self> {
        let boilerplate = word_alternation(&config.boilerplate_words, true)
            .map(|pattern| compile("locale.boilerplate_words", &pattern))
            .transpose()?;
        let address = word_alternation(&config.address_keywords, false)
            .map(|pattern| compile("locale.address_keywords", &pattern))
            .transpose()?;

        Ok(Self {
            name: config.name.clone(),
            boilerplate,
            address,
            postal_code: compile("locale.postal_code_pattern", &config.postal_code_pattern)?,
            phone: compile("locale.phone_pattern", &config.phone_pattern)?,
        })
    }

    /// Brazilian Portuguese vocabulary and numbering plan.
    pub fn pt_br() -> Self {
        Self::from_config(&LocaleConfig::default()).expect("default locale patterns are valid")
    }

    /// Locale name, e.g. `pt-BR`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove boilerplate words ("copy", "phone", ...) from a control label.
    pub fn strip_boilerplate(&self, label: &str) -> String {
        match &self.boilerplate {
            Some(re) => re.replace_all(label, " ").into_owned(),
            None => label.to_string(),
        }
    }

    /// Whether `line` contains an address keyword.
    pub fn is_address_line(&self, line: &str) -> bool {
        self.address.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Remove postal-code shaped tokens from `line`.
    pub fn strip_postal_codes(&self, line: &str) -> String {
        self.postal_code.replace_all(line, "").into_owned()
    }

    /// First phone-shaped substring whose digit count is within `bounds` and
    /// which is not part of a longer run of digits.
    pub fn find_phone(&self, text: &str, bounds: (usize, usize)) -> Option<String> {
        let bytes = text.as_bytes();
        self.phone
            .find_iter(text)
            .filter(|m| {
                let before = m.start().checked_sub(1).map(|i| bytes[i]);
                let after = bytes.get(m.end()).copied();
                !before.is_some_and(|b| b.is_ascii_digit())
                    && !after.is_some_and(|b| b.is_ascii_digit())
            })
            .map(|m| m.as_str().trim().to_string())
            .find(|candidate| {
                let digits = digit_count(candidate);
                digits >= bounds.0 && digits <= bounds.1
            })
    }
}

/// Number of ASCII digits in `text`.
pub fn digit_count(text: &str) -> usize {
    text.chars().filter(char::is_ascii_digit).count()
}

fn word_alternation(words: &[String], whole_words: bool) -> Option<String> {
    let escaped: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return None;
    }
    let alternation = escaped.join("|");
    Some(if whole_words {
        format!(r"(?i)\b(?:{alternation})\b")
    } else {
        format!(r"(?i)(?:{alternation})")
    })
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        ExtractionError::Config(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
    })
}
