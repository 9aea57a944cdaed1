use serde::Serialize;

/// Trainee text is untrusted; the gate turns unusable input into feedback instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseGate {
    minimum_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    Blank,
    TooShort { minimum: usize, actual: usize },
}

impl ValidationIssue {
    pub fn feedback(&self) -> String {
        match self {
            ValidationIssue::Blank => {
                "No response detected. Speak or type your answer to the prospect.".to_string()
            }
            ValidationIssue::TooShort { minimum, .. } => format!(
                "Try to provide a more complete response (at least {minimum} characters)."
            ),
        }
    }
}

impl ResponseGate {
    /// Blank input is always rejected; `minimum_length` counts characters after trimming.
    pub fn new(minimum_length: usize) -> Self {
        Self {
            minimum_length: minimum_length.max(1),
        }
    }

    pub fn minimum_length(&self) -> usize {
        self.minimum_length
    }

    /// Returns the lower-cased response when it is long enough to evaluate.
    pub fn admit(&self, response: &str) -> Result<String, ValidationIssue> {
        let trimmed = response.trim();
        if trimmed.is_empty() {
            return Err(ValidationIssue::Blank);
        }
        let actual = trimmed.chars().count();
        if actual < self.minimum_length {
            return Err(ValidationIssue::TooShort {
                minimum: self.minimum_length,
                actual,
            });
        }
        Ok(trimmed.to_lowercase())
    }
}

impl Default for ResponseGate {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_short_input() {
        let gate = ResponseGate::new(10);
        assert_eq!(gate.admit("   \n"), Err(ValidationIssue::Blank));
        assert_eq!(
            gate.admit(" okay "),
            Err(ValidationIssue::TooShort {
                minimum: 10,
                actual: 4
            })
        );
        assert_eq!(
            gate.admit("I Understand Completely").as_deref(),
            Ok("i understand completely")
        );
    }

    #[test]
    fn zero_minimum_still_rejects_blank() {
        let gate = ResponseGate::new(0);
        assert_eq!(gate.minimum_length(), 1);
        assert_eq!(gate.admit(""), Err(ValidationIssue::Blank));
        assert!(gate.admit("a").is_ok());
    }
}
