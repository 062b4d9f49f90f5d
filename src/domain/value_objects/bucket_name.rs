use crate::domain::errors::ValidationError;

/// A validated S3 bucket name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Create a new BucketName, enforcing the S3 naming rules: 3-63
    /// characters, lowercase letters/digits/hyphens, letter-or-digit
    /// endpoints, no consecutive hyphens, not shaped like an IP address.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.len() < 3 {
            return Err(ValidationError::BucketNameTooShort {
                actual: value.len(),
                min: 3,
            });
        }
        if value.len() > 63 {
            return Err(ValidationError::BucketNameTooLong {
                actual: value.len(),
                max: 63,
            });
        }

        let is_endpoint_char = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
        if !value.chars().next().is_some_and(is_endpoint_char) {
            return Err(ValidationError::BucketNameInvalidStart);
        }
        if !value.chars().last().is_some_and(is_endpoint_char) {
            return Err(ValidationError::BucketNameInvalidEnd);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(ValidationError::BucketNameInvalidCharacter(c));
        }

        if value.contains("--") {
            return Err(ValidationError::BucketNameConsecutiveHyphens);
        }

        let octets: Vec<&str> = value.split('.').collect();
        if octets.len() == 4 && octets.iter().all(|part| part.parse::<u8>().is_ok()) {
            return Err(ValidationError::BucketNameLooksLikeIpAddress);
        }

        Ok(Self(value))
    }

    /// Get the bucket name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bucket_names() {
        assert!(BucketName::new("version-history".to_string()).is_ok());
        assert!(BucketName::new("docs2024".to_string()).is_ok());
        assert!(BucketName::new("0backups".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_bucket_names() {
        assert!(BucketName::new("ab".to_string()).is_err());
        assert!(BucketName::new("a".repeat(64)).is_err());
        assert!(BucketName::new("-docs".to_string()).is_err());
        assert!(BucketName::new("docs-".to_string()).is_err());
        assert!(BucketName::new("Docs".to_string()).is_err());
        assert!(BucketName::new("my_docs".to_string()).is_err());
        assert!(BucketName::new("my--docs".to_string()).is_err());
        assert!(BucketName::new("10.0.0.1".to_string()).is_err());
    }
}
