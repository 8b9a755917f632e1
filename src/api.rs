//! Backend response envelope.
//!
//! Every endpoint of the portal backend answers with the same wrapper:
//! `{ "Succeeded": bool, "Result": T, "Errors": [string] }`.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A decoded response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub succeeded: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope from a JSON body.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning a failed envelope into an error.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.succeeded {
            return Err(ApiError::Rejected(self.errors));
        }
        self.result.ok_or(ApiError::MissingResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Subject {
        id: u32,
        name: String,
    }

    #[test]
    fn test_success() {
        let body = r#"{"Succeeded":true,"Result":{"Id":3,"Name":"Algebra"},"Errors":[]}"#;
        let subject = Envelope::<Subject>::from_json(body)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(
            subject,
            Subject {
                id: 3,
                name: "Algebra".into()
            }
        );
    }

    #[test]
    fn test_rejected() {
        let body = r#"{"Succeeded":false,"Result":null,"Errors":["Name is required","Too long"]}"#;
        let err = Envelope::<Subject>::from_json(body)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: Name is required; Too long");
    }

    #[test]
    fn test_missing_result() {
        let body = r#"{"Succeeded":true}"#;
        let err = Envelope::<Subject>::from_json(body)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingResult));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Envelope::<Subject>::from_json("not json"),
            Err(ApiError::Json(_))
        ));
    }
}
