use serde::{Deserialize, Deserializer, Serialize};

use crate::jobs::repo_types::Job;

/// Body of job create and update requests. Everything is optional at the
/// decode step; the service decides what is required. Owner and applicant
/// fields sent by clients are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub experience: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    pub salary: Option<Option<String>>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    pub benefits: Option<Option<String>>,
    pub status: Option<String>,
}

/// Free-text fields also accept JSON numbers, kept in their literal form.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Missing key stays `None` through `#[serde(default)]`; an explicit `null`
/// becomes `Some(None)` so an update can clear the field.
fn nullable_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(Some(value.map(String::from)))
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Job>,
}

impl From<Vec<Job>> for JobListResponse {
    fn from(data: Vec<Job>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub data: Job,
}

impl From<Job> for JobResponse {
    fn from(data: Job) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub data: Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: serde_json::Value) -> JobRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn numeric_salary_is_kept_as_text() {
        let req = decode(json!({ "salary": 80000, "benefits": 12.5 }));
        assert_eq!(req.salary, Some(Some("80000".to_string())));
        assert_eq!(req.benefits, Some(Some("12.5".to_string())));
    }

    #[test]
    fn null_differs_from_missing() {
        let req = decode(json!({ "salary": null }));
        assert_eq!(req.salary, Some(None));
        assert_eq!(req.benefits, None);
    }

    #[test]
    fn other_json_types_are_rejected() {
        let err = serde_json::from_value::<JobRequest>(json!({ "salary": ["80k"] }));
        assert!(err.is_err());
        let err = serde_json::from_value::<JobRequest>(json!({ "benefits": true }));
        assert!(err.is_err());
    }
}
