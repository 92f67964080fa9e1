use super::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Intake form fields, taken verbatim at save time. Must be a JSON
/// object so a reserved job id can be merged in before submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobFields(Value);

impl JobFields {
    pub fn new(value: Value) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid job fields: {e}"))?;
        Self::new(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// The submission payload: these fields with the reserved identifier
    /// attached under `jobId`.
    pub fn with_job_id(&self, job_id: &JobId) -> Value {
        let mut value = self.0.clone();
        if let Value::Object(map) = &mut value {
            map.insert(
                "jobId".to_string(),
                Value::String(job_id.as_str().to_string()),
            );
        }
        value
    }

    fn validate(value: &Value) -> Result<(), String> {
        if !value.is_object() {
            return Err("Job fields must be a JSON object".to_string());
        }
        Ok(())
    }
}

impl From<JobFields> for Value {
    fn from(fields: JobFields) -> Self {
        fields.0
    }
}
