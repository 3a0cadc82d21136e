// HFS API response types.
// Defines the response envelope and the payload structs used by the query layer.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HfsError, Result};

/// Score shown when an exam's detail could not be fetched.
pub const SENTINEL_SCORE: &str = "-";

const UNKNOWN_TIME: &str = "-";

/// Uniform response wrapper returned by every HFS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "errMsg", default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl Envelope {
    /// Return the payload if `ok`, otherwise an envelope error carrying the
    /// backend message or `fallback`.
    pub fn into_payload(self, fallback: &str) -> Result<Value> {
        if self.ok {
            return Ok(self.payload);
        }
        let message = self
            .err_msg
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(HfsError::Envelope(message))
    }
}

/// One subject's entry in the wrong-items overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectExams {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub exam_list: Vec<ExamRecord>,
}

/// Exam as listed under a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    pub exam_id: String,
    pub exam_name: String,
    /// Epoch milliseconds.
    pub exam_time: i64,
}

/// Aggregated exam row handed to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub exam_id: String,
    pub name: String,
    pub released: String,
    pub exam_time: i64,
    /// `"earned/possible"` or [`SENTINEL_SCORE`].
    pub score: String,
}

/// Payload of the v3 exam overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDetail {
    pub score: f64,
    /// Possible score.
    pub manfen: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExamDetail {
    /// `"earned/possible"`, e.g. `"95/100"` or `"87.5/100"`.
    pub fn score_display(&self) -> String {
        format!("{}/{}", self.score, self.manfen)
    }
}

/// Payload of the answer-picture endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPictures {
    #[serde(default)]
    pub url: Vec<String>,
}

// Backend-defined payloads passed through untouched.
pub type UserSnapshot = Value;
pub type LastExamOverview = Value;
pub type ExamOverviewV4 = Value;
pub type ExamRankInfo = Value;
pub type PaperRankInfo = Value;

/// Format an epoch-millisecond exam time in China Standard Time.
pub fn format_exam_time(epoch_ms: i64) -> String {
    let Some(offset) = FixedOffset::east_opt(8 * 3600) else {
        return UNKNOWN_TIME.to_string();
    };
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_ok_returns_payload() {
        let envelope: Envelope =
            serde_json::from_value(json!({"ok": true, "payload": {"a": 1}})).unwrap();
        assert_eq!(envelope.into_payload("fallback").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_envelope_not_ok_uses_backend_message() {
        let envelope: Envelope =
            serde_json::from_value(json!({"ok": false, "errMsg": "token expired"})).unwrap();
        let err = envelope.into_payload("fallback").unwrap_err();
        assert_eq!(err.to_string(), "token expired");
    }

    #[test]
    fn test_envelope_not_ok_uses_fallback() {
        let envelope: Envelope = serde_json::from_value(json!({"ok": false})).unwrap();
        let err = envelope.into_payload("获取考试列表失败").unwrap_err();
        assert!(matches!(err, HfsError::Envelope(ref msg) if msg == "获取考试列表失败"));

        let envelope: Envelope =
            serde_json::from_value(json!({"ok": false, "errMsg": ""})).unwrap();
        let err = envelope.into_payload("获取考试列表失败").unwrap_err();
        assert_eq!(err.to_string(), "获取考试列表失败");
    }

    #[test]
    fn test_subject_exams_ignores_unknown_fields() {
        let subject: SubjectExams = serde_json::from_value(json!({
            "subject": "数学",
            "wrongItemCount": 12,
            "examList": [{"examId": "9", "examName": "Mid", "examTime": 100, "extra": true}]
        }))
        .unwrap();
        assert_eq!(subject.exam_list.len(), 1);
        assert_eq!(subject.exam_list[0].exam_name, "Mid");
    }

    #[test]
    fn test_exam_detail_score_display() {
        let detail: ExamDetail =
            serde_json::from_value(json!({"score": 95, "manfen": 100, "classRank": 3})).unwrap();
        assert_eq!(detail.score_display(), "95/100");
        assert_eq!(detail.extra["classRank"], json!(3));

        let detail: ExamDetail =
            serde_json::from_value(json!({"score": 87.5, "manfen": 150})).unwrap();
        assert_eq!(detail.score_display(), "87.5/150");
    }

    #[test]
    fn test_format_exam_time() {
        // 2024-01-01T00:00:00Z is 08:00 in UTC+8.
        assert_eq!(format_exam_time(1_704_067_200_000), "2024-01-01 08:00");
        assert_eq!(format_exam_time(i64::MAX), "-");
    }
}
