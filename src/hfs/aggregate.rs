// Exam list aggregation.
// Merges per-subject exam lists, then fetches every exam's score concurrently.

use std::collections::HashSet;

use tokio::task::JoinSet;

use crate::error::Result;

use super::api::{HfsApi, fetch_url};
use super::endpoints::Endpoint;
use super::types::{
    ExamDetail, ExamRecord, ExamSummary, SENTINEL_SCORE, SubjectExams, format_exam_time,
};

/// Fetch the wrong-items overview and build the scored exam list.
///
/// Fails only when the overview request itself fails. A failed score fetch
/// leaves that exam with [`SENTINEL_SCORE`].
pub(crate) async fn aggregate_exam_list(api: &HfsApi, token: &str) -> Result<Vec<ExamSummary>> {
    let subjects: Vec<SubjectExams> = api.fetch(Endpoint::ExamList, token, &[]).await?;
    let exams = merge_subject_exams(subjects);
    tracing::debug!(count = exams.len(), "merged subject exam lists");
    Ok(attach_scores(api, token, exams).await)
}

/// Deduplicate exams by id (first subject wins) and sort newest first.
///
/// The sort is stable, so exams sharing a timestamp keep their first-seen
/// order.
pub fn merge_subject_exams(subjects: Vec<SubjectExams>) -> Vec<ExamRecord> {
    let mut seen = HashSet::new();
    let mut exams: Vec<ExamRecord> = subjects
        .into_iter()
        .flat_map(|subject| subject.exam_list)
        .filter(|exam| seen.insert(exam.exam_id.clone()))
        .collect();
    exams.sort_by(|a, b| b.exam_time.cmp(&a.exam_time));
    exams
}

/// Fetch every exam's overview in parallel and wait for all of them.
async fn attach_scores(api: &HfsApi, token: &str, exams: Vec<ExamRecord>) -> Vec<ExamSummary> {
    let mut set = JoinSet::new();

    for (idx, exam) in exams.iter().enumerate() {
        let transport = api.transport();
        let url = Endpoint::ExamOverview
            .resolve(api.base_url(), &[("examId", exam.exam_id.as_str())]);
        let token = token.to_string();
        set.spawn(async move {
            let score = match url {
                Ok(url) => fetch_url::<ExamDetail>(
                    transport.as_ref(),
                    Endpoint::ExamOverview,
                    &url,
                    &token,
                )
                .await
                .map(|detail| detail.score_display()),
                Err(e) => Err(e),
            };
            (idx, score)
        });
    }

    let mut scores: Vec<Option<String>> = vec![None; exams.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, Ok(score))) => scores[idx] = Some(score),
            Ok((idx, Err(e))) => {
                tracing::warn!(exam_id = %exams[idx].exam_id, error = %e, "exam detail fetch failed");
            }
            Err(e) => tracing::warn!(%e, "exam detail task failed"),
        }
    }

    exams
        .into_iter()
        .zip(scores)
        .map(|(exam, score)| ExamSummary {
            released: format_exam_time(exam.exam_time),
            score: score.unwrap_or_else(|| SENTINEL_SCORE.to_string()),
            exam_id: exam.exam_id,
            name: exam.exam_name,
            exam_time: exam.exam_time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HfsError;
    use crate::hfs::mock::ScriptedTransport;
    use crate::hfs::transport::Transport;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    const BASE: &str = "http://hfs.test";
    const LIST_URL: &str = "http://hfs.test/v2/wrong-items/overview";

    fn record(id: &str, name: &str, time: i64) -> ExamRecord {
        ExamRecord {
            exam_id: id.to_string(),
            exam_name: name.to_string(),
            exam_time: time,
        }
    }

    /// Holds every overview request at a barrier until all of them are in
    /// flight, then answers from the script.
    struct GatedTransport {
        inner: ScriptedTransport,
        gate: Barrier,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn get_json(&self, url: &str, token: &str) -> Result<Value> {
            if url != LIST_URL {
                self.gate.wait().await;
            }
            self.inner.get_json(url, token).await
        }
    }

    fn subject(exams: Vec<ExamRecord>) -> SubjectExams {
        SubjectExams {
            subject: None,
            exam_list: exams,
        }
    }

    #[test]
    fn test_merge_dedupes_and_sorts_descending() {
        let merged = merge_subject_exams(vec![
            subject(vec![record("1", "Mid", 100)]),
            subject(vec![record("1", "Mid (copy)", 100), record("2", "Final", 200)]),
        ]);

        let ids: Vec<&str> = merged.iter().map(|e| e.exam_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(merged[1].exam_name, "Mid");
    }

    #[test]
    fn test_merge_first_occurrence_wins() {
        let merged = merge_subject_exams(vec![
            subject(vec![record("7", "Chinese view", 50)]),
            subject(vec![record("7", "Math view", 999)]),
        ]);

        assert_eq!(merged, vec![record("7", "Chinese view", 50)]);
    }

    #[test]
    fn test_merge_is_stable_for_equal_times() {
        let merged = merge_subject_exams(vec![
            subject(vec![record("a", "A", 10), record("b", "B", 10)]),
            subject(vec![record("c", "C", 30), record("d", "D", 10)]),
        ]);

        let ids: Vec<&str> = merged.iter().map(|e| e.exam_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
        assert!(merged.windows(2).all(|w| w[0].exam_time >= w[1].exam_time));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_subject_exams(Vec::new()).is_empty());
        assert!(merge_subject_exams(vec![subject(Vec::new())]).is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_attaches_scores_in_sorted_order() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(
            LIST_URL,
            json!([
                {"examList": [{"examId": "1", "examName": "Mid", "examTime": 100}]},
                {"examList": [
                    {"examId": "1", "examName": "Mid", "examTime": 100},
                    {"examId": "2", "examName": "Final", "examTime": 200}
                ]}
            ]),
        );
        transport.ok(
            "http://hfs.test/v3/exam/1/overview",
            json!({"score": 88, "manfen": 100}),
        );
        transport.ok(
            "http://hfs.test/v3/exam/2/overview",
            json!({"score": 132.5, "manfen": 150}),
        );

        let api = HfsApi::new(transport.clone(), BASE);
        let exams = api.exam_list("tok").await.unwrap();

        assert_eq!(exams.len(), 2);
        assert_eq!(exams[0].exam_id, "2");
        assert_eq!(exams[0].name, "Final");
        assert_eq!(exams[0].score, "132.5/150");
        assert_eq!(exams[1].exam_id, "1");
        assert_eq!(exams[1].score, "88/100");
        assert_eq!(exams[1].released, format_exam_time(100));
    }

    #[tokio::test]
    async fn test_aggregate_absorbs_individual_failures() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(
            LIST_URL,
            json!([{"examList": [
                {"examId": "a", "examName": "A", "examTime": 3},
                {"examId": "b", "examName": "B", "examTime": 2},
                {"examId": "c", "examName": "C", "examTime": 1}
            ]}]),
        );
        transport.ok("http://hfs.test/v3/exam/a/overview", json!({"score": 1, "manfen": 2}));
        transport.fail("http://hfs.test/v3/exam/b/overview", "timed out");
        transport.reply(
            "http://hfs.test/v3/exam/c/overview",
            json!({"ok": false, "errMsg": "无权限"}),
        );

        let api = HfsApi::new(transport.clone(), BASE);
        let exams = api.exam_list("tok").await.unwrap();

        let scores: Vec<&str> = exams.iter().map(|e| e.score.as_str()).collect();
        assert_eq!(scores, vec!["1/2", SENTINEL_SCORE, SENTINEL_SCORE]);
        assert_eq!(transport.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_aggregate_list_envelope_failure_uses_backend_message() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(LIST_URL, json!({"ok": false, "errMsg": "登录已过期"}));

        let api = HfsApi::new(transport.clone(), BASE);
        let err = api.exam_list("tok").await.unwrap_err();

        assert!(err.to_string().contains("登录已过期"));
        assert_eq!(transport.calls(), vec![LIST_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_aggregate_list_envelope_failure_uses_fallback() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(LIST_URL, json!({"ok": false}));

        let api = HfsApi::new(transport.clone(), BASE);
        let err = api.exam_list("tok").await.unwrap_err();

        assert!(matches!(err, HfsError::Envelope(ref msg) if msg == "获取考试列表失败"));
    }

    #[tokio::test]
    async fn test_aggregate_list_transport_failure_propagates() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(LIST_URL, "dns failure");

        let api = HfsApi::new(transport.clone(), BASE);
        assert!(api.exam_list("tok").await.is_err());
    }

    #[tokio::test]
    async fn test_aggregate_launches_detail_fetches_together() {
        let inner = ScriptedTransport::new();
        inner.ok(
            LIST_URL,
            json!([{"examList": [
                {"examId": "a", "examName": "A", "examTime": 3},
                {"examId": "b", "examName": "B", "examTime": 2},
                {"examId": "c", "examName": "C", "examTime": 1}
            ]}]),
        );
        inner.ok("http://hfs.test/v3/exam/a/overview", json!({"score": 5, "manfen": 10}));
        inner.fail("http://hfs.test/v3/exam/b/overview", "connection reset");
        inner.ok("http://hfs.test/v3/exam/c/overview", json!({"score": 7, "manfen": 10}));

        let transport = Arc::new(GatedTransport {
            inner,
            gate: Barrier::new(3),
        });
        let api = HfsApi::new(transport.clone(), BASE);

        let exams = tokio::time::timeout(Duration::from_secs(5), api.exam_list("tok"))
            .await
            .expect("detail fetches did not run concurrently")
            .unwrap();

        let scores: Vec<&str> = exams.iter().map(|e| e.score.as_str()).collect();
        assert_eq!(scores, vec!["5/10", SENTINEL_SCORE, "7/10"]);
        assert_eq!(transport.inner.calls().len(), 4);
    }
}
