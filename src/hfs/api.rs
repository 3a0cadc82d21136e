// HFS API endpoint functions.
// Provides typed methods that resolve an endpoint, unwrap the envelope, and decode the payload.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::Result;

use super::endpoints::Endpoint;
use super::transport::Transport;
use super::types::{
    AnswerPictures, Envelope, ExamDetail, ExamOverviewV4, ExamRankInfo, ExamSummary,
    LastExamOverview, PaperRankInfo, UserSnapshot,
};

impl Endpoint {
    /// Message used when the backend rejects a request without an `errMsg`.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Endpoint::Login => "登录失败",
            Endpoint::UserSnapshot => "获取用户信息失败",
            Endpoint::ExamList => "获取考试列表失败",
            Endpoint::ExamOverview => "获取考试详情失败",
            Endpoint::ExamRankInfo => "获取考试排名失败",
            Endpoint::AnswerPicture => "获取答题卡图片失败",
            Endpoint::PaperRankInfo => "获取试卷排名失败",
            Endpoint::LastExamOverview => "获取最近考试详情失败",
            Endpoint::ExamOverviewV4 => "获取年级排名失败",
        }
    }
}

/// Typed access to the HFS backend over any [`Transport`].
#[derive(Clone)]
pub struct HfsApi {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl HfsApi {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `endpoint`, GET it, and decode the envelope payload as `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        token: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = endpoint.resolve(&self.base_url, params)?;
        fetch_url(self.transport.as_ref(), endpoint, &url, token).await
    }

    /// Get the signed-in user's snapshot.
    pub async fn user_snapshot(&self, token: &str) -> Result<UserSnapshot> {
        self.fetch(Endpoint::UserSnapshot, token, &[]).await
    }

    /// Get every exam the student has taken, newest first, with scores.
    pub async fn exam_list(&self, token: &str) -> Result<Vec<ExamSummary>> {
        super::aggregate::aggregate_exam_list(self, token).await
    }

    /// Get the v3 overview (score and possible score) for one exam.
    pub async fn exam_overview(&self, token: &str, exam_id: &str) -> Result<ExamDetail> {
        self.fetch(Endpoint::ExamOverview, token, &[("examId", exam_id)])
            .await
    }

    /// Get the v4 overview for one exam.
    pub async fn exam_overview_v4(&self, token: &str, exam_id: &str) -> Result<ExamOverviewV4> {
        self.fetch(Endpoint::ExamOverviewV4, token, &[("examId", exam_id)])
            .await
    }

    /// Get the overview of the most recent exam.
    pub async fn last_exam_overview(&self, token: &str) -> Result<LastExamOverview> {
        self.fetch(Endpoint::LastExamOverview, token, &[]).await
    }

    pub async fn exam_rank_info(&self, token: &str, exam_id: &str) -> Result<ExamRankInfo> {
        self.fetch(Endpoint::ExamRankInfo, token, &[("examId", exam_id)])
            .await
    }

    pub async fn paper_rank_info(
        &self,
        token: &str,
        exam_id: &str,
        paper_id: &str,
    ) -> Result<PaperRankInfo> {
        self.fetch(
            Endpoint::PaperRankInfo,
            token,
            &[("examId", exam_id), ("paperId", paper_id)],
        )
        .await
    }

    /// Get the scanned answer-sheet image URLs for one paper.
    pub async fn answer_pictures(
        &self,
        token: &str,
        exam_id: &str,
        paper_id: &str,
        pid: &str,
    ) -> Result<Vec<String>> {
        let pictures: AnswerPictures = self
            .fetch(
                Endpoint::AnswerPicture,
                token,
                &[("examId", exam_id), ("paperId", paper_id), ("pid", pid)],
            )
            .await?;
        Ok(pictures.url)
    }
}

/// GET an already resolved URL and unwrap its envelope.
pub(crate) async fn fetch_url<T: DeserializeOwned>(
    transport: &dyn Transport,
    endpoint: Endpoint,
    url: &str,
    token: &str,
) -> Result<T> {
    let body = transport.get_json(url, token).await?;
    let envelope: Envelope = serde_json::from_value(body)?;
    let payload = envelope.into_payload(endpoint.fallback_message())?;
    Ok(serde_json::from_value(payload)?)
}
