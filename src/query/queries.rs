// Gated, cached query operations.
// Each operation waits for its token and parameters, consults the cache, then calls the API.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::hfs::{
    ExamDetail, ExamOverviewV4, ExamRankInfo, ExamSummary, HfsApi, HfsClient, LastExamOverview,
    PaperRankInfo, UserSnapshot,
};

use super::cache::{DEFAULT_TTL, EXAM_LIST_TTL, QueryCache, USER_SNAPSHOT_TTL};
use super::key::QueryKey;
use super::state::QueryState;

/// Query operations over one HFS session.
///
/// Every operation returns [`QueryState::Idle`] without touching the network
/// until the token and all of its parameters are present. Successful results
/// are cached under their [`QueryKey`]; errors are never cached.
pub struct Queries {
    api: HfsApi,
    cache: QueryCache,
    token: Option<String>,
}

impl Queries {
    pub fn new(api: HfsApi, token: Option<String>) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Build queries backed by a reqwest [`HfsClient`].
    pub fn with_client(client: HfsClient, token: Option<String>) -> Self {
        let base_url = client.base_url().to_string();
        Self::new(HfsApi::new(Arc::new(client), &base_url), token)
    }

    pub fn api(&self) -> &HfsApi {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if self.token.as_deref() != Some(token.as_str()) {
            self.cache.clear();
        }
        self.token = Some(token).filter(|t| !t.is_empty());
    }

    /// Forget the token and every result fetched with it.
    pub fn clear_token(&mut self) {
        self.token = None;
        self.cache.clear();
    }

    async fn run<T>(
        &self,
        key: QueryKey,
        ttl: Duration,
        fetch: impl Future<Output = Result<T>>,
    ) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(cached) = self.cache.get::<T>(&key) {
            tracing::debug!(%key, "cache hit");
            return QueryState::Loaded(cached);
        }

        match fetch.await {
            Ok(data) => {
                if let Err(e) = self.cache.insert(key.clone(), &data, ttl) {
                    tracing::warn!(%key, error = %e, "failed to cache query result");
                }
                QueryState::Loaded(data)
            }
            Err(e) => {
                tracing::debug!(%key, error = %e, "query failed");
                QueryState::Error(e.to_string())
            }
        }
    }

    /// Scored exam list, newest first. Cached for one hour.
    pub async fn exam_list(&self) -> QueryState<Vec<ExamSummary>> {
        let Some(token) = self.token() else {
            return QueryState::Idle;
        };
        self.run(QueryKey::exam_list(), EXAM_LIST_TTL, self.api.exam_list(token))
            .await
    }

    /// Signed-in user's snapshot. Cached for four hours.
    pub async fn user_snapshot(&self) -> QueryState<UserSnapshot> {
        let Some(token) = self.token() else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::user_snapshot(),
            USER_SNAPSHOT_TTL,
            self.api.user_snapshot(token),
        )
        .await
    }

    pub async fn exam_overview(&self, exam_id: Option<&str>) -> QueryState<ExamDetail> {
        let (Some(token), Some(exam_id)) = (self.token(), present(exam_id)) else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::exam_overview(exam_id),
            DEFAULT_TTL,
            self.api.exam_overview(token, exam_id),
        )
        .await
    }

    pub async fn exam_overview_v4(&self, exam_id: Option<&str>) -> QueryState<ExamOverviewV4> {
        let (Some(token), Some(exam_id)) = (self.token(), present(exam_id)) else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::exam_overview_v4(exam_id),
            DEFAULT_TTL,
            self.api.exam_overview_v4(token, exam_id),
        )
        .await
    }

    pub async fn last_exam_overview(&self) -> QueryState<LastExamOverview> {
        let Some(token) = self.token() else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::last_exam_overview(),
            DEFAULT_TTL,
            self.api.last_exam_overview(token),
        )
        .await
    }

    pub async fn exam_rank_info(&self, exam_id: Option<&str>) -> QueryState<ExamRankInfo> {
        let (Some(token), Some(exam_id)) = (self.token(), present(exam_id)) else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::exam_rank_info(exam_id),
            DEFAULT_TTL,
            self.api.exam_rank_info(token, exam_id),
        )
        .await
    }

    pub async fn paper_rank_info(
        &self,
        exam_id: Option<&str>,
        paper_id: Option<&str>,
    ) -> QueryState<PaperRankInfo> {
        let (Some(token), Some(exam_id), Some(paper_id)) =
            (self.token(), present(exam_id), present(paper_id))
        else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::paper_rank_info(exam_id, paper_id),
            DEFAULT_TTL,
            self.api.paper_rank_info(token, exam_id, paper_id),
        )
        .await
    }

    /// Answer-sheet image URLs for one paper.
    pub async fn answer_pictures(
        &self,
        exam_id: Option<&str>,
        paper_id: Option<&str>,
        pid: Option<&str>,
    ) -> QueryState<Vec<String>> {
        let (Some(token), Some(exam_id), Some(paper_id), Some(pid)) =
            (self.token(), present(exam_id), present(paper_id), present(pid))
        else {
            return QueryState::Idle;
        };
        self.run(
            QueryKey::answer_picture(exam_id, paper_id, pid),
            DEFAULT_TTL,
            self.api.answer_pictures(token, exam_id, paper_id, pid),
        )
        .await
    }
}

/// Empty strings count as missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
