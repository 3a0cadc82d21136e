// Cache keys for query results.

use std::fmt;

use crate::hfs::Endpoint;

/// Root namespace shared by every key.
pub const NAMESPACE: &str = "hfsnext";

/// Ordered `(namespace, operation, params...)` tuple addressing one cached
/// result. Two keys are equal iff every component is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    namespace: String,
    operation: Option<String>,
    params: Vec<String>,
}

impl QueryKey {
    /// Key covering everything in the namespace. Only useful as a prefix.
    pub fn all() -> Self {
        Self {
            namespace: NAMESPACE.to_string(),
            operation: None,
            params: Vec::new(),
        }
    }

    pub fn operation(endpoint: Endpoint) -> Self {
        Self {
            operation: Some(endpoint.name().to_string()),
            ..Self::all()
        }
    }

    pub fn with_param(mut self, param: impl fmt::Display) -> Self {
        self.params.push(param.to_string());
        self
    }

    pub fn exam_list() -> Self {
        Self::operation(Endpoint::ExamList)
    }

    pub fn user_snapshot() -> Self {
        Self::operation(Endpoint::UserSnapshot)
    }

    pub fn last_exam_overview() -> Self {
        Self::operation(Endpoint::LastExamOverview)
    }

    pub fn exam_overview(exam_id: &str) -> Self {
        Self::operation(Endpoint::ExamOverview).with_param(exam_id)
    }

    pub fn exam_overview_v4(exam_id: &str) -> Self {
        Self::operation(Endpoint::ExamOverviewV4).with_param(exam_id)
    }

    pub fn exam_rank_info(exam_id: &str) -> Self {
        Self::operation(Endpoint::ExamRankInfo).with_param(exam_id)
    }

    pub fn answer_picture(exam_id: &str, paper_id: &str, pid: &str) -> Self {
        Self::operation(Endpoint::AnswerPicture)
            .with_param(exam_id)
            .with_param(paper_id)
            .with_param(pid)
    }

    pub fn paper_rank_info(exam_id: &str, paper_id: &str) -> Self {
        Self::operation(Endpoint::PaperRankInfo)
            .with_param(exam_id)
            .with_param(paper_id)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// True if `prefix` matches this key component by component.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        if self.namespace != prefix.namespace {
            return false;
        }
        match (&self.operation, &prefix.operation) {
            (_, None) => prefix.params.is_empty(),
            (Some(op), Some(prefix_op)) if op == prefix_op => {
                self.params.starts_with(&prefix.params)
            }
            _ => false,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.namespace)?;
        if let Some(op) = &self.operation {
            write!(f, "/{op}")?;
        }
        for param in &self.params {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}
