// HFS endpoint registry.
// Maps logical operation names to URL templates and resolves `${name}` placeholders.

use std::fmt;
use std::str::FromStr;

use crate::error::{HfsError, Result};

/// Logical backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    UserSnapshot,
    ExamList,
    ExamOverview,
    ExamRankInfo,
    AnswerPicture,
    PaperRankInfo,
    LastExamOverview,
    ExamOverviewV4,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Endpoint::Login,
        Endpoint::UserSnapshot,
        Endpoint::ExamList,
        Endpoint::ExamOverview,
        Endpoint::ExamRankInfo,
        Endpoint::AnswerPicture,
        Endpoint::PaperRankInfo,
        Endpoint::LastExamOverview,
        Endpoint::ExamOverviewV4,
    ];

    /// Operation name, also used as the second cache key component.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Login => "login",
            Endpoint::UserSnapshot => "userSnapshot",
            Endpoint::ExamList => "examList",
            Endpoint::ExamOverview => "examOverview",
            Endpoint::ExamRankInfo => "examRankInfo",
            Endpoint::AnswerPicture => "answerPicture",
            Endpoint::PaperRankInfo => "paperRankInfo",
            Endpoint::LastExamOverview => "lastExamOverview",
            Endpoint::ExamOverviewV4 => "examOverviewV4",
        }
    }

    /// Path template relative to the base URL.
    pub fn template(&self) -> &'static str {
        match self {
            Endpoint::Login => "/v2/users/sessions",
            Endpoint::UserSnapshot => "/v2/user-center/user-snapshot",
            Endpoint::ExamList => "/v2/wrong-items/overview",
            Endpoint::ExamOverview => "/v3/exam/${examId}/overview",
            Endpoint::ExamRankInfo => "/v3/exam/${examId}/rank-info",
            Endpoint::AnswerPicture => {
                "/v3/exam/${examId}/papers/${paperId}/answer-picture?pid=${pid}"
            }
            Endpoint::PaperRankInfo => "/v3/exam/${examId}/papers/${paperId}/rank-info",
            Endpoint::LastExamOverview => "/v2/students/last-exam-overview",
            Endpoint::ExamOverviewV4 => "/v4/exam/overview",
        }
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.template();
        while let Some(start) = rest.find("${") {
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        names
    }

    /// Produce an absolute URL for this endpoint.
    ///
    /// Every placeholder must have a matching param; a missing one is an
    /// error. Params that match no placeholder are appended as query pairs.
    pub fn resolve(&self, base_url: &str, params: &[(&str, &str)]) -> Result<String> {
        let template = self.template();
        let mut path = String::with_capacity(template.len());
        let mut used = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            path.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or(HfsError::MalformedTemplate { endpoint: self.name() })?;
            let name = &after[..end];

            let (_, value) = params.iter().find(|(key, _)| *key == name).ok_or_else(|| {
                HfsError::UnresolvedPlaceholder {
                    endpoint: self.name(),
                    placeholder: name.to_string(),
                }
            })?;
            path.push_str(&urlencoding::encode(value));
            used.push(name);
            rest = &after[end + 1..];
        }
        path.push_str(rest);

        let mut separator = if path.contains('?') { '&' } else { '?' };
        for (key, value) in params.iter().filter(|(key, _)| !used.contains(key)) {
            path.push(separator);
            path.push_str(&urlencoding::encode(key));
            path.push('=');
            path.push_str(&urlencoding::encode(value));
            separator = '&';
        }

        Ok(format!("{}{}", base_url.trim_end_matches('/'), path))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = HfsError;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.name() == s)
            .ok_or_else(|| HfsError::Other(format!("Unknown endpoint: {s}")))
    }
}
