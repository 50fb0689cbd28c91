//! OData query parameters for the job and log collections

use orchview_types::JobState;

/// Default number of jobs requested
pub const DEFAULT_JOB_TOP: u32 = 20;

/// Quote a value as an OData string literal
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Query over the `Jobs` collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobQuery {
    /// A single job by key
    pub key: Option<String>,
    pub process_key: Option<String>,
    pub state: Option<JobState>,
    pub top: u32,
    pub order_by: String,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            key: None,
            process_key: None,
            state: None,
            top: DEFAULT_JOB_TOP,
            order_by: "CreationTime desc".to_string(),
        }
    }
}

impl JobQuery {
    pub fn for_process(process_key: impl Into<String>) -> Self {
        Self {
            process_key: Some(process_key.into()),
            ..Default::default()
        }
    }

    /// Look up one job by its key
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            top: 1,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: Option<JobState>) -> Self {
        self.state = state;
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }

    /// The `$filter` clause, if any condition is set
    pub fn filter_clause(&self) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(key) = &self.key {
            clauses.push(format!("Key eq {}", quote(key)));
        }
        if let Some(key) = &self.process_key {
            clauses.push(format!("ProcessKey eq {}", quote(key)));
        }
        if let Some(state) = &self.state {
            clauses.push(format!("State eq {}", quote(state.as_str())));
        }
        (!clauses.is_empty()).then(|| clauses.join(" and "))
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("$orderby".to_string(), self.order_by.clone()),
            ("$top".to_string(), self.top.to_string()),
        ];
        if let Some(filter) = self.filter_clause() {
            params.push(("$filter".to_string(), filter));
        }
        params
    }
}

/// Query over the `RobotLogs` collection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Server-side pre-filter on the job key
    pub job_key: Option<String>,
    pub top: Option<usize>,
    pub skip: Option<usize>,
}

impl LogQuery {
    pub fn for_job(job_key: impl Into<String>) -> Self {
        Self {
            job_key: Some(job_key.into()),
            ..Default::default()
        }
    }

    /// Request one window of `top` records starting at `skip`
    pub fn window(skip: usize, top: usize) -> Self {
        Self {
            job_key: None,
            top: Some(top),
            skip: Some(skip),
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(key) = &self.job_key {
            params.push(("$filter".to_string(), format!("JobKey eq {}", quote(key))));
        }
        if let Some(top) = self.top {
            params.push(("$top".to_string(), top.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip".to_string(), skip.to_string()));
        }
        // Paged windows need a stable order
        if self.top.is_some() || self.skip.is_some() {
            params.push(("$orderby".to_string(), "TimeStamp asc".to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_job_query_defaults() {
        let params = JobQuery::for_process("Invoices").to_params();
        assert_eq!(param(&params, "$orderby"), Some("CreationTime desc"));
        assert_eq!(param(&params, "$top"), Some("20"));
        assert_eq!(param(&params, "$filter"), Some("ProcessKey eq 'Invoices'"));
    }

    #[test]
    fn test_job_query_with_state() {
        let query = JobQuery::for_process("Invoices").with_state(Some(JobState::Faulted));
        assert_eq!(
            query.filter_clause().as_deref(),
            Some("ProcessKey eq 'Invoices' and State eq 'Faulted'")
        );
    }

    #[test]
    fn test_quotes_are_doubled() {
        let query = JobQuery::for_process("Bob's process");
        assert_eq!(
            query.filter_clause().as_deref(),
            Some("ProcessKey eq 'Bob''s process'")
        );
    }

    #[test]
    fn test_job_lookup_by_key() {
        let params = JobQuery::for_key("a1b2").to_params();
        assert_eq!(param(&params, "$filter"), Some("Key eq 'a1b2'"));
        assert_eq!(param(&params, "$top"), Some("1"));
    }

    #[test]
    fn test_empty_job_query_has_no_filter() {
        assert!(JobQuery::default().filter_clause().is_none());
    }

    #[test]
    fn test_log_window_params() {
        let params = LogQuery::window(100, 50).to_params();
        assert_eq!(param(&params, "$skip"), Some("100"));
        assert_eq!(param(&params, "$top"), Some("50"));
        assert_eq!(param(&params, "$orderby"), Some("TimeStamp asc"));
        assert!(LogQuery::default().to_params().is_empty());
    }
}
