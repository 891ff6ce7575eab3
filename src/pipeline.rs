//! Agent pipelines: single-shot tasks, the two-agent chain, and the
//! two-stage Wikipedia orchestrator.

use crate::agent::AgentHistory;
use crate::csv_output::{
    LatestBy, QueryType, latest_csv, output_file_name, read_urls, timestamp, write_results,
};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::runner::{AgentRunner, run_task};
use crate::session::Session;
use crate::tasks::{
    collect_tabs_task, open_tabs_task, reddit_urls_task, summarize_url_task, summarize_urls_task,
};
use crate::topics::validate_topics;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Ask an agent for Reddit URLs for each topic.
pub async fn find_topic_urls(runner: &dyn AgentRunner, topics: &str) -> Result<Option<String>> {
    let topics = validate_topics(topics)?;
    let history = run_task(runner, &reddit_urls_task(&topics)).await?;
    Ok(history.into_final_result())
}

/// Summarize every article listed in the `url` column of a CSV file, in one
/// agent run.
pub async fn summarize_csv(runner: &dyn AgentRunner, csv_path: &Path) -> Result<Option<String>> {
    let urls = read_urls(csv_path)?;
    if urls.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "no URLs found in {}",
            csv_path.display()
        )));
    }
    let history = run_task(runner, &summarize_urls_task(&urls)).await?;
    Ok(history.into_final_result())
}

/// Summarize one article, retrying per `policy`.
///
/// Returns `None` when every attempt failed.
pub async fn summarize_url(
    runner: &dyn AgentRunner,
    policy: &RetryPolicy,
    url: &str,
) -> Option<String> {
    let task = summarize_url_task(url);
    policy
        .run(url, |_| {
            let task = &task;
            async move {
                run_task(runner, task)
                    .await
                    .map(AgentHistory::into_final_result)
            }
        })
        .await
}

/// Open a Wikipedia tab per topic with one agent, then have a second agent in
/// the same session report the names and URLs of the open tabs.
///
/// The session is released exactly once, whether the agents succeed or not.
pub async fn chain_of_agents(runner: &dyn AgentRunner, topics: &str) -> Result<Option<String>> {
    let session = Session::scoped();

    let outcome: Result<Option<String>> = async {
        let topics = validate_topics(topics)?;
        runner.run(&open_tabs_task(&topics), &session).await?;
        let history = runner.run(&collect_tabs_task(), &session).await?;
        Ok(history.into_final_result())
    }
    .await;

    if let Err(e) = &outcome {
        error!("An error occurred: {}", e);
    }
    outcome
}

/// What a pipeline stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageReport {
    /// The URL list was written to `path`.
    Urls { path: PathBuf },
    /// Summaries of the URLs in `source`, one file per article.
    Summaries {
        source: PathBuf,
        written: Vec<PathBuf>,
        failed: Vec<String>,
    },
    /// There was no CSV file to read URLs from.
    NoInput,
}

/// Two-stage orchestrator: collect article URLs, then summarize them.
pub struct Pipeline {
    runner: Arc<dyn AgentRunner>,
    output_dir: PathBuf,
    latest_by: LatestBy,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(runner: Arc<dyn AgentRunner>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            output_dir: output_dir.into(),
            latest_by: LatestBy::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// How the summary stage picks its input file.
    pub fn latest_by(mut self, by: LatestBy) -> Self {
        self.latest_by = by;
        self
    }

    /// Retry policy for per-article summaries.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run one stage. `topics` is only used by the `urls` stage.
    pub async fn process(&self, topics: &str, query_type: QueryType) -> Result<StageReport> {
        let timestamp = timestamp();
        match query_type {
            QueryType::Urls => self.collect_urls(topics, &timestamp).await,
            QueryType::Summary => self.collect_summaries(&timestamp).await,
        }
    }

    async fn collect_urls(&self, topics: &str, timestamp: &str) -> Result<StageReport> {
        let result = chain_of_agents(self.runner.as_ref(), topics)
            .await?
            .ok_or_else(|| Error::DataFormat("the agent returned no result".to_string()))?;

        let file_name = output_file_name(QueryType::Urls.file_prefix(), timestamp, None);
        let path = write_results(&result, &self.output_dir, &file_name, QueryType::Urls)?;
        info!("Successfully created CSV file at: {}", path.display());

        Ok(StageReport::Urls { path })
    }

    async fn collect_summaries(&self, timestamp: &str) -> Result<StageReport> {
        let Some(source) = latest_csv(&self.output_dir, self.latest_by)? else {
            info!("No CSV files found in output directory");
            return Ok(StageReport::NoInput);
        };

        let urls = read_urls(&source)?;
        info!(source = %source.display(), urls = urls.len(), "summarizing articles");

        let mut written = Vec::new();
        let mut failed = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            let Some(result) = summarize_url(self.runner.as_ref(), &self.retry, url).await else {
                warn!("Skipping {}", url);
                failed.push(url.clone());
                continue;
            };

            let file_name =
                output_file_name(QueryType::Summary.file_prefix(), timestamp, Some(index + 1));
            let path = write_results(&result, &self.output_dir, &file_name, QueryType::Summary)?;
            info!("Created summary CSV file at: {}", path.display());
            written.push(path);
        }

        Ok(StageReport::Summaries {
            source,
            written,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers by task kind and records the sessions it saw.
    #[derive(Default)]
    struct FakeRunner {
        tasks: Mutex<Vec<String>>,
        sessions: Mutex<Vec<Session>>,
        fail_collect: bool,
    }

    #[async_trait]
    impl AgentRunner for FakeRunner {
        async fn run(&self, task: &str, session: &Session) -> Result<AgentHistory> {
            session.ensure_open()?;
            self.tasks.lock().unwrap().push(task.to_string());
            self.sessions.lock().unwrap().push(session.clone());

            if task.starts_with("Open tabs") {
                session.record(task, Some("opened"))?;
                return Ok(AgentHistory::finished(task, "opened"));
            }
            if task.starts_with("Considering all open tabs") {
                if self.fail_collect {
                    return Err(Error::Llm("browser crashed".to_string()));
                }
                assert_eq!(session.entries().len(), 1);
                return Ok(AgentHistory::finished(
                    task,
                    r#"[{"name": "Plato", "url": "https://en.wikipedia.org/wiki/Plato"}]"#,
                ));
            }
            if task.contains("wiki/Plato in English") {
                return Ok(AgentHistory::finished(
                    task,
                    r#"{"name": "Plato", "summary": "Athenian philosopher."}"#,
                ));
            }
            if task.contains("Reddit") || task.starts_with("Visit these URLs") {
                return Ok(AgentHistory::finished(task, "[]"));
            }
            Ok(AgentHistory::new(task))
        }
    }

    #[tokio::test]
    async fn test_chain_shares_one_session() {
        let runner = FakeRunner::default();
        let result = chain_of_agents(&runner, "Plato").await.unwrap();

        assert!(result.unwrap().contains("wiki/Plato"));
        let sessions = runner.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].is_closed());
        // Released exactly once: a further close is a no-op.
        assert!(!sessions[1].close());
    }

    #[tokio::test]
    async fn test_chain_releases_session_on_failure() {
        let runner = FakeRunner {
            fail_collect: true,
            ..Default::default()
        };
        let err = chain_of_agents(&runner, "Plato").await.unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
        let sessions = runner.sessions.lock().unwrap();
        assert!(sessions[0].is_closed());
        assert!(!sessions[0].close());
    }

    #[tokio::test]
    async fn test_chain_rejects_empty_topics() {
        let runner = FakeRunner::default();
        let err = chain_of_agents(&runner, "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(runner.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_topic_urls() {
        let runner = FakeRunner::default();
        let result = find_topic_urls(&runner, "rust, tokio").await.unwrap();
        assert_eq!(result.as_deref(), Some("[]"));
        assert!(runner.tasks.lock().unwrap()[0].contains("rust, tokio on Reddit"));
    }

    #[tokio::test]
    async fn test_summarize_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "name,url\nA,https://a\nB,https://b\n").unwrap();

        let runner = FakeRunner::default();
        let result = summarize_csv(&runner, &path).await.unwrap();
        assert_eq!(result.as_deref(), Some("[]"));
        assert!(runner.tasks.lock().unwrap()[0].contains("https://a, https://b in English"));

        fs::write(&path, "name\nA\n").unwrap();
        let err = summarize_csv(&runner, &path).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_urls_stage_writes_articles_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Arc::new(FakeRunner::default()), dir.path().join("output"));

        let report = pipeline.process("Plato", QueryType::Urls).await.unwrap();

        let StageReport::Urls { path } = report else {
            panic!("unexpected report kind");
        };
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("wiki_articles_"));
        assert_eq!(
            read_urls(&path).unwrap(),
            vec!["https://en.wikipedia.org/wiki/Plato"]
        );
    }

    #[tokio::test]
    async fn test_summary_stage_without_input() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::default());
        let pipeline = Pipeline::new(runner.clone(), dir.path());

        let report = pipeline.process("", QueryType::Summary).await.unwrap();

        assert_eq!(report, StageReport::NoInput);
        assert!(runner.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_stage_picks_latest_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "name,url\nPericles,https://en.wikipedia.org/wiki/Pericles\n").unwrap();
        fs::write(dir.path().join("b.csv"), "name,url\nPlato,https://en.wikipedia.org/wiki/Plato\n").unwrap();

        let runner = Arc::new(FakeRunner::default());
        let pipeline = Pipeline::new(runner.clone(), dir.path());
        let report = pipeline.process("ignored", QueryType::Summary).await.unwrap();

        let StageReport::Summaries { source, written, failed } = report else {
            panic!("unexpected report kind");
        };
        assert_eq!(source, dir.path().join("b.csv"));
        assert!(failed.is_empty());
        assert_eq!(written.len(), 1);
        assert!(written[0].to_str().unwrap().ends_with("_001.csv"));

        let tasks = runner.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].contains("wiki/Plato"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_stage_skips_failed_urls() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("wiki_articles_20240101_000000.csv"),
            "name,url\nX,https://example.com/x\nPlato,https://en.wikipedia.org/wiki/Plato\n",
        )
        .unwrap();

        let runner = Arc::new(FakeRunner::default());
        let pipeline = Pipeline::new(runner.clone(), dir.path())
            .retry(RetryPolicy::new(2, Duration::from_secs(1)));
        let report = pipeline.process("", QueryType::Summary).await.unwrap();

        let StageReport::Summaries { written, failed, .. } = report else {
            panic!("unexpected report kind");
        };
        assert_eq!(failed, vec!["https://example.com/x"]);
        assert_eq!(written.len(), 1);
        assert!(written[0].to_str().unwrap().ends_with("_002.csv"));
        // Two attempts for the failing URL, one for Plato.
        assert_eq!(runner.tasks.lock().unwrap().len(), 3);
    }
}
