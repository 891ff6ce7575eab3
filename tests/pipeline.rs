use async_trait::async_trait;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wikiscout::llm::{GenerateOptions, Message, Response};
use wikiscout::{
    AgentConfig, ChatModel, Error, LlmAgentRunner, Pipeline, QueryType, Result, RetryPolicy,
    StageReport,
};

const URLS: &str = r#"[
  {"name": "Pericles", "url": "https://en.wikipedia.org/wiki/Pericles"},
  {"name": "Plato", "url": "https://en.wikipedia.org/wiki/Plato"}
]"#;

/// Chat model that answers by looking at the conversation so far.
#[derive(Default)]
struct WikiModel {
    calls: Mutex<usize>,
}

#[async_trait]
impl ChatModel for WikiModel {
    async fn complete(
        &self,
        _model: &str,
        messages: Vec<Message>,
        _options: GenerateOptions,
    ) -> Result<Response> {
        *self.calls.lock().unwrap() += 1;
        let conversation: String = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let text = if conversation.contains("Considering all open tabs") {
            format!("Here they are.\n<finish>\n{}\n</finish>", URLS)
        } else if conversation.contains("Open tabs with wikipedia articles") {
            "<finish>Opened Pericles and Plato.</finish>".to_string()
        } else if conversation.contains("wiki/Pericles in English") {
            return Err(Error::RateLimited("Rate limit reached for gpt-4o".to_string()));
        } else if conversation.contains("wiki/Plato in English") {
            "```\n<finish>\n{\"name\": \"Plato\", \"summary\": \"Athenian philosopher.\"}\n</finish>\n```"
                .to_string()
        } else {
            "Thinking.".to_string()
        };

        Ok(Response {
            text,
            tokens_used: Some(42),
        })
    }
}

fn pipeline(model: Arc<WikiModel>, dir: &std::path::Path) -> Pipeline {
    let runner = LlmAgentRunner::new(model, AgentConfig::new("gpt-4o").max_steps(3));
    Pipeline::new(Arc::new(runner), dir).retry(RetryPolicy::new(2, Duration::ZERO))
}

#[tokio::test]
async fn urls_then_summary_stage() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(WikiModel::default());
    let pipeline = pipeline(model.clone(), dir.path());

    let report = assert_ok!(pipeline.process("Pericles, Plato", QueryType::Urls).await);
    let StageReport::Urls { path } = report else {
        panic!("expected the urls report");
    };
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("wiki_articles_"));
    assert!(name.ends_with(".csv"));

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "name,url");
    assert_eq!(lines[1], "Pericles,https://en.wikipedia.org/wiki/Pericles");
    assert_eq!(lines[2], "Plato,https://en.wikipedia.org/wiki/Plato");

    let report = assert_ok!(pipeline.process("", QueryType::Summary).await);
    let StageReport::Summaries {
        source,
        written,
        failed,
    } = report
    else {
        panic!("expected the summaries report");
    };
    assert_eq!(source, path);
    assert_eq!(failed, vec!["https://en.wikipedia.org/wiki/Pericles".to_string()]);
    assert_eq!(written.len(), 1);

    let summary = &written[0];
    let name = summary.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("wiki_summary_"));
    assert!(name.ends_with("_002.csv"));
    assert_eq!(
        fs::read_to_string(summary).unwrap(),
        "name,summary\nPlato,Athenian philosopher.\n"
    );

    // 2 chain calls, 2 failed Pericles attempts, 1 Plato call
    assert_eq!(*model.calls.lock().unwrap(), 5);
}

#[tokio::test]
async fn summary_stage_without_input() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("output");
    let pipeline = pipeline(Arc::new(WikiModel::default()), &missing);

    let report = assert_ok!(pipeline.process("", QueryType::Summary).await);
    assert_eq!(report, StageReport::NoInput);
}

#[tokio::test]
async fn urls_stage_rejects_empty_topics() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(WikiModel::default());
    let pipeline = pipeline(model.clone(), dir.path());

    let err = assert_err!(pipeline.process("", QueryType::Urls).await);
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(*model.calls.lock().unwrap(), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
