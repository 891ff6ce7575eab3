//! Task descriptions handed to agents.

use crate::topics::join_topics;

/// Ask for Reddit URLs for each topic.
pub fn reddit_urls_task(topics: &[String]) -> String {
    format!(
        "Find the urls for the following topics: {} on Reddit. \
         Return me a JSON with the keys 'name' and 'url'.",
        join_topics(topics)
    )
}

/// First agent of the chain: open one Wikipedia tab per topic.
pub fn open_tabs_task(topics: &[String]) -> String {
    format!(
        "Open tabs with wikipedia articles for each of the following topics: {}.",
        join_topics(topics)
    )
}

/// Second agent of the chain: report what the first one opened.
pub fn collect_tabs_task() -> String {
    "Considering all open tabs give me the names and urls of the wikipedia articles \
     in a JSON format with the keys \"name\" and \"url\". Return just the JSON string."
        .to_string()
}

/// Summarize several articles in one run.
pub fn summarize_urls_task(urls: &[String]) -> String {
    format!(
        "Visit these URLs and provide a comprehensive summary of each article in 7-8 \
         sentences: {} in English. Return me a JSON with the keys 'name' and 'summary'.",
        urls.join(", ")
    )
}

/// Summarize a single article.
pub fn summarize_url_task(url: &str) -> String {
    format!(
        "Visit this URL and provide a comprehensive summary in 7-8 sentences: {} \
         in English. Return a JSON with the keys 'name' and 'summary'.",
        url
    )
}
