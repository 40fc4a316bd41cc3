//! Example: Look up a few queries across the built-in libraries
//!
//! Run with: SERPER_API_KEY=... cargo run -p docskit --example lookup

use docskit::{DocsRequest, Tool};

/// Lookups to run
const CASES: &[(&str, &str)] = &[
    ("Chroma DB", "langchain"),
    ("query engine", "llama-index"),
    ("embeddings", "openai"),
];

#[tokio::main]
async fn main() {
    let Ok(api_key) = std::env::var("SERPER_API_KEY") else {
        eprintln!("SERPER_API_KEY is not set");
        std::process::exit(1);
    };

    let tool = Tool::builder().api_key(api_key).build();

    for (i, (query, library)) in CASES.iter().enumerate() {
        println!("{}. {} ({})", i + 1, query, library);
        match tool
            .execute(DocsRequest::new(*query, *library).max_chars(300))
            .await
        {
            Ok(text) => println!("{}\n", text),
            Err(e) => println!("Error: {}\n", e),
        }
    }
}
