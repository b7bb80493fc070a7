//! Example of splitting text and fanning out records

use serde_json::json;
use textcut_core::{BatchProcessor, Config, ErrorPolicy, Record, SplitMethod};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: Split a single text value
    println!("=== Example 1: Sentences ===");
    let text = "Dr. Smith went to the store. He bought milk! Was it fresh?";
    let sentences = textcut_core::process(text, &Config::split(SplitMethod::Sentence))?;
    for (i, sentence) in sentences.iter().enumerate() {
        println!("  {}: {:?}", i + 1, sentence);
    }

    // Example 2: Extract matches
    println!("\n=== Example 2: Extract ===");
    let numbers = textcut_core::process("call 555-1234 or 555-9876", &Config::extract(r"\d{3}-\d{4}"))?;
    println!("  {:?}", numbers);

    // Example 3: Fan records out
    println!("\n=== Example 3: Records ===");
    let records: Vec<Record> = [
        json!({ "id": 1, "text": "first paragraph\n\nsecond paragraph" }),
        json!({ "id": 2, "note": "no text field" }),
    ]
    .into_iter()
    .filter_map(|value| value.as_object().cloned())
    .collect();

    let output = BatchProcessor::new()
        .policy(ErrorPolicy::Continue)
        .process(&records, &Config::split(SplitMethod::Paragraph))?;

    for record in &output.records {
        println!("  {}", serde_json::to_string(record)?);
    }
    println!("  skipped: {}", output.skipped);

    Ok(())
}
