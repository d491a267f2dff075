//! Shared fixtures for the markward-content integration tests.

use std::sync::{Arc, Mutex};

use markward_content::{ConverterCache, DocumentPipeline, MarkdownConverter};
use markward_core::{ConverterConfig, Result};

/// A document exercising every stage of the pipeline.
pub const FULL_DOCUMENT: &str = "    ---
    title: Release Notes
    tags: [release]
    ---
    # Version 2

    | Feature | Status |
    |---------|--------|
    | Tables  | @icon-check |

    Click <a href=\"javascript:steal()\" onclick=\"go()\">here</a>.

    <script>alert('x')</script>
";

/// Converter that records every input it receives and echoes it back.
#[derive(Default)]
pub struct RecordingConverter {
    /// Inputs in call order
    pub inputs: Mutex<Vec<(String, bool)>>,
}

impl MarkdownConverter for RecordingConverter {
    fn convert(&self, markdown: &str, use_pragma_lines: bool) -> Result<String> {
        self.inputs
            .lock()
            .unwrap()
            .push((markdown.to_string(), use_pragma_lines));
        Ok(format!("<pre>{markdown}</pre>"))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A pipeline backed by `converter`.
pub fn pipeline_with(converter: Arc<RecordingConverter>) -> DocumentPipeline {
    let cache = ConverterCache::with_factory(ConverterConfig::default(), move |_| {
        Ok(Arc::clone(&converter) as Arc<dyn MarkdownConverter>)
    });
    DocumentPipeline::new().with_converter(cache)
}

/// Markdown for the `n`th generated document.
pub fn numbered_document(n: usize) -> String {
    format!("---\ntitle: Doc {n}\n---\n# Heading {n}\n\nBody {n} <script>bad({n})</script>\n")
}
