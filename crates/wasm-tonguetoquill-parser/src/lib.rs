/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Browser entry point for the metadata parser. Everything crosses the
 * boundary as JSON strings so the editor needs no generated bindings
 * beyond `parse_document`.
 */

use serde_json::{Value, json};
use tonguetoquill_error_reporting::DiagnosticMessageBuilder;
use tonguetoquill_metadata::{ParseOptions, parse_with_options};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run() {
    // Set a panic hook on program start that prints panics to the console
    #[cfg(feature = "console_error_panic_hook")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

/// Parse a document and return the result as a JSON string.
///
/// `options` is an optional JSON object with the `ParseOptions` fields.
#[wasm_bindgen]
pub fn parse_document(input: &str, options: Option<String>) -> String {
    parse_document_json(input, options.as_deref()).to_string()
}

/// `{ok: true, document, quill, warnings}` or `{ok: false, error}`.
pub fn parse_document_json(input: &str, options: Option<&str>) -> Value {
    let options = match read_options(options) {
        Ok(options) => options,
        Err(err) => {
            let diagnostic = DiagnosticMessageBuilder::error("Invalid parse options")
                .with_code("TQ-2-1")
                .problem("The parser options must be a JSON object")
                .add_detail(err.to_string())
                .add_info("Known options are `strict_scope_names` and `max_input_bytes`")
                .build();
            return json!({ "ok": false, "error": diagnostic.to_json() });
        }
    };

    match parse_with_options(input, &options) {
        Ok(doc) => {
            let warnings: Vec<Value> = doc
                .warnings()
                .iter()
                .map(|warning| warning.to_diagnostic(input).to_json())
                .collect();
            json!({
                "ok": true,
                "document": doc.to_template_context(),
                "quill": doc.quill_tag(),
                "warnings": warnings,
            })
        }
        Err(err) => json!({ "ok": false, "error": err.to_diagnostic(input).to_json() }),
    }
}

fn read_options(options: Option<&str>) -> Result<ParseOptions, serde_json::Error> {
    match options.map(str::trim) {
        None | Some("") => Ok(ParseOptions::default()),
        Some(raw) => serde_json::from_str(raw),
    }
}
