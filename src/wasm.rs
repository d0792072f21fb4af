//! WASM bindings for texwalk
//!
//! This module provides JavaScript-accessible functions for LaTeX to text
//! conversion.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::{latex_context, text_context};
use crate::diagnostics::{format_parse_error, DiagnosticLevel};
use crate::features::quotes::add_quotes;
use crate::{latex_to_text_output, ParsingDb, TextDb, TextOptions};

/// Conversion options (exposed to WASM)
#[derive(Serialize, Deserialize, Default)]
pub struct TextConvertOptions {
    /// Emit comments as `%text` lines
    #[serde(default)]
    pub keep_comments: bool,
    /// Keep the braces of plain groups
    #[serde(default)]
    pub keep_braced_groups: bool,
    /// Register the quotes vocabulary on top of the defaults
    #[serde(default)]
    pub quotes: bool,
}

/// Conversion result with additional metadata
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted output
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Warnings during conversion
    pub warnings: Vec<String>,
}

/// Summary of LaTeX check results
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub has_errors: bool,
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert LaTeX to plain text with the default vocabulary
#[wasm_bindgen(js_name = "latexToText")]
pub fn latex_to_text_wasm(input: &str) -> JsValue {
    to_js(&convert_with(input, &TextConvertOptions::default()))
}

/// Convert LaTeX to plain text with options
#[wasm_bindgen(js_name = "latexToTextWithOptions")]
pub fn latex_to_text_with_options_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: TextConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    to_js(&convert_with(input, &opts))
}

/// Parse LaTeX and return the node tree
#[wasm_bindgen(js_name = "parseLatex")]
pub fn parse_latex_wasm(input: &str) -> Result<JsValue, JsValue> {
    let (nodes, _) = crate::parse(input, latex_context())
        .map_err(|err| JsValue::from_str(&format_parse_error(input, &err)))?;
    serde_wasm_bindgen::to_value(&nodes).map_err(JsValue::from)
}

/// Check LaTeX for parse errors and unknown names
#[wasm_bindgen(js_name = "checkLatex")]
pub fn check_latex_wasm(input: &str) -> JsValue {
    let result = crate::diagnostics::check_latex(input, latex_context());

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.to_string()),
            DiagnosticLevel::Warning => warnings.push(d.message.clone()),
        }
    }

    to_js(&CheckSummary {
        errors,
        warnings,
        has_errors: result.has_errors(),
    })
}

/// Get version information
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn convert_with(input: &str, opts: &TextConvertOptions) -> ConvertResult {
    let options = TextOptions {
        keep_comments: opts.keep_comments,
        keep_braced_groups: opts.keep_braced_groups,
    };

    let result = if opts.quotes {
        let mut latex: ParsingDb = latex_context().clone();
        let mut text: TextDb = text_context().clone();
        match add_quotes(&mut latex, &mut text) {
            Ok(()) => latex_to_text_output(input, &latex, &text, &options),
            Err(err) => return failure(err.to_string()),
        }
    } else {
        latex_to_text_output(input, latex_context(), text_context(), &options)
    };

    match result {
        Ok(output) => ConvertResult {
            output: output.content,
            success: true,
            error: None,
            warnings: output.warnings.iter().map(|w| w.message()).collect(),
        },
        Err(err) => failure(format_parse_error(input, &err)),
    }
}

fn failure(error: String) -> ConvertResult {
    ConvertResult {
        output: String::new(),
        success: false,
        error: Some(error),
        warnings: vec![],
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}
