//! WebAssembly bindings for JavaScript/TypeScript.

#![cfg(feature = "wasm")]

use crate::config::{AutoWrap, RenderConfig};
use crate::render::{ContentRenderer, MathBackend};
use crate::script::segment_scripts;
use crate::table::{contains_complex_table, convert_latex_table};
use wasm_bindgen::prelude::*;

/// Render one question-bank field to HTML.
///
/// # Arguments
///
/// * `input` - The field text.
/// * `options` - Optional configuration object.
///
/// # Returns
///
/// The rendered HTML string. Rendering problems are reported inside the
/// HTML rather than thrown.
#[wasm_bindgen(js_name = renderContent)]
pub fn render_content(input: &str, options: Option<RenderOptions>) -> String {
    console_error_panic_hook::set_once();

    let config = options.map(|o| o.config).unwrap_or_default();
    ContentRenderer::new(config).render_field(input)
}

/// Render one field and return `{ "state": ..., "html": ... }` as JSON.
#[wasm_bindgen(js_name = renderContentToJson)]
pub fn render_content_to_json(input: &str, options: Option<RenderOptions>) -> Result<String, JsError> {
    console_error_panic_hook::set_once();

    let config = options.map(|o| o.config).unwrap_or_default();
    let rendered = ContentRenderer::new(config).render(input);
    serde_json::to_string(&rendered).map_err(|e| JsError::new(&e.to_string()))
}

/// Configuration options for rendering.
#[wasm_bindgen]
pub struct RenderOptions {
    config: RenderConfig,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
        }
    }

    /// Build options from a TOML document.
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(source: &str) -> Result<RenderOptions, JsError> {
        RenderConfig::from_toml(source)
            .map(|config| Self { config })
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Set the math rendering backend: "mathml" or "katex".
    #[wasm_bindgen(js_name = setMathBackend)]
    pub fn set_math_backend(&mut self, backend: &str) {
        self.config.math_backend = match backend.to_lowercase().as_str() {
            "katex" => MathBackend::KaTeX,
            _ => MathBackend::MathML,
        };
    }

    /// Set whether math errors should fail instead of showing an error span.
    #[wasm_bindgen(js_name = setThrowOnError)]
    pub fn set_throw_on_error(&mut self, throw_on_error: bool) {
        self.config.throw_on_error = throw_on_error;
    }

    /// Set how bare LaTeX is wrapped: "heuristic", "environments" or "off".
    #[wasm_bindgen(js_name = setAutoWrap)]
    pub fn set_auto_wrap(&mut self, mode: &str) {
        self.config.auto_wrap = match mode.to_lowercase().as_str() {
            "off" => AutoWrap::Off,
            "environments" => AutoWrap::Environments,
            _ => AutoWrap::Heuristic,
        };
    }

    /// Enable or disable Bengali/English font spans.
    #[wasm_bindgen(js_name = setFonts)]
    pub fn set_fonts(&mut self, enabled: bool) {
        self.config.fonts.enabled = enabled;
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into Bengali/other runs, returned as a JSON array of
/// `{ "script": ..., "text": ... }` objects.
#[wasm_bindgen(js_name = segmentScripts)]
pub fn segment_scripts_json(text: &str) -> Result<String, JsError> {
    serde_json::to_string(&segment_scripts(text)).map_err(|e| JsError::new(&e.to_string()))
}

/// Whether the text holds table markup that needs repair.
#[wasm_bindgen(js_name = containsComplexTable)]
pub fn contains_complex_table_js(input: &str) -> bool {
    contains_complex_table(input)
}

/// Convert the first LaTeX table in `code` to HTML.
#[wasm_bindgen(js_name = convertLatexTableToHtml)]
pub fn convert_latex_table_to_html(code: &str, standalone: bool) -> Result<String, JsError> {
    convert_latex_table(code, standalone).map_err(|e| JsError::new(&e.to_string()))
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// TypeScript type definitions for documentation
/// ```typescript
/// // qbank_latex.d.ts
///
/// export function renderContent(input: string, options?: RenderOptions): string;
/// export function renderContentToJson(input: string, options?: RenderOptions): string;
/// export function segmentScripts(text: string): string;
/// export function containsComplexTable(input: string): boolean;
/// export function convertLatexTableToHtml(code: string, standalone: boolean): string;
/// export function getVersion(): string;
///
/// export class RenderOptions {
///     constructor();
///     static fromToml(source: string): RenderOptions;
///     setMathBackend(backend: "mathml" | "katex"): void;
///     setThrowOnError(throwOnError: boolean): void;
///     setAutoWrap(mode: "heuristic" | "environments" | "off"): void;
///     setFonts(enabled: boolean): void;
/// }
/// ```
const _: () = ();
