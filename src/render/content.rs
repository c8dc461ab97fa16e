//! The content façade: decide how a field should be rendered and always
//! produce HTML.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;

use crate::ast::ParsedTable;
use crate::config::RenderConfig;
use crate::error::{Error, RenderError, Result};
use crate::parser::{has_explicit_delimiters, Tokenizer};
use crate::render::escape_html;
use crate::render::math::{create_renderer, render_segments, MathRenderer};
use crate::script::apply_fonts;
use crate::table::{
    contains_complex_table, contains_longtable, extract_table_with, render_cell,
    render_repaired, render_table_html, repair_longtable_for,
};

const LONGTABLE_BEGIN: &str = "\\begin{longtable}";
const LONGTABLE_END: &str = "\\end{longtable}";

/// How an input was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    /// Empty or plain text, passed through unchanged.
    Plain,
    /// Text with math segments.
    MathOnly,
    /// A table that needed repair or extraction.
    ComplexTable,
    /// A `longtable` without converter column specs.
    LongtableSimple,
    /// Rendering crashed; the output is an error block with the source.
    Error,
}

/// Output of a render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub state: RenderState,
    pub html: String,
}

/// Renders question-bank fields to HTML.
pub struct ContentRenderer {
    config: RenderConfig,
    tokenizer: Tokenizer,
    engine: Box<dyn MathRenderer>,
    strict: Box<dyn MathRenderer>,
}

impl ContentRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let engine = create_renderer(config.math_backend, config.throw_on_error);
        let strict = create_renderer(config.math_backend, true);
        Self::with_engines(config, engine, strict)
    }

    /// Use caller-supplied engines. `strict` renders repaired tables and must
    /// report parse errors rather than hide them.
    pub fn with_engines(
        config: RenderConfig,
        engine: Box<dyn MathRenderer>,
        strict: Box<dyn MathRenderer>,
    ) -> Self {
        Self {
            tokenizer: Tokenizer::new(config.auto_wrap),
            config,
            engine,
            strict,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Head content (styles, scripts) the math engine needs on the page.
    pub fn head_content(&self) -> Option<String> {
        self.engine.head_content()
    }

    /// Pick the render state for `input`.
    pub fn classify(&self, input: &str) -> RenderState {
        if input.is_empty() {
            RenderState::Plain
        } else if contains_complex_table(input) {
            RenderState::ComplexTable
        } else if contains_longtable(input) {
            RenderState::LongtableSimple
        } else if has_explicit_delimiters(input) || self.tokenizer.wraps(input) {
            RenderState::MathOnly
        } else {
            RenderState::Plain
        }
    }

    /// Render one field. Never fails and never panics: errors inside the
    /// table and math states become an error block.
    pub fn render(&self, input: &str) -> Rendered {
        let state = self.classify(input);
        log::debug!("rendering {} bytes as {:?}", input.len(), state);

        let outcome = catch_unwind(AssertUnwindSafe(|| self.dispatch(state, input)));
        let failure = match outcome {
            Ok(Ok(html)) => return Rendered { state, html },
            Ok(Err(e)) => e,
            Err(panic) => RenderError::Unhandled(panic_message(panic.as_ref())).into(),
        };

        log::warn!("render failed in state {:?}: {}", state, failure);
        Rendered {
            state: RenderState::Error,
            html: error_block(input, &failure),
        }
    }

    /// Render into `out`, replacing whatever it held.
    pub fn render_into(&self, input: &str, out: &mut String) -> RenderState {
        let rendered = self.render(input);
        out.clear();
        out.push_str(&rendered.html);
        rendered.state
    }

    /// Render a field and tag its Bengali/English runs with font classes.
    pub fn render_field(&self, input: &str) -> String {
        let html = self.render(input).html;
        if self.config.fonts.enabled {
            apply_fonts(&html, &self.config.fonts)
        } else {
            html
        }
    }

    fn dispatch(&self, state: RenderState, input: &str) -> Result<String> {
        match state {
            RenderState::Plain => Ok(input.to_string()),
            RenderState::MathOnly => Ok(self.render_text(input)),
            RenderState::ComplexTable => {
                Ok(self.around_table(input, |table| self.render_complex_table(table)))
            }
            RenderState::LongtableSimple => {
                Ok(self.around_table(input, |table| self.render_simple_longtable(table)))
            }
            RenderState::Error => {
                Err(RenderError::Unhandled("no renderer for the error state".into()).into())
            }
        }
    }

    fn render_text(&self, text: &str) -> String {
        render_segments(self.engine.as_ref(), &self.tokenizer.tokenize(text))
    }

    /// Render the table part of `input` with `render_table` and the text
    /// before and after it as math text.
    fn around_table(&self, input: &str, render_table: impl Fn(&str) -> String) -> String {
        let (before, table, after) = split_table(input);
        let mut html = String::new();
        if !before.trim().is_empty() {
            html.push_str(&self.render_text(before));
        }
        html.push_str(&render_table(table));
        if !after.trim().is_empty() {
            html.push_str(&self.render_text(after));
        }
        html
    }

    fn render_complex_table(&self, source: &str) -> String {
        let repaired = repair_longtable_for(source, self.config.math_backend);
        match render_repaired(self.strict.as_ref(), &repaired) {
            Ok(html) => {
                log::debug!("complex table rendered from repaired source");
                return format!(r#"<div class="latex-table longtable-container">{}</div>"#, html);
            }
            Err(e) => log::warn!("table repair failed, extracting cells: {}", e),
        }

        let table = extract_table_with(source, &self.config.table).unwrap_or_else(|e| {
            log::warn!("table extraction failed, showing placeholder: {}", e);
            ParsedTable::placeholder()
        });
        self.table_html(&table)
    }

    fn render_simple_longtable(&self, source: &str) -> String {
        match extract_table_with(source, &self.config.table) {
            Ok(table) => self.table_html(&table),
            Err(e) => {
                log::warn!("longtable extraction failed, rendering as math: {}", e);
                self.render_text(source)
            }
        }
    }

    fn table_html(&self, table: &ParsedTable) -> String {
        render_table_html(table, |text| render_cell(self.engine.as_ref(), text))
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Split `input` into text before the table, the table, and text after it.
/// A `$` or `$$` hugging either end of the table belongs to the table.
fn split_table(input: &str) -> (&str, &str, &str) {
    let Some(start) = input.find(LONGTABLE_BEGIN) else {
        return ("", input, "");
    };
    let end = input[start..]
        .find(LONGTABLE_END)
        .map(|at| start + at + LONGTABLE_END.len())
        .unwrap_or(input.len());

    let before = &input[..start];
    let after = &input[end..];
    let start = start - (before.len() - before.trim_end_matches('$').len()).min(2);
    let end = end + (after.len() - after.trim_start_matches('$').len()).min(2);
    (&input[..start], &input[start..end], &input[end..])
}

fn error_block(source: &str, error: &Error) -> String {
    format!(
        r#"<div class="latex-render-error"><p>Error rendering LaTeX content: {}</p><pre>{}</pre></div>"#,
        escape_html(&error.to_string()),
        escape_html(source)
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic while rendering".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoWrap;
    use crate::render::math::MathBackend;
    use pretty_assertions::assert_eq;

    fn katex() -> ContentRenderer {
        ContentRenderer::new(RenderConfig {
            math_backend: MathBackend::KaTeX,
            ..RenderConfig::default()
        })
    }

    struct Panicking;

    impl MathRenderer for Panicking {
        fn render_inline(&self, _latex: &str) -> Result<String> {
            panic!("engine exploded")
        }

        fn render_display(&self, _latex: &str) -> Result<String> {
            panic!("engine exploded")
        }

        fn head_content(&self) -> Option<String> {
            None
        }
    }

    const FIXTURE: &str = r"\begin{longtable}[]{@{} >{\centering\arraybackslash}p{(\linewidth - 6 abcolsep) * eal{0.25}} >{\centering\arraybackslash}p{(\linewidth - 6 abcolsep) * eal{0.25}} >{\centering\arraybackslash}p{(\linewidth - 6 abcolsep) * eal{0.25}} >{\centering\arraybackslash}p{(\linewidth - 6 abcolsep) * eal{0.25}}@{}} oprule oalign{} \endhead \bottomrule oalign{} \endlastfoot $x$ & 0 & -1 & 2 \\ $y$ & -1 & -3 & 3 \\ \end{longtable}";

    #[test]
    fn test_empty_is_plain() {
        let rendered = katex().render("");
        assert_eq!(rendered, Rendered { state: RenderState::Plain, html: String::new() });
    }

    #[test]
    fn test_plain_text_unchanged() {
        let input = "বাংলাদেশের রাজধানী কোথায়?";
        let rendered = katex().render(input);
        assert_eq!(rendered.state, RenderState::Plain);
        assert_eq!(rendered.html, input);
    }

    #[test]
    fn test_solve_scenario() {
        let rendered = katex().render("Solve $x^2=4$");
        assert_eq!(rendered.state, RenderState::MathOnly);
        assert_eq!(
            rendered.html,
            r#"Solve <span class="math inline">\(x^{2}=4\)</span>"#
        );
    }

    #[test]
    fn test_default_engine_renders_math() {
        let rendered = ContentRenderer::default().render("$a+b$");
        assert_eq!(rendered.state, RenderState::MathOnly);
        assert!(!rendered.html.is_empty());
        assert_ne!(rendered.html, "$a+b$");
    }

    #[test]
    fn test_auto_wrap_policy_controls_state() {
        let off = ContentRenderer::new(RenderConfig {
            auto_wrap: AutoWrap::Off,
            ..RenderConfig::default()
        });
        assert_eq!(off.classify("x_{1} is small"), RenderState::Plain);
        assert_eq!(katex().classify("x_{1} is small"), RenderState::MathOnly);
    }

    #[test]
    fn test_complex_fixture_table() {
        let renderer = katex();
        let rendered = renderer.render(FIXTURE);
        assert_eq!(rendered.state, RenderState::ComplexTable);
        assert!(rendered.html.contains(r#"<div class="latex-table-title">নিচের ছকটি সঠিক?</div>"#));
        assert!(rendered.html.contains(r#"<th><span class="math inline">\(x\)</span></th><th>0</th>"#));
        assert!(rendered.html.contains(r#"<tr><th><span class="math inline">\(y\)</span></th><td>-1</td>"#));
    }

    #[test]
    fn test_complex_table_repaired_when_engine_accepts() {
        let input = r"\begin{longtable}[]{@{} >{\centering\arraybackslash}p{(\linewidth - 2\tabcolsep) * \real{0.5}} >{\centering\arraybackslash}p{(\linewidth - 2\tabcolsep) * \real{0.5}}@{}} \toprule a & \frac{1}{2} \\ \bottomrule \end{longtable}";
        let rendered = katex().render(input);
        assert_eq!(rendered.state, RenderState::ComplexTable);
        assert!(rendered.html.starts_with(r#"<div class="latex-table longtable-container"><div class="math display">\[\begin{array}{cc}"#));
        assert!(rendered.html.contains(r"\frac{1}{2}"));
    }

    #[test]
    fn test_complex_table_repaired_with_default_engine() {
        let input = r"\begin{longtable}[]{@{} >{\centering\arraybackslash}p{(\linewidth - 2\tabcolsep) * \real{0.5}} >{\centering\arraybackslash}p{(\linewidth - 2\tabcolsep) * \real{0.5}}@{}} \toprule a & \frac{1}{2} \\ \midrule 1 & 2 \\ \bottomrule \end{longtable}";
        let rendered = ContentRenderer::default().render(input);
        assert_eq!(rendered.state, RenderState::ComplexTable);
        assert!(rendered.html.starts_with(r#"<div class="latex-table longtable-container"><div class="math display">"#));
        assert!(rendered.html.contains("<mtable"));
        assert!(!rendered.html.contains(r"\frac"));
    }

    #[test]
    fn test_dollar_wrapped_longtable() {
        for wrapped in [
            r"$\begin{longtable}{cc} a & b \\ 1 & 2 \\ \end{longtable}$",
            r"$$\begin{longtable}{cc} a & b \\ 1 & 2 \\ \end{longtable}$$",
        ] {
            let rendered = katex().render(wrapped);
            assert_eq!(rendered.state, RenderState::LongtableSimple);
            assert!(rendered.html.starts_with(r#"<div class="latex-table-wrapper">"#));
            assert!(rendered.html.ends_with("</div>"));
            assert!(rendered.html.contains("<th>a</th><th>b</th>"));
            assert!(rendered.html.contains("<td>1</td><td>2</td>"));
            assert!(!rendered.html.contains('$'));
        }
    }

    #[test]
    fn test_katex_fonts_leave_math_source_alone() {
        let html = katex().render_field(r"দৈর্ঘ্য $5\text{ সেমি}$");
        assert_eq!(
            html,
            r#"<span class="font-bengali" data-script="bengali">দৈর্ঘ্য </span><span class="math inline">\(5\text{ সেমি}\)</span>"#
        );
    }

    #[test]
    fn test_complex_table_placeholder() {
        // Unbalanced brace: the repaired array is rejected and no row has cells.
        let input = r"\begin{longtable}{p{0.5\linewidth}} nothing {to see \end{longtable}";
        let rendered = katex().render(input);
        assert_eq!(rendered.state, RenderState::ComplexTable);
        assert!(rendered.html.contains("<th>x</th><th>0</th><th>-1</th><th>2</th>"));
        assert!(rendered.html.contains("<td>y</td><td>-1</td><td>-3</td><td>3</td>"));
    }

    #[test]
    fn test_text_around_table() {
        let input = format!("প্রশ্ন: $a$ {} Answer", FIXTURE);
        let rendered = katex().render(&input);
        assert!(rendered.html.starts_with(r#"প্রশ্ন: <span class="math inline">\(a\)</span> <div class="latex-table-wrapper">"#));
        assert!(rendered.html.ends_with("</div> Answer"));
    }

    #[test]
    fn test_simple_longtable() {
        let rendered = katex().render(r"\begin{longtable}{cc} \textbf{A} & B \\ 1 & $2$ \\ \end{longtable}");
        assert_eq!(rendered.state, RenderState::LongtableSimple);
        assert!(rendered.html.contains("<th><strong>A</strong></th><th>B</th>"));
        assert!(rendered.html.contains(r#"<td>1</td><td><span class="math inline">\(2\)</span></td>"#));
    }

    #[test]
    fn test_simple_longtable_without_cells_falls_back_to_math() {
        let rendered = katex().render(r"\begin{longtable}{c} text \end{longtable}");
        assert_eq!(rendered.state, RenderState::LongtableSimple);
        assert!(rendered.html.contains("math display"));
    }

    #[test]
    fn test_panic_becomes_error_block() {
        let renderer = ContentRenderer::with_engines(
            RenderConfig::default(),
            Box::new(Panicking),
            Box::new(Panicking),
        );
        let rendered = renderer.render("see $<x>$");
        assert_eq!(rendered.state, RenderState::Error);
        assert!(rendered.html.contains("latex-render-error"));
        assert!(rendered.html.contains("engine exploded"));
        assert!(rendered.html.contains("see $&lt;x&gt;$"));
    }

    #[test]
    fn test_render_into_replaces_content() {
        let renderer = katex();
        let mut out = String::from("stale content");
        let state = renderer.render_into("fresh", &mut out);
        assert_eq!(state, RenderState::Plain);
        assert_eq!(out, "fresh");
        renderer.render_into("fresh", &mut out);
        assert_eq!(out, "fresh");
    }

    #[test]
    fn test_render_field_applies_fonts() {
        let renderer = katex();
        let html = renderer.render_field("মান $x$");
        assert_eq!(
            html,
            r#"<span class="font-bengali" data-script="bengali">মান </span><span class="math inline">\(x\)</span>"#
        );

        let mut config = RenderConfig::default();
        config.fonts.enabled = false;
        assert_eq!(ContentRenderer::new(config).render_field("মান"), "মান");
    }

    #[test]
    fn test_split_table() {
        assert_eq!(
            split_table(r"a $\begin{longtable}{c} x \end{longtable}$ b"),
            ("a ", r"$\begin{longtable}{c} x \end{longtable}$", " b")
        );
        assert_eq!(
            split_table(r"a $$\begin{longtable}{c} x \end{longtable}$$ b"),
            ("a ", r"$$\begin{longtable}{c} x \end{longtable}$$", " b")
        );
        assert_eq!(split_table("no table"), ("", "no table", ""));
    }
}
