//! Ordered pattern → replacement rules shared by every fallback tier.
//!
//! Each rule has a stable [`RuleId`] and belongs to exactly one [`Tier`]. A
//! tier is applied by running its rules in table order. Most patterns accept
//! two spellings: the proper command (`\toprule`) and the form left behind by
//! converters that turned `\t`, `\r` or `\n` into control characters
//! (`oprule`, `aggedright`, `oalign`).

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

/// Column width substituted for every `p{...}`/`m{...}`/`b{...}` column.
pub const FIXED_COLUMN_WIDTH: &str = "p{3cm}";

/// Stage of the pipeline a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Applied to every math segment before the first render attempt.
    ScriptNormalize,
    /// Applied before the single inline retry after a math failure.
    MathFallback,
    /// Applied to a longtable column specification during repair.
    ColumnSpec,
    /// Applied to a longtable body during repair.
    TableRepair,
    /// Applied to every cell during direct extraction.
    CellCleanup,
    /// Applied to literal cell text when building HTML.
    CellMarkup,
}

/// Identifier of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    BraceSuperscript,
    BraceSubscript,
    EqualsMarker,
    TextCommandTypo,
    MangledTextCommand,
    CenteredColumn,
    RaggedRightColumn,
    RaggedLeftColumn,
    StrayColumnPrefix,
    LinewidthColumn,
    FixedWidthColumn,
    ColumnSeparator,
    TopRule,
    MidRule,
    BottomRule,
    NoAlign,
    BoundaryCommand,
    Minipage,
    RowSpacing,
    TabColSep,
    RealMacro,
    BeginEnvironment,
    EndEnvironment,
    FormattingCommand,
    MangledFormatting,
    CellColumnPrefix,
    CellWidthColumn,
    RowSpacingResidue,
    BoldText,
}

/// A compiled rewrite rule.
#[derive(Debug)]
pub struct Rule {
    pub id: RuleId,
    pub tier: Tier,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl Rule {
    /// Rewrite every match of this rule in `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, self.replacement)
    }
}

fn compile(id: RuleId, tier: Tier, pattern: &str, replacement: &'static str) -> Rule {
    let pattern = Regex::new(pattern)
        .unwrap_or_else(|e| panic!("BUG: rule {:?} has an invalid pattern: {}", id, e));
    Rule {
        id,
        tier,
        pattern,
        replacement,
    }
}

// Brace group nested at most three levels, enough for
// `p{(\linewidth - 6\tabcolsep) * \real{0.24}}`.
const GROUP: &str = r"\{(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*\}";

lazy_static! {
    /// The rule table, in application order.
    pub static ref RULES: Vec<Rule> = {
        use RuleId::*;
        use Tier::*;

        vec![
            compile(BraceSuperscript, ScriptNormalize, r"([A-Za-z0-9])\^([A-Za-z0-9])", "${1}^{${2}}"),
            compile(BraceSubscript, ScriptNormalize, r"([A-Za-z0-9])_([A-Za-z0-9])", "${1}_{${2}}"),

            compile(EqualsMarker, MathFallback, r"\\eq\b", "="),
            compile(TextCommandTypo, MathFallback, r"\\ext\b", r"\text"),
            compile(MangledTextCommand, MathFallback, r"\x09ext\{", r"\text{"),

            compile(
                CenteredColumn,
                ColumnSpec,
                &format!(r">\{{\s*\\?centering\s*\\arraybackslash\s*\}}\s*[pmb]{}", GROUP),
                "c",
            ),
            compile(
                RaggedRightColumn,
                ColumnSpec,
                &format!(r">\{{\s*\\?r?aggedright\s*\\arraybackslash\s*\}}\s*[pmb]{}", GROUP),
                "l",
            ),
            compile(
                RaggedLeftColumn,
                ColumnSpec,
                &format!(r">\{{\s*\\?r?aggedleft\s*\\arraybackslash\s*\}}\s*[pmb]{}", GROUP),
                "r",
            ),
            compile(StrayColumnPrefix, ColumnSpec, r">\{(?:[^{}]|\{[^{}]*\})*\}", ""),
            compile(
                LinewidthColumn,
                ColumnSpec,
                r"[pmb]\{[^{}]*linewidth(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*\}",
                FIXED_COLUMN_WIDTH,
            ),
            compile(FixedWidthColumn, ColumnSpec, &format!(r"[pmb]{}", GROUP), FIXED_COLUMN_WIDTH),
            compile(ColumnSeparator, ColumnSpec, r"@\{[^{}]*\}", ""),

            compile(TopRule, TableRepair, r"\\?t?oprule\b", r"\hline\hline"),
            compile(MidRule, TableRepair, r"\\?midrule\b", r"\hline"),
            compile(BottomRule, TableRepair, r"\\?bottomrule\b", r"\hline\hline"),
            compile(NoAlign, TableRepair, r"\\?n?oalign\s*\{[^{}]*\}", ""),
            compile(
                BoundaryCommand,
                TableRepair,
                r"\\?(?:endfirsthead|endhead|endlastfoot|endfoot)\b",
                "",
            ),
            compile(
                Minipage,
                TableRepair,
                r"\\begin\{minipage\}(?:\[[^\]]*\])?\{[^{}]*\}((?s:.*?))\\end\{minipage\}",
                "${1}",
            ),
            compile(RowSpacing, TableRepair, r"\\\\\[[^\]]*\]", r"\\"),
            compile(TabColSep, TableRepair, r"(?:\\t|\\|\b)abcolsep\b", ""),
            compile(RealMacro, TableRepair, r"(?:\\r|\\|\b)eal\{[^{}]*\}", ""),

            compile(
                BeginEnvironment,
                CellCleanup,
                &format!(r"\\begin\{{[^{{}}]*\}}(?:\[[^\]]*\])?(?:{})?", GROUP),
                "",
            ),
            compile(EndEnvironment, CellCleanup, r"\\end\{[^{}]*\}", ""),
            compile(
                FormattingCommand,
                CellCleanup,
                r"\\(?:centering|r?aggedright|r?aggedleft|arraybackslash|hline|t?oprule|midrule|bottomrule|n?oalign\s*\{[^{}]*\}|endfirsthead|endhead|endlastfoot|endfoot)",
                "",
            ),
            compile(
                MangledFormatting,
                CellCleanup,
                r"\b(?:oprule|aggedright|aggedleft|oalign\s*\{[^{}]*\})",
                "",
            ),
            compile(CellColumnPrefix, CellCleanup, r">\{(?:[^{}]|\{[^{}]*\})*\}", ""),
            compile(CellWidthColumn, CellCleanup, &format!(r"\bp{}", GROUP), ""),
            compile(RowSpacingResidue, CellCleanup, r"^\s*\[[0-9.]*[a-z]*\]", ""),

            compile(BoldText, CellMarkup, r"\\textbf\{([^{}]*)\}", "<strong>${1}</strong>"),
        ]
    };
}

/// Look up a rule by id.
pub fn rule(id: RuleId) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| rule.id == id)
        .unwrap_or_else(|| panic!("BUG: rule {:?} missing from the table", id))
}

/// Rules of one tier, in application order.
pub fn rules(tier: Tier) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.tier == tier)
}

/// Apply every rule of `tier` to `text`, in table order.
pub fn apply_tier(tier: Tier, text: &str) -> String {
    rules(tier).fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned())
}
