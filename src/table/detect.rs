//! Recognising table markup the math engine cannot typeset as is.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LONGTABLE: Regex = Regex::new(r"\\begin\{longtable\}").unwrap();
    // `>{\centering\arraybackslash}p{...}` and its mangled variants.
    static ref CUSTOM_COLUMN_SPEC: Regex =
        Regex::new(r"(?i)>\{[^{}]*arraybackslash\s*\}\s*[pmb]\{").unwrap();
    static ref TABCOLSEP: Regex = Regex::new(r"(?i)abcolsep").unwrap();
    static ref LINEWIDTH: Regex = Regex::new(r"(?i)linewidth").unwrap();
}

/// Whether `input` holds a `longtable` with converter-generated column specs,
/// or one of the two mangled table shapes seen in imported questions.
pub fn contains_complex_table(input: &str) -> bool {
    if has_mangled_raggedright(input) || has_variable_fixture(input) {
        return true;
    }

    LONGTABLE.is_match(input)
        && (CUSTOM_COLUMN_SPEC.is_match(input)
            || TABCOLSEP.is_match(input)
            || LINEWIDTH.is_match(input))
}

/// Whether `input` contains a `longtable` environment at all.
pub fn contains_longtable(input: &str) -> bool {
    LONGTABLE.is_match(input)
}

/// `\r` and `\t` eaten as control characters: `aggedright\arraybackslash`,
/// `abcolsep`, `eal{`.
fn has_mangled_raggedright(input: &str) -> bool {
    input.contains("aggedright\\arraybackslash")
        && input.contains("abcolsep")
        && input.contains("eal{")
}

/// The two-row `$x$` / `$y$` value table.
fn has_variable_fixture(input: &str) -> bool {
    input.contains("$x$") && input.contains("$y$") && input.contains("oprule")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONVERTER_OUTPUT: &str = r"\begin{longtable}[]{@{} >{\centering\arraybackslash}p{(\linewidth - 6\tabcolsep) * \real{0.25}} >{\centering\arraybackslash}p{(\linewidth - 6\tabcolsep) * \real{0.25}}@{}} \toprule \endhead a & b \\ \bottomrule \end{longtable}";

    #[test]
    fn test_converter_longtable_is_complex() {
        assert!(contains_complex_table(CONVERTER_OUTPUT));
    }

    #[test]
    fn test_linewidth_alone_is_enough() {
        assert!(contains_complex_table(
            r"\begin{longtable}{p{0.5\linewidth}l} a & b \\ \end{longtable}"
        ));
    }

    #[test]
    fn test_plain_tabular_is_not_complex() {
        assert!(!contains_complex_table(
            r"\begin{tabular}{cc} a & b \\ c & d \end{tabular}"
        ));
        assert!(!contains_complex_table(
            r"\begin{longtable}{cc} a & b \\ \end{longtable}"
        ));
    }

    #[test]
    fn test_mangled_signatures() {
        assert!(contains_complex_table(
            "> { aggedright\\arraybackslash}p{(\\linewidth - 6 abcolsep) * eal{0.2}}"
        ));
        assert!(contains_complex_table(
            " oprule oalign{} $x$ & 0 & -1 \\\\ $y$ & -1 & -3 \\\\"
        ));
        assert!(!contains_complex_table("$x$ and $y$ only"));
    }

    #[test]
    fn test_empty_input() {
        assert!(!contains_complex_table(""));
        assert!(!contains_longtable(""));
    }
}
