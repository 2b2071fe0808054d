//! Report rendering module
//!
//! Two renderers share the analysis output:
//! - Report card: a printable RTL HTML page for a single student
//! - Digest: a per-sheet text report for teachers, with an HTML variant

mod card;
mod digest;

pub use card::render_report_card;
pub use digest::DigestGenerator;

/// Minimal HTML escaping for user-controlled text placed in markup
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("أحمد"), "أحمد");
        assert_eq!(
            escape_html("<script>\"x\" & y</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;"
        );
    }
}
