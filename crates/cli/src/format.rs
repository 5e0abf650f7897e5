//! Reply → terminal string formatting.
//!
//! Redis-style rendering:
//!
//! ```text
//! (nil)
//! (error) ERR no such key
//! plain-string
//! (uint) 7
//! (int) -3
//! (bool) true
//! (double) 1.5
//! (list) count: 2
//!   1) a
//!   2) b
//! ```

use coral_core::Reply;

/// Render a reply for the terminal.
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::Null => "(nil)".to_string(),
        Reply::Error(text) => format!("(error) {text}"),
        Reply::Str(s) => s.clone(),
        Reply::Uint(n) => format!("(uint) {n}"),
        Reply::Int(n) => format!("(int) {n}"),
        Reply::Bool(b) => format!("(bool) {b}"),
        Reply::Double(d) => format!("(double) {d}"),
        Reply::List(items) => {
            let mut out = format!("(list) count: {}", items.len());
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!("\n  {}) {}", i + 1, inline(item)));
            }
            out
        }
    }
}

/// One-line rendering for list items: strings stay bare, everything else
/// keeps its tag.
fn inline(reply: &Reply) -> String {
    match reply {
        Reply::Str(s) => s.clone(),
        other => format_reply(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_formats() {
        assert_eq!(format_reply(&Reply::Null), "(nil)");
        assert_eq!(
            format_reply(&Reply::Error("ERR no such key".into())),
            "(error) ERR no such key"
        );
        assert_eq!(format_reply(&Reply::Str("cch137".into())), "cch137");
        assert_eq!(format_reply(&Reply::Uint(7)), "(uint) 7");
        assert_eq!(format_reply(&Reply::Int(-3)), "(int) -3");
        assert_eq!(format_reply(&Reply::Bool(true)), "(bool) true");
        assert_eq!(format_reply(&Reply::Bool(false)), "(bool) false");
        assert_eq!(format_reply(&Reply::Double(1.5)), "(double) 1.5");
    }

    #[test]
    fn test_list_format() {
        let reply = Reply::from_strings(vec!["g".to_string(), "f".to_string()]);
        assert_eq!(format_reply(&reply), "(list) count: 2\n  1) g\n  2) f");
    }

    #[test]
    fn test_empty_list_format() {
        assert_eq!(format_reply(&Reply::List(vec![])), "(list) count: 0");
    }
}
