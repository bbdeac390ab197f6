//! Generates the fixed Python harness around caller-supplied code.
//!
//! The harness standardizes stream encoding (UTF-8, replace on error),
//! forces the matplotlib backend to the file-writing `Agg` so plotting
//! never opens a window, and wraps the caller's code in a failure boundary
//! so an uncaught exception becomes a printed diagnostic plus a nonzero
//! exit instead of an interpreter crash with no usable output.

/// Prefix of the diagnostic line the harness prints when the caller's code
/// raises. Mirrored on stdout (so the user sees it) and stderr (so the
/// response's `error` field carries it).
pub const ERROR_MARKER: &str = "execution error:";

/// Filename of the harness script inside a session workspace. The
/// workspace itself is uniquely named, so the filename can stay fixed.
pub const SCRIPT_NAME: &str = "script.py";

/// Embed caller code into the harness template.
///
/// The caller's lines are re-indented by four spaces uniformly so their
/// relative structure is preserved; blank lines pass through unindented
/// (trailing whitespace on an otherwise-empty line would be harmless but
/// Python scripts are whitespace-sensitive everywhere else).
pub fn wrap_code(source: &str) -> String {
    format!(
        r#"# -*- coding: utf-8 -*-
import sys
import io
sys.stdout = io.TextIOWrapper(sys.stdout.buffer, encoding='utf-8', errors='replace')
sys.stderr = io.TextIOWrapper(sys.stderr.buffer, encoding='utf-8', errors='replace')

try:
    import matplotlib as mpl
    mpl.use('Agg')
    import matplotlib.pyplot as plt
except ImportError:
    pass

try:
{code}
except Exception as e:
    print("{marker}", e)
    print("{marker}", e, file=sys.stderr)
    sys.exit(1)
"#,
        code = indent_code(source, 4),
        marker = ERROR_MARKER,
    )
}

/// Re-indent every non-blank line by `spaces` spaces.
fn indent_code(code: &str, spaces: usize) -> String {
    let indent = " ".repeat(spaces);
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
