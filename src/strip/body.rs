//! Document body extraction.

use crate::error::{Delimiter, Error, Result};

/// Start marker of the document body.
pub const BEGIN_DOCUMENT: &str = r"\begin{document}";

/// End marker of the document body.
pub const END_DOCUMENT: &str = r"\end{document}";

/// Returns the text strictly between the first `\begin{document}` and the
/// first `\end{document}` following it.
///
/// `name` identifies the document in the error.
pub fn extract_body<'a>(name: &str, text: &'a str) -> Result<&'a str> {
    find_body(text).map_err(|missing| Error::MalformedDocument {
        document: name.to_string(),
        missing,
    })
}

/// Returns true if the text contains a complete delimiter pair.
pub fn has_body(text: &str) -> bool {
    find_body(text).is_ok()
}

fn find_body(text: &str) -> std::result::Result<&str, Delimiter> {
    let start = text.find(BEGIN_DOCUMENT).ok_or(Delimiter::Begin)? + BEGIN_DOCUMENT.len();
    let len = text[start..].find(END_DOCUMENT).ok_or(Delimiter::End)?;
    Ok(&text[start..start + len])
}
