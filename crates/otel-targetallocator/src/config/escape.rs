//! The collector resolves `${VAR}` style environment references in its
//! configuration, so a literal dollar sign has to be written as `$$` there.
//! The target allocator performs no such substitution and expects plain `$`
//! characters, e.g. in the `replacement` of a relabel config.

use std::borrow::Cow;

const ESCAPED_DOLLAR_SIGN: &str = "$$";
const DOLLAR_SIGN: &str = "$";

/// Collapses every `$$` in `raw` into a single `$`. Pairs are matched from
/// left to right without overlap, so `$$$` becomes `$$` and `$$$$` becomes
/// `$$`. No other character is touched.
///
/// This works on the raw text, before the document is parsed, and applies to
/// the whole input rather than only to the scrape configs.
///
/// ```
/// # use otel_targetallocator::config::escape::unescape_dollar_signs;
/// assert_eq!(unescape_dollar_signs("replacement: $$1"), "replacement: $1");
/// assert_eq!(unescape_dollar_signs("replacement: $1"), "replacement: $1");
/// ```
pub fn unescape_dollar_signs(raw: &str) -> Cow<'_, str> {
    if raw.contains(ESCAPED_DOLLAR_SIGN) {
        Cow::Owned(raw.replace(ESCAPED_DOLLAR_SIGN, DOLLAR_SIGN))
    } else {
        Cow::Borrowed(raw)
    }
}
