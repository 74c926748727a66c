/// Delimiter separating sentence-like segments in normalized text.
pub const SEGMENT_DELIMITER: &str = ". ";

/// Canonicalizes raw input text.
///
/// Rules, applied in order:
/// - remove every `\n` and `\r`
/// - remove every double quote
/// - `"? "` becomes `"?. "` and `"! "` becomes `"!. "` so that questions and
///   exclamations end a segment
/// - lowercase
///
/// Normalizing already normalized text returns it unchanged.
pub fn normalize(raw: &str) -> String {
	let cleaned: String = raw
		.chars()
		.filter(|c| !matches!(c, '\n' | '\r' | '"'))
		.collect();

	cleaned
		.replace("? ", "?. ")
		.replace("! ", "!. ")
		.to_lowercase()
}

/// Splits normalized text into sentence-like segments on `". "`.
///
/// Empty input yields no segment. Empty pieces between two delimiters are
/// kept, so `"a. . b"` gives `"a"`, `""` and `"b"`.
pub fn segment(normalized: &str) -> impl Iterator<Item = &str> {
	let mut segments = normalized.split(SEGMENT_DELIMITER);
	if normalized.is_empty() {
		// Splitting "" yields a single empty piece
		segments.next();
	}
	segments
}

/// Splits one segment into whitespace-delimited word tokens.
///
/// Token order is significant: positions are stored in every context.
pub fn tokenize(segment: &str) -> Vec<&str> {
	segment.split_whitespace().collect()
}

/// Joins tokens with single spaces, giving the canonical form of a line.
pub fn canonicalize<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut canonical = String::new();
	for (i, token) in tokens.iter().enumerate() {
		if i > 0 {
			canonical.push(' ');
		}
		canonical.push_str(token.as_ref());
	}
	canonical
}
