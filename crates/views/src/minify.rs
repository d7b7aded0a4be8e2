//! Whitespace minification for view sources.

use std::borrow::Cow;

use regex::Regex;

struct Patterns {
	script: Regex,
	spaces: Regex,
	whitespace: Regex,
	between_tags: Regex,
}

/// Collapses insignificant whitespace in markup.
///
/// Script bodies are left as written. A disabled minifier returns its input
/// unchanged.
pub struct Minifier {
	patterns: Option<Patterns>,
}

impl Minifier {
	pub fn new(enabled: bool) -> Result<Self, regex::Error> {
		if !enabled {
			return Ok(Self::disabled());
		}
		Ok(Self {
			patterns: Some(Patterns {
				script: Regex::new(r"(?s)<script[^>]*>.+?</script>")?,
				spaces: Regex::new(r" +")?,
				whitespace: Regex::new(r"\s+")?,
				between_tags: Regex::new(r">\s+<")?,
			}),
		})
	}

	pub fn disabled() -> Self {
		Self { patterns: None }
	}

	pub fn is_enabled(&self) -> bool {
		self.patterns.is_some()
	}

	pub fn apply<'a>(&self, doc: &'a str) -> Cow<'a, str> {
		let Some(p) = &self.patterns else {
			return Cow::Borrowed(doc);
		};

		let collapsed = p.spaces.replace_all(doc.trim(), " ");
		let doc: &str = &collapsed;
		let mut out = String::with_capacity(doc.len());
		let mut last = 0;
		for script in p.script.find_iter(doc) {
			out.push_str(&p.whitespace.replace_all(&doc[last..script.start()], " "));
			out.push_str(script.as_str());
			last = script.end();
		}
		out.push_str(&p.whitespace.replace_all(&doc[last..], " "));

		Cow::Owned(p.between_tags.replace_all(&out, "><").into_owned())
	}
}

impl std::fmt::Debug for Minifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Minifier").field("enabled", &self.is_enabled()).finish()
	}
}
