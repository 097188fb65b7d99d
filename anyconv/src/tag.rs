//! Struct tag parsing.

/// Tags consulted, in order, when resolving the external name of a field.
pub const DEFAULT_PRIORITY_TAGS: &[&str] = &["gconv", "param", "params", "c", "p", "json"];

/// A parsed tag value such as `"name,omitempty"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSpec<'a> {
    /// The external name. Empty when the tag only carries options.
    pub name: &'a str,
    /// `omitempty` was given.
    pub omit_empty: bool,
    /// The tag is exactly `-`: the field is skipped.
    pub excluded: bool,
}

impl<'a> TagSpec<'a> {
    /// Parses a raw tag value.
    pub fn parse(raw: &'a str) -> Self {
        if raw == "-" {
            return TagSpec {
                name: "",
                omit_empty: false,
                excluded: true,
            };
        }
        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or_default().trim();
        let omit_empty = parts.any(|opt| opt.trim() == "omitempty");
        TagSpec {
            name,
            omit_empty,
            excluded: false,
        }
    }
}

/// Resolves the effective tag list: caller tags first, then `defaults`,
/// without duplicates. Entries containing commas are split.
pub fn priority_tags<S: AsRef<str>>(caller: &[S], defaults: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(caller.len() + defaults.len());
    let caller = caller
        .iter()
        .flat_map(|t| t.as_ref().split(','))
        .map(str::trim);
    for tag in caller.chain(defaults.iter().map(String::as_str)) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

/// Lower-cases `name` and drops everything that is not a letter or digit.
///
/// `"Nick_Name"`, `"nick-name"` and `"NICKNAME"` all become `"nickname"`.
pub fn fuzzy_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
