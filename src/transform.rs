//! Probe-URL synthesis from discovered form fields.
//!
//! Field names come from a second regex pass over the matched tag text
//! (`name="…"`, double quotes only), de-duplicated in first-seen order.
//! Each name gets an independently drawn random value, and the base URL's
//! query component is replaced wholesale with the resulting string.

use rand::Rng;
use regex::Regex;
use url::Url;

const VALUE_LEN: usize = 7;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Builds probe URLs with one randomized query value per field name.
pub struct QuerySynthesizer {
    name_re: Regex,
}

impl QuerySynthesizer {
    pub fn new() -> Self {
        let name_re = Regex::new(r#"name="([^"]+)""#).expect("name pattern compiles");
        Self { name_re }
    }

    /// `name="…"` values across all tags, first-seen order, no duplicates.
    pub fn field_names(&self, tags: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for tag in tags {
            for caps in self.name_re.captures_iter(tag) {
                let name = &caps[1];
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Replace the query of `base_url` with `name=<random>` pairs drawn from
    /// the tag sequence.
    ///
    /// Fail-soft on both edges: an unparseable base URL comes back unchanged,
    /// and a tag sequence yielding zero field names returns the input string
    /// verbatim so the caller's identity check suppresses the probe line.
    /// The verbatim short-circuit matters because [`Url`] normalizes on
    /// re-serialization and would otherwise break that check.
    pub fn rewrite(&self, base_url: &str, tags: &[&str]) -> String {
        let names = self.field_names(tags);
        if names.is_empty() {
            return base_url.to_string();
        }

        let query = names
            .iter()
            .map(|name| format!("{name}={}", random_value(VALUE_LEN)))
            .collect::<Vec<_>>()
            .join("&");

        match Url::parse(base_url) {
            Ok(mut url) => {
                url.set_query(Some(&query));
                url.to_string()
            }
            Err(_) => base_url.to_string(),
        }
    }
}

/// A random string of `len` lowercase ASCII letters. Uses the thread-local
/// RNG, seeded once, rather than reseeding from the clock per call.
fn random_value(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
