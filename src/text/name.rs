use biblatex::{Bibliography, Person};
use tracing::debug;

/// Rewrite a BibTeX author list so every name reads `Last, Jr, F.`.
///
/// Names are split and parsed by `biblatex`. The von part is dropped and given names are
/// reduced to initials, so `"Smith, John"` and `"John Smith"` produce the same key. Names stay
/// joined by ` and `. A list `biblatex` cannot read is returned trimmed.
pub fn fix_author_for_alphabetization(authors: &str) -> String {
    let authors = authors.trim();
    if authors.is_empty() {
        return String::new();
    }

    match parse_people(authors) {
        Some(people) => people
            .iter()
            .filter(|p| p.name != "others")
            .map(alphabetization_key)
            .filter(|key| !key.is_empty())
            .collect::<Vec<_>>()
            .join(" and "),
        None => authors.to_string(),
    }
}

/// Parse `authors` as the `author` field of a throwaway entry.
fn parse_people(authors: &str) -> Option<Vec<Person>> {
    let src = format!("@misc{{names, author = {{{authors}}}}}");
    let bib = match Bibliography::parse(&src) {
        Ok(bib) => bib,
        Err(err) => {
            debug!(%authors, %err, "cannot parse author list");
            return None;
        }
    };
    bib.get("names")?.author().ok()
}

fn alphabetization_key(person: &Person) -> String {
    let mut key = strip_braces(person.name.trim());
    let suffix = strip_braces(person.suffix.trim());
    if !suffix.is_empty() {
        key.push_str(", ");
        key.push_str(&suffix);
    }
    let initials = initials(&person.given_name);
    if !initials.is_empty() {
        if !key.is_empty() {
            key.push_str(", ");
        }
        key.push_str(&initials);
    }
    key
}

fn initials(given: &str) -> String {
    given
        .split_whitespace()
        .map(|w| {
            w.split('-')
                .filter_map(|part| {
                    strip_braces(part)
                        .chars()
                        .find(|c| c.is_alphabetic())
                        .map(|c| format!("{c}."))
                })
                .collect::<Vec<_>>()
                .join("-")
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_braces(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '{' | '}')).collect()
}
