//! Plain-text flattening of report markup.

const BLOCK_TAGS: &[&str] = &[
    "br", "div", "p", "li", "ul", "ol", "tr", "table", "thead", "tbody", "h1", "h2", "h3", "h4",
    "h5", "h6", "section",
];

const CELL_TAGS: &[&str] = &["td", "th"];

/// Convert report markup into display lines.
///
/// Block elements start a new line, table cells are separated by `" | "`,
/// whitespace is collapsed and common entities are decoded. Blank lines are
/// dropped.
pub fn markup_to_text(markup: &str) -> Vec<String> {
    let mut raw = String::with_capacity(markup.len());
    let mut chars = markup.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            raw.push(c);
            continue;
        }

        let mut tag = String::new();
        for t in chars.by_ref() {
            if t == '>' {
                break;
            }
            tag.push(t);
        }

        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if BLOCK_TAGS.contains(&name.as_str()) {
            raw.push('\n');
        } else if closing && CELL_TAGS.contains(&name.as_str()) {
            raw.push_str(" | ");
        }
    }

    raw.lines()
        .map(|line| {
            let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
            let trimmed = collapsed.trim_end_matches('|').trim_end();
            decode_entities(trimmed)
        })
        .filter(|line| !line.trim().is_empty())
        .collect()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_become_lines() {
        let markup = "<div><h3>Daily Needs</h3><p>Protein: <strong>60 g</strong></p>\
                      <p>Iron &amp; Folate</p></div>";
        assert_eq!(
            markup_to_text(markup),
            vec!["Daily Needs", "Protein: 60 g", "Iron & Folate"]
        );
    }

    #[test]
    fn table_cells_are_separated() {
        let markup = "<table><tr><th>Nutrient</th><th>Apple</th></tr>\
                      <tr><td>Calories</td><td>52</td></tr></table>";
        assert_eq!(
            markup_to_text(markup),
            vec!["Nutrient | Apple", "Calories | 52"]
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(markup_to_text("  just   text "), vec!["just text"]);
        assert!(markup_to_text("<div>  </div>").is_empty());
    }

    #[test]
    fn br_breaks_lines() {
        assert_eq!(markup_to_text("a<br/>b<br>c"), vec!["a", "b", "c"]);
    }
}
