//! Recherche approximative pour l'autocomplétion.
//!
//! Un élément correspond si les caractères saisis apparaissent dans l'ordre dans sa clé.
//! Les résultats sont triés par longueur de la correspondance, puis position, puis clé.

use regex::RegexBuilder;

pub fn finder<'a, T, F>(text: &str, collection: &'a [T], key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let pattern = text
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(".*?");
    let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => regex,
        Err(_) => return Vec::new(),
    };
    let mut suggestions: Vec<_> = collection
        .iter()
        .filter_map(|item| {
            let found = regex.find(key(item))?;
            Some((found.end() - found.start(), found.start(), key(item), item))
        })
        .collect();
    suggestions.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));
    suggestions.into_iter().map(|(.., item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::finder;

    const SETTINGS: [&str; 4] = ["PostChannelID", "PostTarget", "AdaptiveTargetRange", "DetectPotentialPost"];

    #[test]
    fn subsequence_match() {
        let found = finder("target", &SETTINGS, |s| *s);
        assert_eq!(found, vec![&"PostTarget", &"AdaptiveTargetRange"]);
    }

    #[test]
    fn tighter_match_first() {
        let found = finder("post", &SETTINGS, |s| *s);
        assert_eq!(found, vec![&"PostChannelID", &"PostTarget", &"DetectPotentialPost"]);
    }

    #[test]
    fn empty_text_lists_everything() {
        assert_eq!(finder("", &SETTINGS, |s| *s).len(), 4);
        assert!(finder("zzz", &SETTINGS, |s| *s).is_empty());
        assert_eq!(finder(".*", &["a.*b", "ab"], |s| *s), vec![&"a.*b"]);
    }
}
