/// Normalize a name or title into a URL slug.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        // Marks belong to the preceding letter, which has already been handled.
        if is_combining_mark(ch) {
            continue;
        }
        let folded = fold(ch);
        if folded.is_none() && !ch.is_ascii_alphanumeric() {
            pending_dash = true;
            continue;
        }

        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        match folded {
            Some(ascii) => out.push_str(ascii),
            None => out.push(ch),
        }
    }

    out
}

/// First of `base`, `base-2`, `base-3`, ... that `taken` does not claim.
pub fn unique_slug(base: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Nonspacing marks from the combining blocks, as produced by decomposed
/// input or by lowercasing `İ`.
fn is_combining_mark(ch: char) -> bool {
    matches!(
        ch,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// ASCII spelling of a non-ASCII Latin letter.
fn fold(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' | 'ģ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ř' => "r",
        'ś' | 'ş' | 'š' | 'ș' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separators_and_trims() {
        assert_eq!(slugify("  Green   Tea -- Sencha! "), "green-tea-sencha");
        assert_eq!(slugify("100g pack"), "100g-pack");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn folds_latin_diacritics() {
        assert_eq!(slugify("Čajová konvička"), "cajova-konvicka");
        assert_eq!(slugify("Straße Grüner Tee"), "strasse-gruner-tee");
        assert_eq!(slugify("Œuvre Ñandú"), "oeuvre-nandu");
    }

    #[test]
    fn combining_marks_do_not_split_words() {
        assert_eq!(slugify("İstanbul chai"), "istanbul-chai");
        assert_eq!(slugify("C\u{30C}aj zelený"), "caj-zeleny");
    }

    #[test]
    fn drops_characters_without_a_fold() {
        assert_eq!(slugify("Pu-erh 普洱 2019"), "pu-erh-2019");
    }

    #[test]
    fn unique_slug_appends_the_first_free_counter() {
        let taken = ["oolong", "oolong-2"];
        assert_eq!(unique_slug("oolong", |s| taken.contains(&s)), "oolong-3");
        assert_eq!(unique_slug("matcha", |s| taken.contains(&s)), "matcha");
    }
}
