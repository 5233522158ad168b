pub mod clipboard;
pub mod meta;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::quiz::crew::Character;

/// Fragment placed between the site base URL and a result slug.
pub const RESULT_ROUTE_PREFIX: &str = "#/result/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareArtifacts {
    pub slug: String,
    pub share_url: String,
    pub share_message: String,
}

pub fn build_share_artifacts(character: &Character, base_url: &str) -> ShareArtifacts {
    let slug = slugify(character.name);
    let share_url = format!("{}{}{}", base_url, RESULT_ROUTE_PREFIX, slug);
    let share_message = format!(
        "I just got matched to {} in the Johnny Mecuerdo Crew Quiz! Who's in your crew? ⚓️🍻 {}",
        character.name, share_url
    );
    ShareArtifacts {
        slug,
        share_url,
        share_message,
    }
}

/// Turns a display name into the URL slug used by share links.
///
/// Lowercases, collapses whitespace runs into one hyphen, folds accented
/// Latin letters to their base letter and drops anything else outside
/// `[a-z0-9-]`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.to_lowercase().nfd() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        // Accents come apart from their letter under NFD
        if is_combining_mark(c) {
            continue;
        }
        in_whitespace = false;

        let c = fold_stroke(c);
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }
    slug
}

/// Letters with a stroke or slash have no decomposition.
fn fold_stroke(c: char) -> char {
    match c {
        'ł' => 'l',
        'ø' => 'o',
        'đ' => 'd',
        'ħ' => 'h',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::crew::{find_by_key, CREW};

    #[test]
    fn el_capo_share_link() {
        let capo = find_by_key("el-capo").unwrap();
        let artifacts = build_share_artifacts(capo, "https://example.com/");
        assert_eq!(artifacts.slug, "el-capo");
        assert_eq!(artifacts.share_url, "https://example.com/#/result/el-capo");
        assert_eq!(
            artifacts.share_message,
            "I just got matched to El Capo in the Johnny Mecuerdo Crew Quiz! Who's in your crew? ⚓️🍻 https://example.com/#/result/el-capo"
        );
    }

    #[test]
    fn slugify_rules() {
        assert_eq!(slugify("Johnny Mecuerdo"), "johnny-mecuerdo");
        assert_eq!(slugify("El Pinche Güey"), "el-pinche-guey");
        assert_eq!(slugify("  Cap'n   Hook!  "), "-capn-hook-");
        assert_eq!(slugify("Crew #42"), "crew-42");
        assert_eq!(slugify("Ship\tShape"), "ship-shape");
        assert_eq!(slugify("☠ Skull"), "-skull");
    }

    #[test]
    fn slugify_folds_any_accented_latin_letter() {
        assert_eq!(slugify("Čapek Ship"), "capek-ship");
        assert_eq!(slugify("Łukasz Mota"), "lukasz-mota");
        assert_eq!(slugify("Señor Ő"), "senor-o");
        assert_eq!(slugify("El Pinche Gu\u{308}ey"), "el-pinche-guey");
    }

    #[test]
    fn every_character_slug_is_its_key() {
        for character in CREW.iter() {
            assert_eq!(
                build_share_artifacts(character, "https://x.test/").slug,
                character.key
            );
        }
    }
}
