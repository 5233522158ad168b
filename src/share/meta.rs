//! Social preview metadata for result pages.
//!
//! Tags are written through a [`MetadataSink`], an upsert-by-key store. The
//! bot keeps one [`InMemorySink`] per rendered result and builds the result
//! card from it.

use crate::quiz::crew::Character;
use crate::share::slugify;

const SITE_TITLE: &str = "Johnny Mecuerdo Crew Quiz";
const OG_DESCRIPTION: &str = "Find out who *you* are in the world of rum, riddles, and riot. Take the quiz to discover your pirate alter ego!";
const TWITTER_DESCRIPTION: &str = "Find out who *you* are in the world of rum, riddles, and riot.";
const NOT_FOUND_TITLE: &str = "Crew Member Not Found - Johnny Mecuerdo Quiz";
const NOT_FOUND_DESCRIPTION: &str =
    "This pirate seems to have walked the plank! Take the quiz to find your own crew member.";

pub trait MetadataSink {
    fn title(&self) -> Option<&str>;
    fn set_title(&mut self, title: &str);
    fn get(&self, property: &str) -> Option<&str>;
    /// Updates the tag for `property`, creating it if it does not exist yet.
    fn upsert(&mut self, property: &str, content: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub property: String,
    pub content: String,
}

/// Keeps tags in insertion order, like elements appended to a document head.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    title: Option<String>,
    tags: Vec<MetaTag>,
}

#[cfg(test)]
impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[MetaTag] {
        &self.tags
    }
}

impl MetadataSink for InMemorySink {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn get(&self, property: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.property == property)
            .map(|t| t.content.as_str())
    }

    fn upsert(&mut self, property: &str, content: &str) {
        match self.tags.iter_mut().find(|t| t.property == property) {
            Some(tag) => tag.content = content.to_string(),
            None => self.tags.push(MetaTag {
                property: property.to_string(),
                content: content.to_string(),
            }),
        }
    }
}

/// Where the quiz is published: `base_url` is the page that hosts it,
/// `origin` the scheme and host that serve the card images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub base_url: String,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMeta {
    pub title: String,
    pub og_title: String,
    pub og_description: String,
    pub og_url: String,
    pub og_image: String,
    pub twitter_title: String,
    pub twitter_description: String,
    pub twitter_image: String,
}

impl SocialMeta {
    pub fn for_character(character: &Character, site: &Site) -> Self {
        let slug = slugify(character.name);
        let headline = format!("I'm {} in the Johnny Mecuerdo Crew!", character.name);
        let image = format!("{}/crew-cards/{}.png", site.origin, slug);
        Self {
            title: format!("I'm {}! - {}", character.name, SITE_TITLE),
            og_title: headline.clone(),
            og_description: OG_DESCRIPTION.to_string(),
            og_url: format!("{}{}{}", site.base_url, super::RESULT_ROUTE_PREFIX, slug),
            og_image: image.clone(),
            twitter_title: headline,
            twitter_description: TWITTER_DESCRIPTION.to_string(),
            twitter_image: image,
        }
    }

    pub fn not_found(site: &Site) -> Self {
        let image = format!("{}/og-image.png", site.origin);
        Self {
            title: NOT_FOUND_TITLE.to_string(),
            og_title: NOT_FOUND_TITLE.to_string(),
            og_description: NOT_FOUND_DESCRIPTION.to_string(),
            og_url: site.base_url.clone(),
            og_image: image.clone(),
            twitter_title: NOT_FOUND_TITLE.to_string(),
            twitter_description: NOT_FOUND_DESCRIPTION.to_string(),
            twitter_image: image,
        }
    }

    pub fn tags(&self) -> [(&'static str, &str); 9] {
        [
            ("og:title", self.og_title.as_str()),
            ("og:description", self.og_description.as_str()),
            ("og:url", self.og_url.as_str()),
            ("og:image", self.og_image.as_str()),
            ("og:type", "website"),
            ("twitter:card", "summary_large_image"),
            ("twitter:title", self.twitter_title.as_str()),
            ("twitter:description", self.twitter_description.as_str()),
            ("twitter:image", self.twitter_image.as_str()),
        ]
    }

    pub fn apply<S: MetadataSink + ?Sized>(&self, sink: &mut S) {
        for (property, content) in self.tags() {
            sink.upsert(property, content);
        }
        sink.set_title(&self.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::crew::find_by_key;

    fn site() -> Site {
        Site {
            base_url: "https://example.com/quiz/".to_string(),
            origin: "https://example.com".to_string(),
        }
    }

    #[test]
    fn character_tags() {
        let mut sink = InMemorySink::new();
        SocialMeta::for_character(find_by_key("felip-mota").unwrap(), &site()).apply(&mut sink);

        assert_eq!(sink.title(), Some("I'm Felip Mota! - Johnny Mecuerdo Crew Quiz"));
        assert_eq!(sink.get("og:title"), Some("I'm Felip Mota in the Johnny Mecuerdo Crew!"));
        assert_eq!(
            sink.get("og:url"),
            Some("https://example.com/quiz/#/result/felip-mota")
        );
        assert_eq!(
            sink.get("og:image"),
            Some("https://example.com/crew-cards/felip-mota.png")
        );
        assert_eq!(sink.get("twitter:image"), sink.get("og:image"));
        assert_eq!(sink.get("twitter:card"), Some("summary_large_image"));
        assert_eq!(sink.get("og:type"), Some("website"));
        assert_eq!(sink.tags().len(), 9);
    }

    #[test]
    fn applying_twice_keeps_one_tag_per_property() {
        let mut sink = InMemorySink::new();
        SocialMeta::for_character(find_by_key("el-capo").unwrap(), &site()).apply(&mut sink);
        SocialMeta::for_character(find_by_key("scrotum-jizum").unwrap(), &site())
            .apply(&mut sink);

        assert_eq!(sink.tags().len(), 9);
        for tag in sink.tags() {
            let count = sink
                .tags()
                .iter()
                .filter(|t| t.property == tag.property)
                .count();
            assert_eq!(count, 1, "{}", tag.property);
        }
        assert_eq!(
            sink.get("og:title"),
            Some("I'm Scrotum Jizum in the Johnny Mecuerdo Crew!")
        );
    }

    #[test]
    fn same_character_is_idempotent() {
        let capo = find_by_key("el-capo").unwrap();
        let mut once = InMemorySink::new();
        SocialMeta::for_character(capo, &site()).apply(&mut once);
        let mut twice = once.clone();
        SocialMeta::for_character(capo, &site()).apply(&mut twice);
        assert_eq!(once.tags(), twice.tags());
        assert_eq!(once.title(), twice.title());
    }

    #[test]
    fn not_found_overwrites_stale_character() {
        let mut sink = InMemorySink::new();
        SocialMeta::for_character(find_by_key("el-capo").unwrap(), &site()).apply(&mut sink);
        SocialMeta::not_found(&site()).apply(&mut sink);

        assert_eq!(sink.title(), Some("Crew Member Not Found - Johnny Mecuerdo Quiz"));
        assert_eq!(sink.get("og:url"), Some("https://example.com/quiz/"));
        assert_eq!(sink.get("og:image"), Some("https://example.com/og-image.png"));
        assert!(sink.tags().iter().all(|t| !t.content.contains("Capo")));
        assert_eq!(sink.tags().len(), 9);
    }
}
