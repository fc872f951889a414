//! Structured content produced by the model.
//!
//! These types are the JSON schemas the prompts ask for. Optional fields carry
//! `#[serde(default)]` so a slightly incomplete answer still parses.

use serde::{Deserialize, Serialize};

/// A blog post: title, hook, 3-5 sections and hashtags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    #[serde(default)]
    pub hook_text: String,
    #[serde(default)]
    pub sections: Vec<BlogSection>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogSection {
    pub sub_title: String,
    #[serde(default)]
    pub content: String,
}

/// A card-news outline: six carousel pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDeck {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// One carousel page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub page: u32,
    /// "cover", "body" or "ending". Serialized as "type".
    #[serde(rename = "type", default)]
    pub card_type: String,
    #[serde(default)]
    pub tag: String,
    pub headline: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<String>,
}

impl BlogPost {
    /// Hashtags without any leading `#`, blanks dropped.
    pub fn clean_hashtags(&self) -> impl Iterator<Item = &str> {
        self.hashtags
            .iter()
            .map(|t| t.trim().trim_start_matches('#'))
            .filter(|t| !t.is_empty())
    }

    /// Markdown document: title, quoted hook, sections, hashtags.
    pub fn to_markdown(&self) -> String {
        let sections = self
            .sections
            .iter()
            .map(|s| format!("## {}\n{}", s.sub_title, s.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        let hashtags = self
            .clean_hashtags()
            .map(|t| format!("#{t}"))
            .collect::<Vec<_>>()
            .join(" ");
        let doc = format!(
            "# {}\n\n> {}\n\n---\n\n{}\n\n---\n{}",
            self.title, self.hook_text, sections, hashtags
        );
        doc.trim().to_string()
    }
}

impl CardDeck {
    /// Fill in the brand when the model left it out.
    pub fn with_default_brand(mut self, brand: &str) -> Self {
        if self.brand.trim().is_empty() {
            self.brand = brand.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> BlogPost {
        BlogPost {
            title: "No more scissors".into(),
            hook_text: "Still cutting out problems?".into(),
            sections: vec![
                BlogSection {
                    sub_title: "The problem".into(),
                    content: "Gluing takes time.".into(),
                },
                BlogSection {
                    sub_title: "The fix".into(),
                    content: "Write once,\nsaved forever.".into(),
                },
            ],
            hashtags: vec!["studygram".into(), "#edtech".into(), "  ".into()],
        }
    }

    #[test]
    fn markdown_layout() {
        let md = sample_post().to_markdown();
        assert_eq!(
            md,
            "# No more scissors\n\n\
             > Still cutting out problems?\n\n\
             ---\n\n\
             ## The problem\nGluing takes time.\n\n\
             ## The fix\nWrite once,\nsaved forever.\n\n\
             ---\n\
             #studygram #edtech"
        );
    }

    #[test]
    fn blog_post_parses_model_output_with_missing_optionals() {
        let json = r#"{"title": "Only a title", "sections": [{"sub_title": "A"}]}"#;
        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.title, "Only a title");
        assert!(post.hook_text.is_empty());
        assert_eq!(post.sections[0].content, "");
        assert!(post.hashtags.is_empty());
    }

    #[test]
    fn card_type_field_renames_correctly() {
        let card = Card {
            page: 1,
            card_type: "cover".into(),
            tag: String::new(),
            headline: "Still\ncopying?".into(),
            body: String::new(),
            sub_text: None,
        };
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains(r#""type":"cover""#));
        assert!(!json.contains("card_type"));
        assert!(!json.contains("sub_text"));
    }

    #[test]
    fn deck_brand_defaults_only_when_missing() {
        let deck: CardDeck =
            serde_json::from_str(r#"{"cards": [{"page": 1, "type": "body", "headline": "h"}]}"#)
                .unwrap();
        assert_eq!(deck.with_default_brand("GENITEACHER").brand, "GENITEACHER");

        let deck = CardDeck {
            brand: "PK_ACADEMY".into(),
            cards: vec![],
        };
        assert_eq!(deck.with_default_brand("GENITEACHER").brand, "PK_ACADEMY");
    }
}
