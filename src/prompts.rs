//! Prompt text for the three pipeline stages.

use crate::content::{BlogPost, CardDeck};
use crate::persona::Persona;

/// Blog post prompt. Sent in JSON mode with the persona's system instruction.
pub fn blog_prompt(persona: &Persona) -> String {
    format!(
        "Write a blog post about: \"{topic}\".\n\
         \n\
         [Requirements]\n\
         1. Structure: title, hook, body (3-5 sections), hashtags\n\
         2. Tone: friendly and trustworthy\n\
         \n\
         [Output format]\n\
         Follow this JSON schema strictly. Return plain JSON only, no markdown code block.\n\
         \n\
         {{\n\
           \"title\": \"blog title\",\n\
           \"hook_text\": \"1-2 sentences that grab the reader\",\n\
           \"sections\": [\n\
             {{\"sub_title\": \"subheading 1\", \"content\": \"body text (use \\n for line breaks)\"}},\n\
             {{\"sub_title\": \"subheading 2\", \"content\": \"body text\"}}\n\
           ],\n\
           \"hashtags\": [\"tag1\", \"tag2\", \"tag3\"]\n\
         }}",
        topic = persona.topic
    )
}

/// Card-news prompt derived from a finished blog post.
pub fn card_prompt(persona: &Persona, post: &BlogPost) -> String {
    let sections = serde_json::to_string(&post.sections).unwrap_or_default();
    format!(
        "[Blog title]: {title}\n\
         [Blog content]: {sections}\n\
         \n\
         You are an Instagram content planner.\n\
         Based on the blog post above, write a plan for a 6-card news carousel.\n\
         Important: do not use emoji, the card renderer cannot draw them.\n\
         \n\
         [Audience]\n\
         {audience}\n\
         \n\
         [Guide]\n\
         1. Page 1 (cover): at most 15 characters including spaces, with a line break (\\n). \
         A question or provocative line works best.\n\
         2. Pages 2-5 (body): problem -> solution -> evidence -> expected effect.\n\
         3. Page 6 (ending): ask readers to save the post and visit the profile link.\n\
         \n\
         [Output format (JSON)]\n\
         {{\n\
           \"brand\": \"{brand}\",\n\
           \"cards\": [\n\
             {{\"page\": 1, \"type\": \"cover\", \"tag\": \"\", \"headline\": \"...\", \"body\": \"\", \"sub_text\": \"...\"}},\n\
             {{\"page\": 2, \"type\": \"body\", \"tag\": \"Fact check\", \"headline\": \"...\", \"body\": \"...\"}}\n\
           ]\n\
         }}\n\
         (6 cards in total)",
        title = post.title,
        audience = persona.label,
        brand = persona.brand,
    )
}

/// Caption prompt derived from the blog post and the card deck. Free text.
pub fn caption_prompt(persona: &Persona, post: &BlogPost, deck: &CardDeck) -> String {
    let post_json = serde_json::to_string(post).unwrap_or_default();
    let deck_json = serde_json::to_string(deck).unwrap_or_default();
    let pain_points = persona.pain_points.join("; ");
    format!(
        "[Blog]: {post_json}\n\
         [Card news plan]: {deck_json}\n\
         \n\
         You are a social media marketing expert.\n\
         Using the blog post and the card news above, write the caption text for the Instagram feed post.\n\
         \n\
         [Audience]\n\
         {audience}\n\
         \n\
         [Guide]\n\
         1. First line (hook): more specific and curious than the cover card.\n\
         2. Body: a bullet list with emoji (✅, 🔥, 📚, 💡) instead of paragraphs.\n\
         3. Cover: pain point ({pain_points}), solution, benefit.\n\
         4. Closing call to action: \"{cta}\"\n\
         5. Hashtags: at least 15 search keywords for this audience.\n\
         \n\
         Answer in plain text, not JSON.",
        audience = persona.label,
        cta = persona.call_to_action,
    )
}
