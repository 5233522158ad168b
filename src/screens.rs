//! Chat renditions of the quiz screens: message text plus the reply keyboard
//! the user answers with.

use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::utils::html::escape;

use crate::quiz::{crew::Character, QUESTIONS, QUESTION_COUNT};
use crate::share::meta::{InMemorySink, MetadataSink};
use crate::share::ShareArtifacts;

pub const START_QUIZ: &str = "🏴‍☠️ Start Quiz";
pub const BACK: &str = "⬅️ Back";
pub const TAKE_QUIZ_AGAIN: &str = "🔄 Take Quiz Again";
pub const FIND_YOUR_CREW: &str = "🧭 Find Your Crew";
pub const COPY_LINK: &str = "🔗 Copy Shareable Link";
pub const SHARE_RESULT: &str = "⚓ Share Yer Result";
pub const DIALOG_COPY_MESSAGE: &str = "📋 Copy Message";
pub const DIALOG_COPY_LINK: &str = "🏴‍☠️ Copy Link";
pub const DIALOG_CLOSE: &str = "✖️ Close";

pub struct Screen {
    pub text: String,
    pub keyboard: KeyboardMarkup,
}

fn keyboard(rows: Vec<Vec<String>>) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

pub fn welcome() -> Screen {
    Screen {
        text: "<b>Who's In Your CREW?</b>\n\nJoin the crew. Discover your alter ego.".to_string(),
        keyboard: keyboard(vec![vec![START_QUIZ.to_string()]]),
    }
}

pub fn question(index: usize, highlighted: Option<&str>) -> Screen {
    let question = &QUESTIONS[index];
    let progress = format!(
        "{}{}",
        "▰".repeat(index + 1),
        "▱".repeat(QUESTION_COUNT - index - 1)
    );
    let mut text = format!(
        "{} {} / {}\n\n<b>{}</b>",
        progress,
        index + 1,
        QUESTION_COUNT,
        escape(question.prompt)
    );
    if let Some(option) = highlighted.and_then(|value| question.option(value)) {
        text.push_str(&format!("\n\nYer last pick: {}", escape(&option.button_text())));
    }

    let mut rows: Vec<Vec<String>> = question
        .options
        .iter()
        .map(|o| vec![o.button_text()])
        .collect();
    if index > 0 {
        rows.push(vec![BACK.to_string()]);
    }
    Screen {
        text,
        keyboard: keyboard(rows),
    }
}

/// The crew card. `meta` holds the social tags already written for this
/// result; the card headline is taken from there.
pub fn result_card(
    character: &Character,
    artifacts: &ShareArtifacts,
    meta: &InMemorySink,
    from_direct_link: bool,
) -> Screen {
    let mut text = String::new();
    if from_direct_link {
        text.push_str(
            "🏴‍☠️ <b>Ahoy, Matey!</b>\nSomeone shared their crew result with you!\n\
             <b>Find out who *you* are in the world of rum, riddles, and riot.</b>\n\n",
        );
    }
    text.push_str(&format!(
        "{}\n<i>{}</i>\n<b>{}!</b>\n{}\n\n{}\n\n🎁 {}\n\n<i>{}</i>\n{}",
        character.emoji,
        if from_direct_link { "Meet..." } else { "You are..." },
        escape(character.name),
        escape(character.title),
        escape(character.bio),
        escape(character.merch_name),
        escape(meta.get("og:title").unwrap_or(character.name)),
        escape(&artifacts.share_url),
    ));

    let rows = if from_direct_link {
        vec![vec![FIND_YOUR_CREW.to_string()], vec![COPY_LINK.to_string()]]
    } else {
        vec![
            vec![TAKE_QUIZ_AGAIN.to_string()],
            vec![COPY_LINK.to_string(), SHARE_RESULT.to_string()],
        ]
    };
    Screen {
        text,
        keyboard: keyboard(rows),
    }
}

pub fn not_found(slug: &str, meta: &InMemorySink) -> Screen {
    let text = format!(
        "🏴‍☠️\n<b>{}</b>\n\nThis scallywag seems to have walked the plank...\n\
         The crew member you're looking for doesn't exist in our records. \
         Perhaps they were lost at sea, or maybe this link got corrupted by sea salt!\n\n\
         <i>Take the Quiz to Find Your Crew</i>\n\nInvalid crew member: \"{}\"",
        escape(meta.title().unwrap_or("Crew Member Not Found!")),
        escape(slug)
    );
    Screen {
        text,
        keyboard: keyboard(vec![vec![FIND_YOUR_CREW.to_string()]]),
    }
}

pub fn share_dialog(character: &Character, artifacts: &ShareArtifacts) -> Screen {
    let blurb = artifacts
        .share_message
        .replace(&artifacts.share_url, "")
        .trim()
        .to_string();
    let text = format!(
        "🏴‍☠️ <b>Share Yer Crew Result!</b>\nLet yer mates know which scallywag ye be!\n\n\
         {} <b>{}</b>\n\n\"{}\"\n{}",
        character.emoji,
        escape(character.name),
        escape(&blurb),
        escape(&artifacts.share_url)
    );
    Screen {
        text,
        keyboard: keyboard(vec![
            vec![DIALOG_COPY_MESSAGE.to_string(), DIALOG_COPY_LINK.to_string()],
            vec![DIALOG_CLOSE.to_string()],
        ]),
    }
}
