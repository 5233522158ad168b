pub mod crew;
pub mod flow;
pub mod scoring;

use std::collections::BTreeMap;

use crew::CrewMember;

#[derive(Debug)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: [QuizOption; 5],
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn option_by_label(&self, text: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.button_text() == text || o.label == text)
    }
}

#[derive(Debug)]
pub struct QuizOption {
    pub value: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    /// Crew member this answer scores for.
    pub member: CrewMember,
}

impl QuizOption {
    pub fn button_text(&self) -> String {
        format!("{} {}", self.emoji, self.label)
    }
}

const fn option(
    value: &'static str,
    label: &'static str,
    emoji: &'static str,
    member: CrewMember,
) -> QuizOption {
    QuizOption {
        value,
        label,
        emoji,
        member,
    }
}

pub static QUESTIONS: [Question; 5] = [
    Question {
        id: "q1",
        prompt: "You're handed the keys to the ship. What's your first move?",
        options: [
            option("party", "Throw a deck party", "🎉", CrewMember::Johnny),
            option("yell", "Yell at everyone", "📢", CrewMember::ElGuey),
            option("chart", "Chart a course quietly", "🗺️", CrewMember::ElCapo),
            option("stars", "Ask the stars", "⭐", CrewMember::Felip),
            option("fix", "Fix the broken mast", "🔧", CrewMember::Jizum),
        ],
    },
    Question {
        id: "q2",
        prompt: "What's your drink of choice at sea?",
        options: [
            option("rum", "Spiced Rum", "🥃", CrewMember::Johnny),
            option("tequila", "Tequila", "🍺", CrewMember::ElGuey),
            option("coffee", "Dark Coffee", "☕", CrewMember::ElCapo),
            option("herbal", "Herbal Brew", "🍵", CrewMember::Felip),
            option("beer", "Cold Beer", "🍻", CrewMember::Jizum),
        ],
    },
    Question {
        id: "q3",
        prompt: "Your crew is in a brawl. What's your role?",
        options: [
            option("charge", "Shout and charge", "⚔️", CrewMember::ElGuey),
            option("whisper", "Whisper strategic moves", "🤫", CrewMember::ElCapo),
            option("sing", "Sing and confuse everyone", "🎵", CrewMember::Johnny),
            option("meditate", "Meditate until needed", "🧘", CrewMember::Felip),
            option("smash", "Smash and patch up later", "💥", CrewMember::Jizum),
        ],
    },
    Question {
        id: "q4",
        prompt: "What's your biggest strength?",
        options: [
            option("charisma", "Charisma", "✨", CrewMember::Johnny),
            option("energy", "Raw Energy", "⚡", CrewMember::ElGuey),
            option("logic", "Cold Logic", "🧠", CrewMember::ElCapo),
            option("intuition", "Sharp Intuition", "🔮", CrewMember::Felip),
            option("improvisation", "Pure Improvisation", "🎭", CrewMember::Jizum),
        ],
    },
    Question {
        id: "q5",
        prompt: "Your ideal pirate hideout is...",
        options: [
            option("bonfire", "Beach Bonfire Party", "🔥", CrewMember::Johnny),
            option("bar", "Busted Tavern Bar", "🍻", CrewMember::ElGuey),
            option("fortress", "Stone Fortress Lair", "🏰", CrewMember::ElCapo),
            option("cave", "Smoky Mystical Cave", "🕳️", CrewMember::Felip),
            option("shack", "Floating Repair Shack", "🏚️", CrewMember::Jizum),
        ],
    },
];

pub const QUESTION_COUNT: usize = QUESTIONS.len();

/// Answers of one quiz attempt, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerSet {
    answers: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `question_id`, replacing an earlier answer.
    pub fn record(&mut self, question_id: &str, value: &str) {
        self.answers
            .insert(question_id.to_string(), value.to_string());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            answers: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
