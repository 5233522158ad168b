use thiserror::Error;

use crate::share::slugify;

/// One of the five crew members a quiz can end on.
///
/// Variants are declared in tie-break order; see [`CrewMember::ENUMERATION_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CrewMember {
    Johnny,
    ElGuey,
    ElCapo,
    Felip,
    Jizum,
}

impl CrewMember {
    /// When several members share the highest tally, the first one in this
    /// list wins.
    pub const ENUMERATION_ORDER: [CrewMember; 5] = [
        CrewMember::Johnny,
        CrewMember::ElGuey,
        CrewMember::ElCapo,
        CrewMember::Felip,
        CrewMember::Jizum,
    ];

    pub fn short_key(&self) -> &'static str {
        match self {
            CrewMember::Johnny => "johnny",
            CrewMember::ElGuey => "elguey",
            CrewMember::ElCapo => "elcapo",
            CrewMember::Felip => "felip",
            CrewMember::Jizum => "jizum",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn character(&self) -> &'static Character {
        &CREW[self.index()]
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Character {
    /// Registry key, identical to the slug derived from `name`.
    pub key: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub bio: &'static str,
    pub merch_name: &'static str,
    pub color_theme: &'static str,
    pub emoji: &'static str,
}

// Indexed by `CrewMember as usize`
pub static CREW: [Character; 5] = [
    Character {
        key: "johnny-mecuerdo",
        name: "Johnny Mecuerdo",
        title: "The Charismatic Captain",
        bio: "You're the life of the party and the soul of chaos. Natural born leader with a taste for adventure and a magnetic personality that draws people in.",
        merch_name: "Captain's Rum Flask",
        color_theme: "from-orange-600 to-red-700",
        emoji: "🏴‍☠️",
    },
    Character {
        key: "el-pinche-guey",
        name: "El Pinche Güey",
        title: "The Fiery First Mate",
        bio: "Pure energy and attitude. You charge first, ask questions later, and bring the heat to every situation with unstoppable passion.",
        merch_name: "Güey's Shot Glass Set",
        color_theme: "from-red-600 to-orange-700",
        emoji: "🔥",
    },
    Character {
        key: "el-capo",
        name: "El Capo",
        title: "The Strategic Mastermind",
        bio: "Cool, calculated, and always three steps ahead. You're the brains behind every successful heist and the voice of reason in chaos.",
        merch_name: "Capo's Strategy Compass",
        color_theme: "from-slate-700 to-gray-800",
        emoji: "🧭",
    },
    Character {
        key: "felip-mota",
        name: "Felip Mota",
        title: "The Mystical Navigator",
        bio: "Guided by intuition and the stars. You see what others miss and trust the universe's plan to lead you to hidden treasures.",
        merch_name: "Mota's Mystical Map",
        color_theme: "from-purple-600 to-indigo-700",
        emoji: "⭐",
    },
    Character {
        key: "scrotum-jizum",
        name: "Scrotum Jizum",
        title: "The Resourceful Repair Master",
        bio: "Master of making things work with duct tape and determination. Chaos is just another puzzle to solve with creative ingenuity.",
        merch_name: "Jizum's Repair Kit",
        color_theme: "from-amber-600 to-yellow-700",
        emoji: "🔧",
    },
];

/// Looks a character up by its registry key. Case-sensitive.
pub fn find_by_key(key: &str) -> Option<&'static Character> {
    CREW.iter().find(|c| c.key == key)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("character {name:?} is keyed {key:?} but its name slugifies to {derived:?}")]
    SlugMismatch {
        name: &'static str,
        key: &'static str,
        derived: String,
    },
}

/// Checks that every registry key is the slug of the character's name, so
/// links produced after scoring resolve back to the same character.
pub fn verify_registry() -> Result<(), RegistryError> {
    for character in CREW.iter() {
        let derived = slugify(character.name);
        if derived != character.key {
            return Err(RegistryError::SlugMismatch {
                name: character.name,
                key: character.key,
                derived,
            });
        }
    }
    Ok(())
}
