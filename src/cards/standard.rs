//! Built-in 78-card deck.
//!
//! Lets the engine run without an external data file. The 22 major arcana
//! carry their own meanings; the 56 minor arcana are generated from the
//! themes of their suits.

use super::deck::CardDeck;
use super::record::{Arcana, CardRecord};

/// (name, title, upright, reversed, keywords)
const MAJOR_ARCANA: [(&str, &str, &str, &str, [&str; 3]); 22] = [
    ("The_Fool", "The Fool",
     "New beginnings, a clean slate and readiness for adventure.",
     "Recklessness, carelessness and a lack of direction.",
     ["beginnings", "innocence", "spontaneity"]),
    ("The_Magician", "The Magician",
     "The ability to turn desire into reality; willpower and skill.",
     "Manipulation, untapped potential and a weak will.",
     ["will", "mastery", "focus"]),
    ("The_High_Priestess", "The High Priestess",
     "Inner wisdom, intuition and hidden knowledge.",
     "Ignored intuition, superficiality and secrets.",
     ["intuition", "mystery", "the unconscious"]),
    ("The_Empress", "The Empress",
     "Nurturing energy, creativity and natural abundance.",
     "Dependence, creative block and low self-worth.",
     ["fertility", "abundance", "care"]),
    ("The_Emperor", "The Emperor",
     "Leadership, stability and a protective structure.",
     "Tyranny, rigidity and loss of control.",
     ["authority", "structure", "control"]),
    ("The_Hierophant", "The Hierophant",
     "Spiritual guidance, tradition and learning.",
     "Dogmatism, narrowness and rebellion against tradition.",
     ["tradition", "belief", "mentorship"]),
    ("The_Lovers", "The Lovers",
     "Love, partnership and an important choice.",
     "Separation, a wrong choice and disharmony.",
     ["love", "choice", "harmony"]),
    ("The_Chariot", "The Chariot",
     "Triumph of will, control of the situation, moving forward.",
     "Lack of control, defeat and stagnation.",
     ["victory", "control", "determination"]),
    ("Strength", "Strength",
     "Inner strength, courage and patience.",
     "Self-doubt, weakness and lack of self-control.",
     ["courage", "patience", "compassion"]),
    ("The_Hermit", "The Hermit",
     "Introspection, solitude and the search for truth.",
     "Isolation, loneliness and refusing help.",
     ["solitude", "reflection", "guidance"]),
    ("Wheel_of_Fortune", "Wheel of Fortune",
     "Change, cycles and a turn of fate.",
     "Bad luck, resistance to change and broken cycles.",
     ["fate", "cycles", "turning point"]),
    ("Justice", "Justice",
     "Fairness, truth and cause and effect.",
     "Injustice, dishonesty and avoided accountability.",
     ["fairness", "truth", "law"]),
    ("The_Hanged_Man", "The Hanged Man",
     "Pause, surrender and a new perspective.",
     "Delay, resistance and pointless sacrifice.",
     ["surrender", "perspective", "pause"]),
    ("Death", "Death",
     "Endings, transformation and transition.",
     "Resistance to change and an inability to move on.",
     ["ending", "transformation", "release"]),
    ("Temperance", "Temperance",
     "Balance, moderation and patience.",
     "Imbalance, excess and lack of long-term vision.",
     ["balance", "moderation", "purpose"]),
    ("The_Devil", "The Devil",
     "Attachment, temptation and self-imposed limits.",
     "Release from bonds and reclaiming power.",
     ["bondage", "temptation", "shadow"]),
    ("The_Tower", "The Tower",
     "Sudden upheaval, revelation and collapse of the false.",
     "Avoided disaster and fear of change.",
     ["upheaval", "revelation", "awakening"]),
    ("The_Star", "The Star",
     "Hope, renewal and serenity.",
     "Despair, lack of faith and disconnection.",
     ["hope", "renewal", "inspiration"]),
    ("The_Moon", "The Moon",
     "Illusion, fear and the subconscious.",
     "Release of fear and clarity after confusion.",
     ["illusion", "dreams", "intuition"]),
    ("The_Sun", "The Sun",
     "Joy, success and vitality.",
     "Temporary gloom and dimmed enthusiasm.",
     ["joy", "success", "vitality"]),
    ("Judgement", "Judgement",
     "Reflection, reckoning and inner calling.",
     "Self-doubt and refusing to learn from the past.",
     ["rebirth", "calling", "absolution"]),
    ("The_World", "The World",
     "Completion, integration and accomplishment.",
     "Unfinished business and lack of closure.",
     ["completion", "wholeness", "travel"]),
];

/// (suit, theme, keywords)
const SUITS: [(&str, &str, [&str; 3]); 4] = [
    ("Wands", "creative drive, passion and action", ["energy", "ambition", "growth"]),
    ("Cups", "emotions, relationships and intuition", ["feelings", "love", "connection"]),
    ("Swords", "thought, conflict and truth", ["intellect", "conflict", "clarity"]),
    ("Pentacles", "work, money and the material world", ["resources", "security", "craft"]),
];

const PIPS: [&str; 10] = ["Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten"];
const COURTS: [&str; 4] = ["Page", "Knight", "Queen", "King"];

impl CardDeck {
    /// Build the standard 78-card deck with conventional image names.
    pub fn standard() -> CardDeck {
        let mut records = Vec::with_capacity(78);

        for (name, title, upright, reversed, keywords) in MAJOR_ARCANA {
            records.push(
                CardRecord::new(name, Arcana::Major)
                    .with_title(title)
                    .with_meanings(upright, reversed)
                    .with_keywords(keywords),
            );
        }

        for (suit, theme, keywords) in SUITS {
            for pip in PIPS {
                records.push(
                    CardRecord::new(format!("{pip}_of_{suit}"), Arcana::Minor)
                        .with_meanings(
                            format!("{pip} of {suit}: {theme} flowing freely."),
                            format!("{pip} of {suit}: blocked {theme}."),
                        )
                        .with_keywords(keywords),
                );
            }
            for court in COURTS {
                records.push(
                    CardRecord::new(format!("{court}_of_{suit}"), Arcana::Minor)
                        .with_meanings(
                            format!("{court} of {suit}: a person embodying {theme}."),
                            format!("{court} of {suit}: the shadow side of {theme}."),
                        )
                        .with_keywords(keywords),
                );
            }
        }

        let mut deck = CardDeck::from_records(records).expect("built-in deck is well formed");
        deck.assign_conventional_images();
        deck
    }
}
