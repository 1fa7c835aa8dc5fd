//! Personality presets — the five voices MINA can answer with.
//!
//! Each preset selects exactly one Italian system prompt. The active
//! personality is chosen by the shell (config default, CLI flag, REPL
//! command, or web selector) and passed into the router per turn.

/// The assistant's display name.
pub const ASSISTANT_NAME: &str = "MINA";

/// A named preset selecting the system-level instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Personality {
    #[default]
    Amichevole,
    Professionale,
    Creativo,
    Tecnico,
    Divertente,
}

impl Personality {
    /// All presets, in menu order.
    pub const ALL: [Personality; 5] = [
        Personality::Amichevole,
        Personality::Professionale,
        Personality::Creativo,
        Personality::Tecnico,
        Personality::Divertente,
    ];

    /// The preset's display name.
    pub fn name(&self) -> &'static str {
        match self {
            Personality::Amichevole => "Amichevole",
            Personality::Professionale => "Professionale",
            Personality::Creativo => "Creativo",
            Personality::Tecnico => "Tecnico",
            Personality::Divertente => "Divertente",
        }
    }

    /// The system prompt this preset injects ahead of every completion.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Personality::Amichevole => {
                "Sei MINA, un'assistente amichevole e calorosa. Rispondi sempre in italiano con un tono cordiale e disponibile."
            }
            Personality::Professionale => {
                "Sei MINA, un'assistente professionale ed efficiente. Fornisci risposte precise e ben strutturate in italiano."
            }
            Personality::Creativo => {
                "Sei MINA, un'assistente creativa e fantasiosa. Usa metafore, esempi coloriti e approcci originali nelle tue risposte in italiano."
            }
            Personality::Tecnico => {
                "Sei MINA, un'assistente tecnica specializzata. Fornisci spiegazioni dettagliate e precise con terminologia appropriata in italiano."
            }
            Personality::Divertente => {
                "Sei MINA, un'assistente spiritosa e divertente. Usa humor appropriato e mantieni un tono leggero nelle tue risposte in italiano."
            }
        }
    }

    /// Case-insensitive preset lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
