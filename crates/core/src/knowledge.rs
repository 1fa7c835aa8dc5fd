//! The static knowledge base checked before any remote call.
//!
//! Each entry pairs a lowercase trigger with a canned response. Lookup is a
//! case-insensitive substring scan of the incoming message; a hit
//! short-circuits the whole generation path. Entries are loaded once at
//! process start (built-ins plus config additions) and never change after.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Built-in entries. Config additions are merged on top of these.
const BUILTIN_ENTRIES: [(&str, &str); 6] = [
    (
        "chi sei",
        "Sono MINA, il tuo assistente personale AI! Sono stata creata per aiutarti con qualsiasi domanda tu abbia. Il mio nome significa 'intelligenza' e sono qui per essere la tua compagna digitale.",
    ),
    (
        "cosa sai fare",
        "Sono MINA e posso chattare, rispondere a domande, aiutarti con problemi, scrivere testi, spiegare concetti, fare calcoli e molto altro! Sono la tua assistente personale sempre disponibile.",
    ),
    (
        "mina",
        "MINA è il mio nome! Significa 'intelligenza' e rappresenta la mia missione: essere la tua assistente AI più utile e affidabile.",
    ),
    (
        "come funzioni",
        "Sono MINA e ora funziono nel cloud usando Groq API con il modello Llama3. Sono sempre disponibile online!",
    ),
    (
        "il mio progetto",
        "Puoi aggiungere informazioni sui tuoi progetti qui!",
    ),
    (
        "contatti",
        "Aggiungi qui i tuoi contatti o informazioni personali",
    ),
];

/// A single trigger → response pair. Triggers are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub trigger: String,
    pub response: String,
}

/// The read-only lookup table consulted before the completion client.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// An empty knowledge base. Every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// The six built-in entries.
    pub fn with_defaults() -> Self {
        let mut kb = Self::new();
        for (trigger, response) in BUILTIN_ENTRIES {
            kb.insert(trigger, response);
        }
        kb
    }

    /// Add an entry. The trigger is lowercased; inserting an existing
    /// trigger replaces its response, which is how config entries override
    /// built-ins. Empty triggers are dropped.
    pub fn insert(&mut self, trigger: impl Into<String>, response: impl Into<String>) {
        let trigger = trigger.into().trim().to_lowercase();
        if trigger.is_empty() {
            warn!("ignoring knowledge entry with empty trigger");
            return;
        }
        let response = response.into();
        match self.entries.iter_mut().find(|e| e.trigger == trigger) {
            Some(existing) => existing.response = response,
            None => self.entries.push(KnowledgeEntry { trigger, response }),
        }
    }

    /// Merge `(trigger, response)` pairs on top of the current entries.
    pub fn extend<T, R>(&mut self, pairs: impl IntoIterator<Item = (T, R)>)
    where
        T: Into<String>,
        R: Into<String>,
    {
        for (trigger, response) in pairs {
            self.insert(trigger, response);
        }
    }

    /// Find the entry whose trigger occurs in `message`, case-insensitively.
    ///
    /// When several triggers match, the longest one wins; equal lengths
    /// tie-break to the lexicographically smallest trigger. The result is
    /// therefore deterministic regardless of insertion order.
    pub fn lookup(&self, message: &str) -> Option<&KnowledgeEntry> {
        let message = message.to_lowercase();
        self.entries
            .iter()
            .filter(|e| message.contains(&e.trigger))
            .max_by(|a, b| {
                a.trigger
                    .len()
                    .cmp(&b.trigger.len())
                    .then_with(|| b.trigger.cmp(&a.trigger))
            })
    }

    /// Triggers in insertion order, for diagnostics and help screens.
    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.trigger.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
