//! # Script Module
//!
//! The narrative copy of the landing page.
//!
//! The script is read-only content: the presentation layer reads it verbatim and
//! nothing in the engine computes over it. A built-in copy is created once per
//! process ([`NarrativeScript::builtin`]); an alternative copy can be loaded from
//! JSON at startup ([`NarrativeScript::from_json`]).

use crate::errors::ScriptError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vision {
    pub title: String,
    pub paragraph: String,
}

/// The sticky chapter whose four beats crossfade with scroll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    pub heading: String,
    pub beat1: String,
    pub beat2: String,
    pub beat3: String,
    pub beat4: String,
}

impl Precision {
    /// The beats in scroll order.
    pub fn beats(&self) -> [&str; 4] {
        [&self.beat1, &self.beat2, &self.beat3, &self.beat4]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoWorlds {
    pub title: String,
    pub agri: String,
    pub aqua: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub call: String,
    pub email: String,
}

impl Footer {
    /// The `mailto:` link behind the footer address.
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

/// Fixed interface labels that are not part of the story copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub scroll_hint: String,
    pub agri: String,
    pub aqua: String,
    pub partner_button: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            scroll_hint: "Scroll".into(),
            agri: "Agri".into(),
            aqua: "Aqua".into(),
            partner_button: "Partner with Us".into(),
        }
    }
}

/// All copy shown on the page, grouped by section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeScript {
    pub intro_sequence: Vec<String>,
    pub hero: Hero,
    pub chapter1: Vision,
    pub chapter2: Precision,
    pub chapter3: TwoWorlds,
    pub footer: Footer,
    #[serde(default)]
    pub labels: Labels,
}

static BUILTIN: Lazy<NarrativeScript> = Lazy::new(|| NarrativeScript {
    intro_sequence: vec![
        "Life began in the ocean.".into(),
        "For billions of years, it has been the engine of our planet.".into(),
        "Today, we are giving that engine a new pulse.".into(),
    ],
    hero: Hero {
        title: "BLUE IMPULSE".into(),
        subtitle: "DeepTech for a Resilient Earth.".into(),
    },
    chapter1: Vision {
        title: "Imagine a Future...".into(),
        paragraph: "Where industry doesn't drain nature, but fuels it. We envision a world where \
                    the microscopic power of algae solves the macroscopic challenges of our \
                    time\u{2014}feeding our population and healing our climate simultaneously."
            .into(),
    },
    chapter2: Precision {
        heading: "Precision, Not Just Farming.".into(),
        beat1: "It starts with a single cell.".into(),
        beat2: "Optimized by AI. Protected by Science.".into(),
        beat3: "Grown in controlled environments to ensure purity.".into(),
        beat4: "Delivered at industrial scale.".into(),
    },
    chapter3: TwoWorlds {
        title: "One Impulse. Two Worlds.".into(),
        agri: "Revitalizing our soils and shielding crops from climate chaos.".into(),
        aqua: "Nourishing aquaculture without depleting our wild oceans.".into(),
    },
    footer: Footer {
        call: "Join the Cycle.".into(),
        email: "contact@blueimpulse.com".into(),
    },
    labels: Labels::default(),
});

impl NarrativeScript {
    /// The copy shipped with the page. Built on first access, shared afterwards.
    pub fn builtin() -> &'static NarrativeScript {
        &BUILTIN
    }

    /// Parses and validates a script document.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: NarrativeScript = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Loads a script document from disk.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        let script = Self::from_json(&json)?;
        debug!(intro_lines = script.intro_sequence.len(), "script loaded");
        Ok(script)
    }

    pub fn to_json_pretty(&self) -> Result<String, ScriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        if self.intro_sequence.is_empty() {
            return Err(ScriptError::EmptyIntro);
        }
        let email = &self.footer.email;
        let valid = match email.split_once('@') {
            Some((user, domain)) => {
                !user.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ScriptError::InvalidEmail(email.clone()));
        }
        Ok(())
    }
}
