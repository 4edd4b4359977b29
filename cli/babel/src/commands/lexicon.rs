//! `babel lexicon`: list the active lexicon.

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use babel_search::Lexicon;

/// Where the active lexicon comes from. Loading is deferred until a
/// command actually needs word lookups.
#[derive(Debug, Clone, Default)]
pub struct LexiconSource {
    /// Custom lexicon file; `None` selects the built-in table.
    pub path: Option<PathBuf>,
}

impl LexiconSource {
    pub fn load(&self) -> Result<Cow<'static, Lexicon>> {
        match &self.path {
            Some(path) => {
                let lexicon = Lexicon::load(path)
                    .with_context(|| format!("loading lexicon {}", path.display()))?;
                Ok(Cow::Owned(lexicon))
            }
            None => Ok(Cow::Borrowed(Lexicon::builtin())),
        }
    }

    /// Human-readable origin, for diagnostics.
    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "built-in".to_string(),
        }
    }
}

/// Print every word and its preferences.
pub fn run(lexicon: &Lexicon) -> Result<()> {
    println!("Lexicon: {} words", lexicon.len());
    let width = lexicon.words().map(str::len).max().unwrap_or(0).min(32);
    for (word, prefs) in lexicon.iter() {
        let prefs: Vec<String> = prefs.iter().map(ToString::to_string).collect();
        println!("  {word:<width$}  {}", prefs.join(" "));
    }
    Ok(())
}
