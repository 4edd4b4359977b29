//! Word -> parameter preference table.
//!
//! A lexicon is read-only once loaded. The built-in table is embedded in the
//! binary and parsed on first use; custom tables use the same TOML shape:
//!
//! ```toml
//! [words.compact]
//! num_regs = 4
//! addressing_modes = ["reg-only"]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use babel_core::{
    AddressingModes, DecoderType, ExecUnits, MemoryInterface, NumRegs, ParamField, ParameterSet,
    PipelineDepth,
};
use serde::Deserialize;

use crate::error::{LexiconError, Result};

const BUILTIN: &str = include_str!("lexicon.toml");

/// A preferred value for one parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    NumRegs(NumRegs),
    DecoderType(DecoderType),
    PipelineDepth(PipelineDepth),
    AddressingModes(AddressingModes),
    ExecUnits(ExecUnits),
    MemoryInterface(MemoryInterface),
}

impl Preference {
    /// The field this preference constrains.
    pub fn field(&self) -> ParamField {
        match self {
            Preference::NumRegs(_) => ParamField::NumRegs,
            Preference::DecoderType(_) => ParamField::DecoderType,
            Preference::PipelineDepth(_) => ParamField::PipelineDepth,
            Preference::AddressingModes(_) => ParamField::AddressingModes,
            Preference::ExecUnits(_) => ParamField::ExecUnits,
            Preference::MemoryInterface(_) => ParamField::MemoryInterface,
        }
    }

    /// Whether `params` holds exactly the preferred value.
    pub fn matches(&self, params: &ParameterSet) -> bool {
        match *self {
            Preference::NumRegs(v) => params.num_regs() == v,
            Preference::DecoderType(v) => params.decoder_type() == v,
            Preference::PipelineDepth(v) => params.pipeline_depth() == v,
            Preference::AddressingModes(v) => params.addressing_modes() == v,
            Preference::ExecUnits(v) => params.exec_units() == v,
            Preference::MemoryInterface(v) => params.memory_interface() == v,
        }
    }

    /// The value `params` holds for every field, in field order.
    pub fn all_of(params: &ParameterSet) -> [Preference; 6] {
        [
            Preference::NumRegs(params.num_regs()),
            Preference::DecoderType(params.decoder_type()),
            Preference::PipelineDepth(params.pipeline_depth()),
            Preference::AddressingModes(params.addressing_modes()),
            Preference::ExecUnits(params.exec_units()),
            Preference::MemoryInterface(params.memory_interface()),
        ]
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.field())?;
        match self {
            Preference::NumRegs(v) => write!(f, "{}", v.count()),
            Preference::DecoderType(v) => f.write_str(v.as_str()),
            Preference::PipelineDepth(v) => write!(f, "{}", v.stages()),
            Preference::AddressingModes(v) => write!(f, "{v}"),
            Preference::ExecUnits(v) => f.write_str(v.as_str()),
            Preference::MemoryInterface(v) => f.write_str(v.as_str()),
        }
    }
}

/// On-disk form of one word's preferences.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PreferenceTable {
    num_regs: Option<NumRegs>,
    decoder_type: Option<DecoderType>,
    pipeline_depth: Option<PipelineDepth>,
    addressing_modes: Option<AddressingModes>,
    exec_units: Option<ExecUnits>,
    memory_interface: Option<MemoryInterface>,
}

impl PreferenceTable {
    fn into_preferences(self) -> Vec<Preference> {
        let mut prefs = Vec::new();
        prefs.extend(self.num_regs.map(Preference::NumRegs));
        prefs.extend(self.decoder_type.map(Preference::DecoderType));
        prefs.extend(self.pipeline_depth.map(Preference::PipelineDepth));
        prefs.extend(self.addressing_modes.map(Preference::AddressingModes));
        prefs.extend(self.exec_units.map(Preference::ExecUnits));
        prefs.extend(self.memory_interface.map(Preference::MemoryInterface));
        prefs
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    #[serde(default)]
    words: BTreeMap<String, PreferenceTable>,
}

/// Read-only mapping from descriptive words to partial preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lexicon {
    entries: BTreeMap<String, Vec<Preference>>,
}

impl Lexicon {
    /// The embedded default lexicon, parsed once per process.
    pub fn builtin() -> &'static Lexicon {
        static BUILTIN_LEXICON: OnceLock<Lexicon> = OnceLock::new();
        BUILTIN_LEXICON
            .get_or_init(|| Lexicon::from_toml_str(BUILTIN).expect("built-in lexicon is valid"))
    }

    /// Parse a lexicon from TOML text.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: LexiconFile = toml::from_str(toml_str)?;
        let mut entries = BTreeMap::new();
        for (word, table) in file.words {
            let prefs = table.into_preferences();
            if prefs.is_empty() {
                return Err(LexiconError::EmptyEntry { word });
            }
            entries.insert(word, prefs);
        }
        Ok(Self { entries })
    }

    /// Load a lexicon from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LexiconError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Preferences for `word`, if the word is known. Matching is exact.
    pub fn lookup(&self, word: &str) -> Option<&[Preference]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    /// Known words in sorted order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every entry in sorted word order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Preference])> {
        self.entries
            .iter()
            .map(|(word, prefs)| (word.as_str(), prefs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_core::AddressingMode;

    #[test]
    fn builtin_has_default_words() {
        let lex = Lexicon::builtin();
        let words: Vec<&str> = lex.words().collect();
        for expected in [
            "cisc",
            "risc_like",
            "compact",
            "powerful",
            "fast_memory",
            "simple_memory",
            "deep_pipeline",
            "shallow_pipeline",
            "agu",
            "minimal_exec",
        ] {
            assert!(words.contains(&expected), "missing {expected}");
        }
        assert_eq!(lex.len(), 10);
    }

    #[test]
    fn builtin_is_parsed_once() {
        assert!(std::ptr::eq(Lexicon::builtin(), Lexicon::builtin()));
    }

    #[test]
    fn compact_prefers_small_core() {
        let prefs = Lexicon::builtin().lookup("compact").unwrap();
        assert_eq!(
            prefs,
            &[
                Preference::NumRegs(NumRegs::Four),
                Preference::AddressingModes(
                    AddressingModes::new([AddressingMode::RegOnly]).unwrap()
                ),
            ]
        );
    }

    #[test]
    fn lookup_is_exact() {
        let lex = Lexicon::builtin();
        assert!(lex.lookup("CISC").is_none());
        assert!(lex.lookup("unknown").is_none());
    }

    #[test]
    fn rejects_unknown_field() {
        let err = Lexicon::from_toml_str("[words.fast]\nclock_mhz = 900\n").unwrap_err();
        assert!(matches!(err, LexiconError::Toml(_)));
    }

    #[test]
    fn rejects_out_of_domain_value() {
        assert!(Lexicon::from_toml_str("[words.big]\nnum_regs = 16\n").is_err());
        assert!(Lexicon::from_toml_str("[words.odd]\ndecoder_type = \"quantum\"\n").is_err());
        assert!(Lexicon::from_toml_str("[words.none]\naddressing_modes = []\n").is_err());
    }

    #[test]
    fn rejects_empty_entry() {
        let err = Lexicon::from_toml_str("[words.vague]\n").unwrap_err();
        assert!(matches!(err, LexiconError::EmptyEntry { ref word } if word == "vague"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");
        std::fs::write(&path, "[words.tiny]\nnum_regs = 4\npipeline_depth = 2\n").unwrap();
        let lex = Lexicon::load(&path).unwrap();
        assert_eq!(lex.lookup("tiny").map(<[_]>::len), Some(2));

        let missing = Lexicon::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, LexiconError::NotFound { .. }));
    }

    #[test]
    fn preference_display() {
        assert_eq!(
            Preference::DecoderType(DecoderType::Microcoded).to_string(),
            "decoder_type=microcoded"
        );
        assert_eq!(Preference::NumRegs(NumRegs::Eight).to_string(), "num_regs=8");
    }
}
