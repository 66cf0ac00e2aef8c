use anyhow::{Context, Result};
use log::{error, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

pub const DEFAULT_LANGUAGE_FILE: &str = "language.xml";

/// Terms written to a fresh language file: (name, English, French).
pub const DEFAULT_TERMS: &[(&str, &str, &str)] = &[
    ("MenuFile", "File", "Fichier"),
    ("MenuFileNew", "New", "Nouveau"),
    ("MenuFileOpen", "Open", "Ouvrir"),
    ("MenuFileSave", "Save", "Enregistrer"),
    ("MenuFileSaveAs", "Save as ...", "Enregistrer sous ..."),
    ("MenuFilePrint", "Print ...", "Imprimer ..."),
    ("MenufilePageSetup", "Page setup", "Aperçu avant impression"),
    ("MenufileQuit", "Quit", "Quitter"),
    ("MenuEdit", "Edit", "Edition"),
    ("MenuEditCancel", "Cancel", "Annuler"),
    ("MenuEditRedo", "Redo", "Rétablir"),
    ("MenuEditCut", "Cut", "Couper"),
    ("MenuEditCopy", "Copy", "Copier"),
    ("MenuEditPaste", "Paste", "Coller"),
    ("MenuEditSelectAll", "Select All", "Sélectionner tout"),
    ("MenuTools", "Tools", "Outils"),
    ("MenuToolsCustomize", "Customize ...", "Personaliser ..."),
    ("MenuToolsOptions", "Options", "Options"),
    ("MenuLanguage", "Language", "Langage"),
    ("MenuLanguageEnglish", "English", "Anglais"),
    ("MenuLanguageFrench", "French", "Français"),
    ("MenuHelp", "Help", "Aide"),
    ("MenuHelpSummary", "Summary", "Sommaire"),
    ("MenuHelpIndex", "Index", "Index"),
    ("MenuHelpSearch", "Search", "Rechercher"),
    ("MenuHelpAbout", "About", "A propos de ..."),
    ("ButtonGetMovie", "Get movie", "Obtenir le film"),
    ("ButtonNextPicture", "Next picture", "Image suivante"),
    ("ButtonPreviousPicture", "Previous picture", "Image précédente"),
];

/// Menu entries relabelled when the language changes, in menu order.
pub const MENU_TERMS: &[&str] = &[
    "MenuFile",
    "MenuFileNew",
    "MenuFileOpen",
    "MenuFileSave",
    "MenuFileSaveAs",
    "MenuFilePrint",
    "MenufilePageSetup",
    "MenufileQuit",
    "MenuEdit",
    "MenuEditCancel",
    "MenuEditRedo",
    "MenuEditCut",
    "MenuEditCopy",
    "MenuEditPaste",
    "MenuEditSelectAll",
    "MenuTools",
    "MenuToolsCustomize",
    "MenuToolsOptions",
    "MenuLanguage",
    "MenuLanguageEnglish",
    "MenuLanguageFrench",
    "MenuHelp",
    "MenuHelpSummary",
    "MenuHelpIndex",
    "MenuHelpSearch",
    "MenuHelpAbout",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    French,
}

impl Language {
    /// Unknown names fall back to English.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "french" | "fr" | "français" | "francais" => Language::French,
            _ => Language::English,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Language::English => Language::French,
            Language::French => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::French => write!(f, "French"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    english: HashMap<String, String>,
    french: HashMap<String, String>,
}

#[derive(Debug)]
pub struct LanguageLoad {
    pub table: LanguageTable,
    /// Term names seen more than once; the first value was kept.
    pub duplicates: Vec<String>,
    /// Set when the file could not be parsed and the default was regenerated.
    pub recovered: Option<String>,
}

impl LanguageTable {
    pub fn load(path: &Path) -> Result<LanguageLoad> {
        if !path.exists() {
            info!("load_languages: {:?} missing, writing default", path);
            write_default_file(path)?;
        }

        let xml = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        match Self::parse(&xml) {
            Ok((table, duplicates)) => {
                info!("load_languages: loaded {} terms from {:?}", table.len(), path);
                Ok(LanguageLoad {
                    table,
                    duplicates,
                    recovered: None,
                })
            }
            Err(e) => {
                let message =
                    format!("Error while loading the {} XML file {:#}", path.display(), e);
                error!("load_languages: {}", message);
                write_default_file(path)?;
                let (table, duplicates) = Self::parse(&default_xml())?;
                Ok(LanguageLoad {
                    table,
                    duplicates,
                    recovered: Some(message),
                })
            }
        }
    }

    pub fn parse(xml: &str) -> Result<(Self, Vec<String>)> {
        let document = roxmltree::Document::parse(xml).context("not a well-formed XML document")?;
        let mut table = LanguageTable::default();
        let mut duplicates = Vec::new();

        for term in document.descendants().filter(|n| n.has_tag_name("term")) {
            let child_text = |tag: &str| {
                term.children()
                    .find(|c| c.has_tag_name(tag))
                    .and_then(|c| c.text())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
            };
            let (Some(name), Some(english), Some(french)) = (
                child_text("name"),
                child_text("englishValue"),
                child_text("frenchValue"),
            ) else {
                continue;
            };

            if table.english.contains_key(name) {
                warn!("load_languages: Your XML file has duplicate like: {}", name);
                duplicates.push(name.to_string());
            } else {
                table.english.insert(name.to_string(), english.to_string());
            }
            if table.french.contains_key(name) {
                warn!("load_languages: Your XML file has duplicate like: {}", name);
            } else {
                table.french.insert(name.to_string(), french.to_string());
            }
        }

        Ok((table, duplicates))
    }

    pub fn get(&self, language: Language, term: &str) -> Option<&str> {
        let map = match language {
            Language::English => &self.english,
            Language::French => &self.french,
        };
        map.get(term).map(String::as_str)
    }

    pub fn translate(&self, language: Language, term: &str) -> String {
        match self.get(language, term) {
            Some(text) => text.to_string(),
            None => format!(
                "the term: \"{}\" has not been translated yet.\nPlease tell the developer to translate this term",
                term
            ),
        }
    }

    pub fn menu_labels(&self, language: Language) -> Vec<(&'static str, String)> {
        MENU_TERMS
            .iter()
            .map(|term| (*term, self.translate(language, term)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.english.len()
    }

    pub fn is_empty(&self) -> bool {
        self.english.is_empty()
    }
}

pub fn default_xml() -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<terms>\n");
    for (name, english, french) in DEFAULT_TERMS {
        xml.push_str("  <term>\n");
        xml.push_str(&format!("    <name>{}</name>\n", escape(name)));
        xml.push_str(&format!("    <englishValue>{}</englishValue>\n", escape(english)));
        xml.push_str(&format!("    <frenchValue>{}</frenchValue>\n", escape(french)));
        xml.push_str("  </term>\n");
    }
    xml.push_str("</terms>\n");
    xml
}

pub fn write_default_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, default_xml()).with_context(|| format!("Failed to write {:?}", path))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, english: &str, french: &str) -> String {
        format!(
            "<term><name>{}</name><englishValue>{}</englishValue><frenchValue>{}</frenchValue></term>",
            name, english, french
        )
    }

    #[test]
    fn duplicate_keeps_first_value() {
        let xml = format!(
            "<terms>{}{}{}</terms>",
            term("MenuFile", "File", "Fichier"),
            term("MenuFile", "Document", "Document"),
            term("MenuEdit", "Edit", "Edition"),
        );
        let (table, duplicates) = LanguageTable::parse(&xml).unwrap();
        assert_eq!(table.get(Language::English, "MenuFile"), Some("File"));
        assert_eq!(table.get(Language::French, "MenuFile"), Some("Fichier"));
        assert_eq!(table.len(), 2);
        assert_eq!(duplicates, vec!["MenuFile".to_string()]);
    }

    #[test]
    fn duplicate_in_file_loads_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("language.xml");
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?><terms>{}{}</terms>",
            term("MenuHelp", "Help", "Aide"),
            term("MenuHelp", "Assist", "Assistance"),
        );
        fs::write(&path, xml).unwrap();

        let loaded = LanguageTable::load(&path).unwrap();
        assert!(loaded.recovered.is_none());
        assert_eq!(loaded.duplicates, vec!["MenuHelp".to_string()]);
        assert_eq!(loaded.table.translate(Language::French, "MenuHelp"), "Aide");
    }

    #[test]
    fn incomplete_terms_are_skipped() {
        let xml = "<terms>\
            <term><name>NoFrench</name><englishValue>x</englishValue></term>\
            <term><name></name><englishValue>x</englishValue><frenchValue>y</frenchValue></term>\
            <term/>\
            </terms>";
        let (table, duplicates) = LanguageTable::parse(xml).unwrap();
        assert!(table.is_empty());
        assert!(duplicates.is_empty());
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("language.xml");
        let loaded = LanguageTable::load(&path).unwrap();

        assert!(path.is_file());
        assert!(loaded.recovered.is_none());
        assert!(loaded.duplicates.is_empty());
        assert_eq!(loaded.table.len(), DEFAULT_TERMS.len());
        assert_eq!(
            loaded.table.get(Language::French, "MenuLanguageFrench"),
            Some("Français")
        );
    }

    #[test]
    fn malformed_file_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("language.xml");
        fs::write(&path, "<terms><term><name>Broken</name></terms>").unwrap();

        let loaded = LanguageTable::load(&path).unwrap();
        let message = loaded.recovered.expect("parse failure should be reported");
        assert!(message.starts_with("Error while loading the "));
        assert_eq!(loaded.table.get(Language::English, "MenufileQuit"), Some("Quit"));
        assert_eq!(fs::read_to_string(&path).unwrap(), default_xml());
    }

    #[test]
    fn untranslated_term_gives_placeholder() {
        let table = LanguageTable::default();
        assert_eq!(
            table.translate(Language::English, "Display"),
            "the term: \"Display\" has not been translated yet.\nPlease tell the developer to translate this term"
        );
    }

    #[test]
    fn language_names_fall_back_to_english() {
        assert_eq!(Language::from_name("French"), Language::French);
        assert_eq!(Language::from_name("FRENCH"), Language::French);
        assert_eq!(Language::from_name("english"), Language::English);
        assert_eq!(Language::from_name("klingon"), Language::English);
        assert_eq!(Language::French.other(), Language::English);
        assert_eq!(Language::French.to_string(), "French");
    }

    #[test]
    fn menu_labels_follow_language() {
        let (table, _) = LanguageTable::parse(&default_xml()).unwrap();
        let labels = table.menu_labels(Language::French);
        assert_eq!(labels.len(), MENU_TERMS.len());
        assert_eq!(labels[0], ("MenuFile", "Fichier".to_string()));
        assert_eq!(labels.last().unwrap().1, "A propos de ...");
    }
}
