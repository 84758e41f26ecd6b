//! Inline flag artwork. Each flag is a small self-contained SVG document on a
//! 60x42 viewBox, parsed once by the asset store and rasterized at the size
//! the layout asks for.

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FlagKey {
    Uk,
    Us,
    Eu,
    Jp,
    Au,
    Fr,
    De,
    Es,
    It,
    Br,
    In,
    Kr,
    Globe,
}

impl FlagKey {
    pub const ALL: [FlagKey; 13] = [
        FlagKey::Uk,
        FlagKey::Us,
        FlagKey::Eu,
        FlagKey::Jp,
        FlagKey::Au,
        FlagKey::Fr,
        FlagKey::De,
        FlagKey::Es,
        FlagKey::It,
        FlagKey::Br,
        FlagKey::In,
        FlagKey::Kr,
        FlagKey::Globe,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uk" => Some(Self::Uk),
            "us" => Some(Self::Us),
            "eu" => Some(Self::Eu),
            "jp" => Some(Self::Jp),
            "au" => Some(Self::Au),
            "fr" => Some(Self::Fr),
            "de" => Some(Self::De),
            "es" => Some(Self::Es),
            "it" => Some(Self::It),
            "br" => Some(Self::Br),
            "in" => Some(Self::In),
            "kr" => Some(Self::Kr),
            "globe" => Some(Self::Globe),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uk => "uk",
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Jp => "jp",
            Self::Au => "au",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Es => "es",
            Self::It => "it",
            Self::Br => "br",
            Self::In => "in",
            Self::Kr => "kr",
            Self::Globe => "globe",
        }
    }
}

impl Default for FlagKey {
    fn default() -> Self {
        Self::Globe
    }
}

const FLAG_UK: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#012169"/>
  <path d="M0,0 L60,42 M60,0 L0,42" stroke="#FFF" stroke-width="8"/>
  <path d="M0,0 L60,42 M60,0 L0,42" stroke="#C8102E" stroke-width="4"/>
  <path d="M30,0 V42 M0,21 H60" stroke="#FFF" stroke-width="14"/>
  <path d="M30,0 V42 M0,21 H60" stroke="#C8102E" stroke-width="8"/>
</svg>"##;

const FLAG_US: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#FFF"/>
  <g fill="#B22234">
    <rect y="0" width="60" height="4"/>
    <rect y="8" width="60" height="4"/>
    <rect y="16" width="60" height="4"/>
    <rect y="24" width="60" height="4"/>
    <rect y="32" width="60" height="4"/>
    <rect y="40" width="60" height="2"/>
  </g>
  <rect width="26" height="22" fill="#3C3B6E"/>
  <g fill="#FFF">
    <circle cx="4" cy="4" r="1.1"/>
    <circle cx="10" cy="4" r="1.1"/>
    <circle cx="16" cy="4" r="1.1"/>
    <circle cx="22" cy="4" r="1.1"/>
    <circle cx="7" cy="8" r="1.1"/>
    <circle cx="13" cy="8" r="1.1"/>
    <circle cx="19" cy="8" r="1.1"/>
    <circle cx="4" cy="12" r="1.1"/>
    <circle cx="10" cy="12" r="1.1"/>
    <circle cx="16" cy="12" r="1.1"/>
    <circle cx="22" cy="12" r="1.1"/>
    <circle cx="7" cy="16" r="1.1"/>
    <circle cx="13" cy="16" r="1.1"/>
    <circle cx="19" cy="16" r="1.1"/>
  </g>
</svg>"##;

const FLAG_EU: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#1e3a8a"/>
  <g fill="#facc15">
    <circle cx="30" cy="10" r="2"/>
    <circle cx="38" cy="12" r="2"/>
    <circle cx="44" cy="18" r="2"/>
    <circle cx="44" cy="26" r="2"/>
    <circle cx="38" cy="32" r="2"/>
    <circle cx="30" cy="34" r="2"/>
    <circle cx="22" cy="32" r="2"/>
    <circle cx="16" cy="26" r="2"/>
    <circle cx="16" cy="18" r="2"/>
    <circle cx="22" cy="12" r="2"/>
  </g>
</svg>"##;

const FLAG_JP: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#FFF"/>
  <circle cx="30" cy="21" r="10" fill="#D7002D"/>
</svg>"##;

const FLAG_AU: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#0F1C6B"/>
  <circle cx="18" cy="16" r="6" fill="#FFF"/>
  <circle cx="44" cy="28" r="4" fill="#FDE047"/>
</svg>"##;

const FLAG_FR: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="20" height="42" fill="#0055A4"/>
  <rect x="20" width="20" height="42" fill="#FFF"/>
  <rect x="40" width="20" height="42" fill="#EF4135"/>
</svg>"##;

const FLAG_DE: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="14" fill="#000"/>
  <rect y="14" width="60" height="14" fill="#DD0000"/>
  <rect y="28" width="60" height="14" fill="#FFCE00"/>
</svg>"##;

const FLAG_ES: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="10" fill="#AA151B"/>
  <rect y="10" width="60" height="22" fill="#F1BF00"/>
  <rect y="32" width="60" height="10" fill="#AA151B"/>
</svg>"##;

const FLAG_IT: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="20" height="42" fill="#009246"/>
  <rect x="20" width="20" height="42" fill="#FFF"/>
  <rect x="40" width="20" height="42" fill="#CE2B37"/>
</svg>"##;

const FLAG_BR: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#009C3B"/>
  <polygon points="30,6 54,21 30,36 6,21" fill="#FFDF00"/>
  <circle cx="30" cy="21" r="8" fill="#002776"/>
</svg>"##;

const FLAG_IN: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="14" fill="#FF9933"/>
  <rect y="14" width="60" height="14" fill="#FFF"/>
  <rect y="28" width="60" height="14" fill="#138808"/>
  <circle cx="30" cy="21" r="4" fill="#000080"/>
</svg>"##;

const FLAG_KR: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#FFF"/>
  <path d="M30 11 A10 10 0 0 1 40 21 A10 10 0 0 1 20 21 A10 10 0 0 1 30 11 Z" fill="#CD2E3A"/>
  <path d="M30 31 A10 10 0 0 1 20 21 A10 10 0 0 1 40 21 A10 10 0 0 1 30 31 Z" fill="#0047A0"/>
</svg>"##;

const FLAG_GLOBE: &str = r##"<svg viewBox="0 0 60 42" xmlns="http://www.w3.org/2000/svg">
  <rect width="60" height="42" fill="#0f172a"/>
  <circle cx="30" cy="21" r="14" fill="none" stroke="#38bdf8" stroke-width="2"/>
  <path d="M16,21 H44" stroke="#38bdf8" stroke-width="2"/>
  <path d="M30,7 V35" stroke="#38bdf8" stroke-width="2"/>
  <ellipse cx="30" cy="21" rx="6" ry="14" fill="none" stroke="#38bdf8" stroke-width="2"/>
</svg>"##;

pub fn flag_svg(key: FlagKey) -> &'static str {
    match key {
        FlagKey::Uk => FLAG_UK,
        FlagKey::Us => FLAG_US,
        FlagKey::Eu => FLAG_EU,
        FlagKey::Jp => FLAG_JP,
        FlagKey::Au => FLAG_AU,
        FlagKey::Fr => FLAG_FR,
        FlagKey::De => FLAG_DE,
        FlagKey::Es => FLAG_ES,
        FlagKey::It => FLAG_IT,
        FlagKey::Br => FLAG_BR,
        FlagKey::In => FLAG_IN,
        FlagKey::Kr => FLAG_KR,
        FlagKey::Globe => FLAG_GLOBE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_key() {
        for key in FlagKey::ALL {
            assert_eq!(FlagKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(FlagKey::parse("xx"), None);
    }

    #[test]
    fn every_flag_parses_as_svg() {
        let opts = usvg::Options::default();
        for key in FlagKey::ALL {
            let tree = usvg::Tree::from_str(flag_svg(key), &opts)
                .unwrap_or_else(|e| panic!("{}: {e}", key.as_str()));
            assert!(tree.size().width() > 0.0);
        }
    }
}
