//! Caption track selection.

use crate::models::transcript::{CaptionKind, TrackChoice};

/// Pick the caption track to download.
///
/// Auto-captions win over uploaded subtitles. Within a list the order is:
/// exact code, then the first code with `requested` as a case-insensitive
/// prefix (`pl` matches `pl-PL`), then the first code advertised.
pub fn select_track(auto: &[String], manual: &[String], requested: &str) -> Option<TrackChoice> {
    if let Some(lang) = pick_from(auto, requested) {
        return Some(TrackChoice {
            lang,
            kind: CaptionKind::Auto,
        });
    }
    pick_from(manual, requested).map(|lang| TrackChoice {
        lang,
        kind: CaptionKind::Manual,
    })
}

fn pick_from(langs: &[String], requested: &str) -> Option<String> {
    let first = langs.first()?;
    if langs.iter().any(|code| code == requested) {
        return Some(requested.to_string());
    }
    let prefix = requested.to_lowercase();
    langs
        .iter()
        .find(|code| code.to_lowercase().starts_with(&prefix))
        .or(Some(first))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_auto_match_wins() {
        let choice = select_track(&langs(&["pl-PL", "pl", "en"]), &langs(&["pl"]), "pl").unwrap();
        assert_eq!(choice.lang, "pl");
        assert_eq!(choice.kind, CaptionKind::Auto);
    }

    #[test]
    fn dialect_prefix_match_is_case_insensitive() {
        let choice = select_track(&langs(&["en", "PL-pl"]), &[], "pl").unwrap();
        assert_eq!(choice.lang, "PL-pl");
    }

    #[test]
    fn falls_back_to_first_auto_language() {
        let choice = select_track(&langs(&["de", "fr"]), &langs(&["pl"]), "pl").unwrap();
        assert_eq!(choice.lang, "de");
        assert_eq!(choice.kind, CaptionKind::Auto);
    }

    #[test]
    fn manual_used_only_without_auto() {
        let choice = select_track(&[], &langs(&["en", "pl-PL"]), "pl").unwrap();
        assert_eq!(choice.lang, "pl-PL");
        assert_eq!(choice.kind, CaptionKind::Manual);

        let choice = select_track(&[], &langs(&["en"]), "pl").unwrap();
        assert_eq!(choice.lang, "en");
        assert_eq!(choice.kind, CaptionKind::Manual);
    }

    #[test]
    fn nothing_advertised() {
        assert!(select_track(&[], &[], "pl").is_none());
    }
}
