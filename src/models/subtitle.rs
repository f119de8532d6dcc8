use serde::{Deserialize, Serialize};

/// Subtitle files known for one film, keyed by its IMDb code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub imdb_code: String,
    pub files: Vec<SubtitleFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleFile {
    /// Where the `.vtt` file is served from
    pub path: String,
    /// ISO 639-1 language code
    pub lang: String,
}

impl Subtitle {
    /// Subtitle file for `lang`, if one is known
    pub fn file_for(&self, lang: &str) -> Option<&SubtitleFile> {
        self.files
            .iter()
            .find(|file| file.lang.eq_ignore_ascii_case(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_for_language() {
        let subtitle = Subtitle {
            imdb_code: "tt0113277".to_string(),
            files: vec![
                SubtitleFile {
                    path: "/subtitles/tt0113277/en.vtt".to_string(),
                    lang: "en".to_string(),
                },
                SubtitleFile {
                    path: "/subtitles/tt0113277/fr.vtt".to_string(),
                    lang: "fr".to_string(),
                },
            ],
        };

        assert_eq!(
            subtitle.file_for("FR").map(|f| f.path.as_str()),
            Some("/subtitles/tt0113277/fr.vtt")
        );
        assert!(subtitle.file_for("de").is_none());
    }
}
