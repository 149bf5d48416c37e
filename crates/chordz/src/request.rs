//! Generation requests.
//!
//! [`RequestSpec`] is the loose, string-tagged form a front end or config
//! file supplies. [`RequestSpec::resolve`] turns it into a typed
//! [`GenerationRequest`], substituting defaults for unknown tags and
//! rejecting values no default can repair.

use serde::{Deserialize, Serialize};

use crate::chord::{ChordOptions, ExtensionDensity};
use crate::genre::GenreId;
use crate::note::PitchClass;
use crate::progression::Humanization;
use crate::resolve::{Fallback, Identifier, Resolved};
use crate::rhythm::RhythmPattern;
use crate::scale::ScaleId;
use crate::voice_leading::VoiceLeadingPolicy;
use crate::voicing::Voicing;
use crate::{Error, Result};

pub const DEFAULT_TEMPO: u32 = 120;

/// A request as supplied by a front end. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSpec {
    pub key: String,
    pub scale: String,
    pub genre: String,
    pub inversion: String,
    pub voice_leading: bool,
    pub voice_leading_policy: VoiceLeadingPolicy,
    /// Whether `rhythm_pattern` is recorded on the result
    pub rhythm: bool,
    pub rhythm_pattern: String,
    pub extension_density: String,
    pub alteration_probability: f64,
    pub melody: bool,
    pub tempo: u32,
    pub humanize: bool,
    pub humanize_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        RequestSpec {
            key: "C".into(),
            scale: ScaleId::Major.tag().into(),
            genre: GenreId::Soul.tag().into(),
            inversion: Voicing::Root.tag().into(),
            voice_leading: false,
            voice_leading_policy: VoiceLeadingPolicy::Positional,
            rhythm: false,
            rhythm_pattern: RhythmPattern::Quarter.tag().into(),
            extension_density: ExtensionDensity::None.tag().into(),
            alteration_probability: 0.0,
            melody: false,
            tempo: DEFAULT_TEMPO,
            humanize: false,
            humanize_amount: 0.0,
            seed: None,
        }
    }
}

impl RequestSpec {
    /// Resolve tags into a typed request.
    ///
    /// Unknown scale, genre, inversion, rhythm and density tags fall back to
    /// their defaults and are listed in the result. An unknown key, a zero
    /// tempo or a probability outside [0, 1] is an error.
    pub fn resolve(&self) -> Result<Resolved<GenerationRequest>> {
        let key: PitchClass = self.key.parse()?;
        if self.tempo == 0 {
            return Err(Error::InvalidTempo { bpm: self.tempo });
        }
        let alteration_probability = unit_interval(self.alteration_probability)?;
        let humanize_amount = unit_interval(self.humanize_amount)?;

        let mut fallbacks: Vec<Fallback> = Vec::new();
        let scale = ScaleId::resolve(&self.scale).collect_into(&mut fallbacks);
        let genre = GenreId::resolve(&self.genre).collect_into(&mut fallbacks);
        let inversion = Voicing::resolve(&self.inversion).collect_into(&mut fallbacks);
        let extension_density =
            ExtensionDensity::resolve(&self.extension_density).collect_into(&mut fallbacks);
        let rhythm_pattern = if self.rhythm {
            Some(RhythmPattern::resolve(&self.rhythm_pattern).collect_into(&mut fallbacks))
        } else {
            None
        };

        let request = GenerationRequest {
            key,
            scale,
            genre,
            inversion,
            voice_leading: self.voice_leading.then_some(self.voice_leading_policy),
            rhythm_pattern,
            extension_density,
            alteration_probability,
            melody: self.melody,
            tempo: self.tempo,
            humanization: self.humanize.then_some(Humanization {
                enabled: true,
                amount: humanize_amount,
            }),
            seed: self.seed,
        };
        Ok(Resolved {
            value: request,
            fallbacks,
        })
    }
}

fn unit_interval(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidProbability { value })
    }
}

/// A fully typed generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub key: PitchClass,
    pub scale: ScaleId,
    pub genre: GenreId,
    pub inversion: Voicing,
    /// Voice-leading policy, or `None` to keep constructed voicings
    pub voice_leading: Option<VoiceLeadingPolicy>,
    pub rhythm_pattern: Option<RhythmPattern>,
    pub extension_density: ExtensionDensity,
    pub alteration_probability: f64,
    pub melody: bool,
    pub tempo: u32,
    pub humanization: Option<Humanization>,
    pub seed: Option<u64>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            key: PitchClass::new(0),
            scale: ScaleId::Major,
            genre: GenreId::Soul,
            inversion: Voicing::Root,
            voice_leading: None,
            rhythm_pattern: None,
            extension_density: ExtensionDensity::None,
            alteration_probability: 0.0,
            melody: false,
            tempo: DEFAULT_TEMPO,
            humanization: None,
            seed: None,
        }
    }
}

impl GenerationRequest {
    /// Per-chord construction options.
    pub fn chord_options(&self) -> ChordOptions {
        ChordOptions {
            inversion: (self.inversion != Voicing::Root).then_some(self.inversion),
            extension_density: self.extension_density,
            alteration_probability: self.alteration_probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdentifierKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_resolve_cleanly() {
        let resolved = RequestSpec::default().resolve().unwrap();
        assert!(!resolved.is_fallback());
        assert_eq!(resolved.value, GenerationRequest::default());
    }

    #[test]
    fn tags_become_types() {
        let spec = RequestSpec {
            key: "F#".into(),
            scale: "dorian".into(),
            genre: "jazz".into(),
            inversion: "drop2".into(),
            voice_leading: true,
            rhythm: true,
            rhythm_pattern: "waltz".into(),
            extension_density: "lots".into(),
            alteration_probability: 0.25,
            melody: true,
            tempo: 96,
            humanize: true,
            humanize_amount: 0.4,
            seed: Some(9),
            ..RequestSpec::default()
        };
        let request = spec.resolve().unwrap().into_value();
        assert_eq!(request.key.name(), "F#");
        assert_eq!(request.scale, ScaleId::Dorian);
        assert_eq!(request.genre, GenreId::Jazz);
        assert_eq!(request.inversion, Voicing::Drop2);
        assert_eq!(request.voice_leading, Some(VoiceLeadingPolicy::Positional));
        assert_eq!(request.rhythm_pattern, Some(RhythmPattern::Waltz));
        assert_eq!(request.extension_density, ExtensionDensity::Lots);
        assert_eq!(
            request.humanization,
            Some(Humanization {
                enabled: true,
                amount: 0.4
            })
        );
        assert_eq!(request.seed, Some(9));
        assert_eq!(request.chord_options().inversion, Some(Voicing::Drop2));
    }

    #[test]
    fn unknown_tags_fall_back_and_are_reported() {
        let spec = RequestSpec {
            scale: "lydian".into(),
            genre: "polka".into(),
            ..RequestSpec::default()
        };
        let resolved = spec.resolve().unwrap();
        assert_eq!(resolved.value.scale, ScaleId::Major);
        assert_eq!(resolved.value.genre, GenreId::Soul);
        let kinds: Vec<IdentifierKind> = resolved.fallbacks.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![IdentifierKind::Scale, IdentifierKind::Genre]);
    }

    #[test]
    fn rhythm_tag_ignored_when_rhythm_is_off() {
        let spec = RequestSpec {
            rhythm_pattern: "bossa".into(),
            ..RequestSpec::default()
        };
        let resolved = spec.resolve().unwrap();
        assert!(!resolved.is_fallback());
        assert_eq!(resolved.value.rhythm_pattern, None);
    }

    #[test]
    fn root_inversion_means_no_transform() {
        assert_eq!(GenerationRequest::default().chord_options().inversion, None);
    }

    #[test]
    fn hard_errors() {
        let bad_key = RequestSpec {
            key: "H".into(),
            ..RequestSpec::default()
        };
        assert!(matches!(
            bad_key.resolve(),
            Err(Error::UnknownIdentifier {
                kind: IdentifierKind::Key,
                ..
            })
        ));

        let zero_tempo = RequestSpec {
            tempo: 0,
            ..RequestSpec::default()
        };
        assert!(matches!(zero_tempo.resolve(), Err(Error::InvalidTempo { bpm: 0 })));

        let probability = RequestSpec {
            alteration_probability: 1.5,
            ..RequestSpec::default()
        };
        assert!(matches!(
            probability.resolve(),
            Err(Error::InvalidProbability { .. })
        ));
    }

    #[test]
    fn deserializes_partial_toml_style_input() {
        let spec: RequestSpec = serde_json::from_str(r#"{"genre": "neosoul", "melody": true}"#).unwrap();
        assert_eq!(spec.genre, "neosoul");
        assert!(spec.melody);
        assert_eq!(spec.tempo, DEFAULT_TEMPO);
        assert_eq!(spec.key, "C");
    }
}
