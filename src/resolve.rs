//! Track resolution: turning probed streams into one audio and one subtitle
//! choice per series.

use crate::key::SeriesKey;
use anyhow::Result;
use hardsub_av::{AudioChoice, CodecType, StreamDescriptor, SubtitleChoice, TrackSelection};

/// Source of operator decisions.
pub trait Chooser {
    /// Present `options` under `heading` and return the picked position.
    ///
    /// The returned value is not range-checked by callers.
    fn choose(&mut self, heading: &str, options: &[String]) -> Result<usize>;
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, heading: &str, options: &[String]) -> Result<usize> {
        (**self).choose(heading, options)
    }
}

/// `index: title (language)` lines for a candidate list.
pub fn render_options(streams: &[&StreamDescriptor]) -> Vec<String> {
    streams
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}: {} ({})", i, s.display_title(), s.display_language()))
        .collect()
}

/// Resolves track selections, prompting through a [`Chooser`] only when a
/// stream kind has more than one candidate.
pub struct TrackResolver<C> {
    chooser: C,
}

impl<C: Chooser> TrackResolver<C> {
    pub fn new(chooser: C) -> Self {
        Self { chooser }
    }

    /// Resolve the selection for `key` from its representative's streams.
    pub fn resolve(
        &mut self,
        key: &SeriesKey,
        streams: &[StreamDescriptor],
    ) -> Result<TrackSelection> {
        let audio_streams = of_type(streams, CodecType::Audio);
        let subtitle_streams = of_type(streams, CodecType::Subtitle);

        let audio = self
            .pick(key, "audio", &audio_streams)?
            .map(|(index, stream)| AudioChoice {
                index,
                codec: stream.map(|s| s.codec_name.clone()).unwrap_or_default(),
                channels: stream.and_then(|s| s.channels),
            });

        let subtitle = self
            .pick(key, "subtitle", &subtitle_streams)?
            .map(|(index, stream)| SubtitleChoice {
                index,
                codec: stream.map(|s| s.codec_name.clone()).unwrap_or_default(),
            });

        let selection = TrackSelection { audio, subtitle };
        tracing::info!(
            "{}: audio {} / subtitles {}",
            key,
            selection.audio_codec(),
            selection.subtitle_codec()
        );
        Ok(selection)
    }

    /// Zero candidates: nothing. One: position 0. More: ask. The stream is
    /// `None` when the operator picked a position past the end.
    fn pick<'s>(
        &mut self,
        key: &SeriesKey,
        kind: &str,
        candidates: &[&'s StreamDescriptor],
    ) -> Result<Option<(usize, Option<&'s StreamDescriptor>)>> {
        let index = match candidates.len() {
            0 => return Ok(None),
            1 => 0,
            _ => {
                let heading = format!("Please choose which {} stream to use for {}:", kind, key);
                self.chooser.choose(&heading, &render_options(candidates))?
            }
        };

        let stream = candidates.get(index).copied();
        if stream.is_none() {
            tracing::warn!(
                "{}: {} stream {} does not exist ({} available); the encode will likely fail",
                key,
                kind,
                index,
                candidates.len()
            );
        }
        Ok(Some((index, stream)))
    }

    /// Give back the chooser.
    pub fn into_inner(self) -> C {
        self.chooser
    }
}

fn of_type(streams: &[StreamDescriptor], codec_type: CodecType) -> Vec<&StreamDescriptor> {
    streams.iter().filter(|s| s.codec_type == codec_type).collect()
}
