//! Scrollbar match markers
//!
//! Matches are projected onto the scrollbar track and merged into fixed-height
//! buckets, so dense clusters never draw overlapping markers. The bucket
//! holding the active match is returned last so it is painted on top.

use crate::search::index::MatchSpan;
use crate::view::draw::Rect;

/// The strip of the scrollbar markers are drawn in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerTrack {
    pub rect: Rect,
    /// Gap kept free at every edge of the track
    pub inset: f32,
    pub min_marker_height: f32,
}

/// A group of matches sharing one marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub index: usize,
    /// Number of matches in the bucket
    pub count: usize,
    pub rect: Rect,
    /// Holds the active match
    pub active: bool,
}

/// Bucket geometry for a track: `(bucket_height, bucket_count)`
pub fn bucket_layout(track: &MarkerTrack, content_height: f32, line_height: f32) -> (f32, usize) {
    let bucket_height = track
        .min_marker_height
        .max(track.rect.height * line_height / content_height);
    let drawable = (track.rect.height - 2.0 * track.inset).max(0.0);
    let count = ((drawable / bucket_height).floor() as usize).max(1);
    (bucket_height, count)
}

/// Bucket index for a match at `normalized_y`
pub fn bucket_of(normalized_y: f32, track: &MarkerTrack, bucket_height: f32, bucket_count: usize) -> usize {
    let top = track.rect.y + track.inset;
    let bottom = track.rect.bottom() - track.inset - bucket_height;
    let y = top + (bottom - top) * normalized_y.clamp(0.0, 1.0);
    let index = ((y - top) / bucket_height).floor();
    (index.max(0.0) as usize).min(bucket_count - 1)
}

/// Group `matches` into non-overlapping buckets along the track.
///
/// Non-active buckets come first in track order, followed by the active
/// bucket if there is one. Empty when there is nothing to mark.
pub fn bucketize(
    matches: &[MatchSpan],
    active: Option<usize>,
    track: &MarkerTrack,
    content_height: f32,
    line_height: f32,
) -> Vec<Bucket> {
    if matches.is_empty() || content_height <= 0.0 || track.rect.is_empty() {
        return Vec::new();
    }

    let (bucket_height, bucket_count) = bucket_layout(track, content_height, line_height);
    let mut counts = vec![0usize; bucket_count];
    let mut active_bucket = None;
    for (i, m) in matches.iter().enumerate() {
        let b = bucket_of(m.normalized_y, track, bucket_height, bucket_count);
        counts[b] += 1;
        if active == Some(i) {
            active_bucket = Some(b);
        }
    }

    let marker_rect = |b: usize| {
        let y = track.rect.y + track.inset + b as f32 * bucket_height;
        let height = bucket_height.min(track.rect.bottom() - track.inset - y);
        Rect::new(
            track.rect.x + track.inset,
            y,
            track.rect.width - 2.0 * track.inset,
            height,
        )
    };

    let mut buckets: Vec<Bucket> = counts
        .iter()
        .enumerate()
        .filter(|&(b, &count)| count > 0 && Some(b) != active_bucket)
        .map(|(b, &count)| Bucket {
            index: b,
            count,
            rect: marker_rect(b),
            active: false,
        })
        .collect();

    if let Some(b) = active_bucket {
        buckets.push(Bucket {
            index: b,
            count: counts[b],
            rect: marker_rect(b),
            active: true,
        });
    }
    buckets
}
