//! Message signals laid on the carrier's time grid.
//!
//! Two producers: a Gaussian-windowed sine burst ([`monochromatic`]) and a
//! piecewise-constant text encoding ([`TextCodec`]) in which each character
//! occupies a fixed number of samples at amplitude `code / norm_factor`.

use std::{collections::BTreeMap, ops::Range};

use crate::signal::ScalarSignal;

/// `A * exp(-((t - t0) / sigma)^2) * sin(omega * (t - t0))`, with
/// `sigma = (t_last - t_first) / 40`.
///
/// A single-sample grid has zero width and gives a zero signal.
pub fn monochromatic(times: &[f64], amplitude: f64, omega: f64, center: f64) -> ScalarSignal {
    let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
        return ScalarSignal::default();
    };
    let sigma = (last - first) / 40.0;
    if sigma <= 0.0 {
        return ScalarSignal::zeros(times.len());
    }

    times
        .iter()
        .map(|&t| {
            let x = (t - center) / sigma;
            amplitude * (-x * x).exp() * (omega * (t - center)).sin()
        })
        .collect()
}

/// Default divisor mapping code points to signal amplitudes.
pub const DEFAULT_NORM_FACTOR: f64 = 300.0;

/// Default minimum segment amplitude, as a fraction of the norm factor.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Text to signal codec.
///
/// Character `i` occupies samples `[start + i * steps, start + (i + 1) * steps)`
/// where `start` is the grid index nearest to `start_time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextCodec {
    /// Time at which the first character starts
    pub start_time: f64,
    /// Samples per character
    pub steps_per_symbol: usize,
    /// Divisor from code point to amplitude
    pub norm_factor: f64,
    /// Minimum accepted segment amplitude, as a fraction of `norm_factor`
    pub threshold: f64,
}

impl TextCodec {
    /// Codec with the default norm factor and threshold.
    pub fn new(start_time: f64, steps_per_symbol: usize) -> Self {
        Self {
            start_time,
            steps_per_symbol,
            norm_factor: DEFAULT_NORM_FACTOR,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Unicode scalar values of `text`.
    pub fn text_to_code_points(text: &str) -> Vec<i64> {
        text.chars().map(|c| i64::from(u32::from(c))).collect()
    }

    /// Text from code points; values that are not Unicode scalars become `?`.
    pub fn code_points_to_text(codes: &[i64]) -> String {
        codes
            .iter()
            .map(|&code| u32::try_from(code).ok().and_then(char::from_u32).unwrap_or('?'))
            .collect()
    }

    /// Lay `codes` on the grid `times`.
    ///
    /// Characters that do not fit entirely are dropped. A start time
    /// outside the grid gives a silent signal.
    pub fn encode(&self, codes: &[i64], times: &[f64]) -> ScalarSignal {
        let mut samples = vec![0.0; times.len()];
        let Some(start) = self.start_index(times) else {
            return samples.into();
        };

        for (i, &code) in codes.iter().enumerate() {
            let Some(range) = self.segment(start, i, samples.len()) else {
                break;
            };
            samples[range].fill(code as f64 / self.norm_factor);
        }
        samples.into()
    }

    /// Read code points back from a (possibly noisy) recovered signal.
    ///
    /// Each complete segment votes for the most frequent rounded value,
    /// ties going to the smaller one. Segments below the threshold are
    /// skipped until the first accepted one; afterwards the first
    /// rejected segment ends the message.
    pub fn decode(&self, signal: &[f64], times: &[f64]) -> Vec<i64> {
        let mut codes = Vec::new();
        let Some(start) = self.start_index(times) else {
            return codes;
        };
        if self.steps_per_symbol == 0 {
            return codes;
        }

        let min_amplitude = self.threshold * self.norm_factor;
        for i in 0.. {
            let Some(range) = self.segment(start, i, signal.len()) else {
                break;
            };
            let value = segment_mode(&signal[range], self.norm_factor);
            if (value as f64).abs() >= min_amplitude {
                codes.push(value);
            } else if !codes.is_empty() {
                break;
            }
        }
        codes
    }

    /// Convenience for `encode(text_to_code_points(text), times)`.
    pub fn encode_text(&self, text: &str, times: &[f64]) -> ScalarSignal {
        self.encode(&Self::text_to_code_points(text), times)
    }

    /// Convenience for `code_points_to_text(decode(signal, times))`.
    pub fn decode_text(&self, signal: &[f64], times: &[f64]) -> String {
        Self::code_points_to_text(&self.decode(signal, times))
    }

    /// Sample range of symbol `index`, or `None` when it does not fit in
    /// `len` samples.
    fn segment(&self, start: usize, index: usize, len: usize) -> Option<Range<usize>> {
        let begin = index.checked_mul(self.steps_per_symbol)?.checked_add(start)?;
        let end = begin.checked_add(self.steps_per_symbol)?;
        (end <= len).then_some(begin..end)
    }

    /// Grid index of `start_time`, or `None` when the grid is too short or
    /// the start lies outside it.
    fn start_index(&self, times: &[f64]) -> Option<usize> {
        let [t0, t1, ..] = times else {
            return None;
        };
        let dt = t1 - t0;
        if !(dt.is_finite() && dt > 0.0) {
            return None;
        }
        let index = ((self.start_time - t0) / dt).round();
        if index.is_finite() && index >= 0.0 && index < times.len() as f64 {
            Some(index as usize)
        } else {
            None
        }
    }
}

/// Most frequent `round(sample * norm)` in a segment, smallest on ties.
fn segment_mode(segment: &[f64], norm: f64) -> i64 {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for sample in segment {
        *counts.entry((sample * norm).round() as i64).or_default() += 1;
    }
    // max_by_key keeps the last maximum, so iterate largest value first
    counts.into_iter().rev().max_by_key(|&(_, count)| count).map_or(0, |(value, _)| value)
}
