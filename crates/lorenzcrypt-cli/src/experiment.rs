//! End-to-end comparison of the three schemes.
//!
//! One carrier is generated and reused for every scheme and message. Each
//! run encrypts, decrypts with the scheme's side information and attacks
//! the wire signal with the spectral adversary.

use lorenzcrypt_core::{
    EncryptionScheme, PceAddition, PceConvolution, SchemeKind, ScalarSignal, SpectralAdversary,
    SpectralConditioning, SpectralResidue, SynchronizationScheme, TextCodec,
    metrics::{dominant_frequency, pearson_correlation, rms_error, text_fidelity},
    monochromatic,
    schemes::pce_convolve_decrypt_with_residue,
    solve_carrier,
};

use crate::{config::ExperimentConfig, error::ExperimentError};

/// Message signals hidden in the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Gaussian-windowed sine burst
    Monochromatic,
    /// Piecewise-constant text encoding
    Text,
}

impl MessageKind {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Monochromatic => "monochromatic",
            Self::Text => "text",
        }
    }
}

/// Outcome of one scheme on one message.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeReport {
    /// Scheme under test
    pub scheme: SchemeKind,
    /// Message that was hidden
    pub message: MessageKind,
    /// RMS error of the legitimate decryption
    pub decrypt_error: f64,
    /// RMS error of the adversary's estimate
    pub attack_error: f64,
    /// Correlation between the adversary's estimate and the message
    pub attack_correlation: Option<f64>,
    /// Imaginary residue of spectral decryption, if the scheme has one
    pub residue: Option<SpectralResidue>,
    /// Conditioning of the divided carrier spectrum, if the scheme has one
    pub conditioning: Option<SpectralConditioning>,
    /// Text read back from the decrypted signal (text messages only)
    pub recovered_text: Option<String>,
    /// Percentage of correctly recovered characters (text messages only)
    pub text_fidelity: Option<f64>,
}

impl SchemeReport {
    /// Returns true if the decryption reported a numerical anomaly.
    pub fn is_anomalous(&self) -> bool {
        self.residue.is_some_and(|r| r.is_anomalous())
            || self.conditioning.is_some_and(|c| c.is_ill_conditioned())
    }
}

/// Dominant frequency of one signal of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSummary {
    /// Which signal
    pub signal: &'static str,
    /// Strongest non-DC frequency
    pub dominant_hz: Option<f64>,
}

/// Results of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentReport {
    /// Samples per signal
    pub samples: usize,
    /// Original text message
    pub text: String,
    /// One entry per (message, scheme) pair
    pub schemes: Vec<SchemeReport>,
    /// Spectral summary of carrier and messages
    pub spectra: Vec<SpectrumSummary>,
}

impl ExperimentReport {
    /// Entry for a given message and scheme.
    pub fn get(&self, message: MessageKind, scheme: SchemeKind) -> Option<&SchemeReport> {
        self.schemes.iter().find(|r| r.message == message && r.scheme == scheme)
    }

    /// Write the report to the log.
    pub fn log(&self) {
        tracing::info!(samples = self.samples, "experiment finished");

        for report in &self.schemes {
            tracing::info!(
                message = report.message.name(),
                scheme = %report.scheme,
                shared_key = report.scheme.requires_shared_key(),
                decrypt_error = report.decrypt_error,
                attack_error = report.attack_error,
                attack_correlation = report.attack_correlation.unwrap_or(f64::NAN),
                "scheme result"
            );
            if report.is_anomalous() {
                tracing::warn!(
                    message = report.message.name(),
                    scheme = %report.scheme,
                    conditioning = report.conditioning.map_or(f64::NAN, |c| c.ratio()),
                    "decryption is numerically unreliable"
                );
            }
            let text = (&report.recovered_text, report.text_fidelity);
            if let (Some(recovered), Some(fidelity)) = text {
                tracing::info!(
                    scheme = %report.scheme,
                    original = %self.text,
                    recovered = %recovered,
                    fidelity,
                    "text recovery"
                );
            }
        }

        for summary in &self.spectra {
            match summary.dominant_hz {
                Some(hz) => tracing::info!(signal = summary.signal, dominant_hz = hz, "spectrum"),
                None => tracing::info!(signal = summary.signal, "spectrum has no energy"),
            }
        }
    }
}

/// Run every scheme on both messages.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport, ExperimentError> {
    let key = config.carrier_key()?;
    let grid = config.time_grid();
    if grid.len() < 2 {
        return Err(ExperimentError::EmptyTimeGrid {
            t_start: config.t_start,
            t_end: config.t_end,
            dt: config.dt,
        });
    }

    tracing::info!(samples = grid.len(), method = %key.solver().method(), "generating carrier");
    let trajectory = solve_carrier(&key, (config.t_start, config.t_end), config.dt)?;
    let times = trajectory.times();
    let carrier = trajectory.carrier();

    let codec = TextCodec::new(config.message_center, config.steps_per_symbol);
    let messages = [
        (
            MessageKind::Monochromatic,
            monochromatic(times, config.amplitude, config.omega, config.message_center),
        ),
        (MessageKind::Text, codec.encode_text(&config.text, times)),
    ];

    let runner = SchemeRunner {
        config,
        times,
        carrier: &carrier,
        sync: SynchronizationScheme::new(
            config.receiver_state,
            config.lorenz_params()?,
            config.solver_settings()?,
        ),
        convolution: PceConvolution::with_epsilon(config.epsilon),
        adversary: SpectralAdversary::new(config.cutoff_hz),
    };

    let mut schemes = Vec::with_capacity(messages.len() * SchemeKind::ALL.len());
    for (kind, message) in &messages {
        for scheme in SchemeKind::ALL {
            let text_codec = (*kind == MessageKind::Text).then_some(&codec);
            schemes.push(runner.run(scheme, *kind, message, text_codec)?);
        }
    }

    let mut spectra = vec![SpectrumSummary {
        signal: "carrier",
        dominant_hz: dominant_frequency(&carrier, config.dt)?,
    }];
    for (kind, message) in &messages {
        spectra.push(SpectrumSummary {
            signal: kind.name(),
            dominant_hz: dominant_frequency(message, config.dt)?,
        });
    }

    Ok(ExperimentReport { samples: times.len(), text: config.text.clone(), schemes, spectra })
}

/// Shared inputs of every scheme run.
struct SchemeRunner<'a> {
    config: &'a ExperimentConfig,
    times: &'a [f64],
    carrier: &'a ScalarSignal,
    sync: SynchronizationScheme,
    convolution: PceConvolution,
    adversary: SpectralAdversary,
}

/// Encrypted and decrypted signals of one run.
struct Transmission {
    wire: ScalarSignal,
    recovered: ScalarSignal,
    residue: Option<SpectralResidue>,
    conditioning: Option<SpectralConditioning>,
}

impl SchemeRunner<'_> {
    fn transmit(
        &self,
        scheme: SchemeKind,
        message: &[f64],
    ) -> Result<Transmission, ExperimentError> {
        match scheme {
            SchemeKind::Synchronization => {
                let wire = self.sync.encrypt(self.carrier, message)?;
                let reconstructed = self.sync.reconstruct_carrier(&wire, self.times)?;
                let recovered = self.sync.decrypt(&wire, &reconstructed)?;
                Ok(Transmission { wire, recovered, residue: None, conditioning: None })
            },
            SchemeKind::PceAddition => {
                let wire = PceAddition.encrypt(self.carrier, message)?;
                let recovered = PceAddition.decrypt(&wire, self.carrier)?;
                Ok(Transmission { wire, recovered, residue: None, conditioning: None })
            },
            SchemeKind::PceConvolution => {
                let wire = self.convolution.encrypt(self.carrier, message)?;
                let epsilon = self.convolution.epsilon;
                let out = pce_convolve_decrypt_with_residue(&wire, self.carrier, epsilon)?;
                Ok(Transmission {
                    wire,
                    recovered: out.message,
                    residue: Some(out.residue),
                    conditioning: Some(out.conditioning),
                })
            },
        }
    }

    fn run(
        &self,
        scheme: SchemeKind,
        kind: MessageKind,
        message: &[f64],
        codec: Option<&TextCodec>,
    ) -> Result<SchemeReport, ExperimentError> {
        let transmission = self.transmit(scheme, message)?;
        let estimate = self.adversary.estimate(&transmission.wire, self.config.dt)?;

        let recovered_text =
            codec.map(|codec| codec.decode_text(&transmission.recovered, self.times));
        let fidelity =
            recovered_text.as_deref().map(|text| text_fidelity(&self.config.text, text));

        Ok(SchemeReport {
            scheme,
            message: kind,
            decrypt_error: rms_error(message, &transmission.recovered)?,
            attack_error: rms_error(message, &estimate)?,
            attack_correlation: pearson_correlation(message, &estimate)?,
            residue: transmission.residue,
            conditioning: transmission.conditioning,
            recovered_text,
            text_fidelity: fidelity,
        })
    }
}
