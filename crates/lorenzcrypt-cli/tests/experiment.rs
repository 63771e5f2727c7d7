//! End-to-end experiment tests
//!
//! A short run exercises every scheme on both messages. Exact schemes must
//! recover the text perfectly; configuration mistakes must surface before
//! any integration work.

use lorenzcrypt_cli::{ExperimentConfig, ExperimentError, MessageKind, run_experiment};
use lorenzcrypt_core::SchemeKind;

fn short_config() -> ExperimentConfig {
    ExperimentConfig {
        t_end: 20.0,
        dt: 0.01,
        message_center: 10.0,
        text: "Hi".to_string(),
        steps_per_symbol: 10,
        cutoff_hz: 5.0,
        ..Default::default()
    }
}

#[test]
fn every_scheme_runs_on_both_messages() {
    let report = run_experiment(&short_config()).unwrap();

    assert_eq!(report.samples, 2000);
    assert_eq!(report.schemes.len(), 6);
    for message in [MessageKind::Monochromatic, MessageKind::Text] {
        for scheme in SchemeKind::ALL {
            assert!(report.get(message, scheme).is_some(), "{} / {scheme}", message.name());
        }
    }
}

#[test]
fn addition_recovers_messages_exactly() {
    let report = run_experiment(&short_config()).unwrap();

    let burst = report.get(MessageKind::Monochromatic, SchemeKind::PceAddition).unwrap();
    assert!(burst.decrypt_error < 1e-12, "decrypt error {}", burst.decrypt_error);

    let text = report.get(MessageKind::Text, SchemeKind::PceAddition).unwrap();
    assert_eq!(text.recovered_text.as_deref(), Some("Hi"));
    assert_eq!(text.text_fidelity, Some(100.0));
}

#[test]
fn only_text_reports_carry_text() {
    let report = run_experiment(&short_config()).unwrap();

    for entry in &report.schemes {
        let is_text = entry.message == MessageKind::Text;
        assert_eq!(entry.recovered_text.is_some(), is_text);
        assert_eq!(entry.text_fidelity.is_some(), is_text);
        assert_eq!(entry.residue.is_some(), entry.scheme == SchemeKind::PceConvolution);
        assert_eq!(entry.conditioning.is_some(), entry.scheme == SchemeKind::PceConvolution);
        if entry.scheme != SchemeKind::PceConvolution {
            assert!(!entry.is_anomalous());
        }
    }
}

#[test]
fn spectra_cover_carrier_and_messages() {
    let report = run_experiment(&short_config()).unwrap();

    let names: Vec<_> = report.spectra.iter().map(|s| s.signal).collect();
    assert_eq!(names, ["carrier", "monochromatic", "text"]);
    assert!(report.spectra.iter().all(|s| s.dominant_hz.is_some()));
}

#[test]
fn unsupported_method_is_config_error() {
    let config = ExperimentConfig { method: "DOP853".to_string(), ..short_config() };

    let err = run_experiment(&config).unwrap_err();
    assert!(err.is_config_error());
    assert!(matches!(err, ExperimentError::Config(_)));
}

#[test]
fn reversed_span_is_config_error() {
    let config = ExperimentConfig { t_start: 20.0, t_end: 0.0, ..short_config() };

    let err = run_experiment(&config).unwrap_err();
    assert!(matches!(err, ExperimentError::EmptyTimeGrid { .. }));
}
