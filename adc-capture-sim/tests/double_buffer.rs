//! Deterministic double-buffer protocol tests, driven by the hand-cranked
//! sampling unit: the feeding thread plays the interrupt context.

use std::sync::Arc;

use parking_lot::Mutex;

use adc_capture_core::{
    AdcSampler, BufferId, CaptureConfig, CaptureError, ChannelSet, CompletionCallback,
    EngineState,
};
use adc_capture_sim::ManualAdc;

type Events = Arc<Mutex<Vec<(BufferId, Vec<u8>)>>>;

fn recording_observer(events: &Events) -> CompletionCallback<u8> {
    let events = Arc::clone(events);
    Arc::new(move |id, samples: &[u8]| {
        events.lock().push((id, samples.to_vec()));
    })
}

fn sampler(depth: usize) -> (Arc<ManualAdc<u8>>, AdcSampler<u8, ManualAdc<u8>>, Events) {
    let adc = Arc::new(ManualAdc::new());
    let config = CaptureConfig::new(ChannelSet::new([0, 1]).unwrap()).with_depth(depth);
    let sampler = AdcSampler::new(Arc::clone(&adc), config).unwrap();
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    sampler.on_sampling_complete(recording_observer(&events));
    (adc, sampler, events)
}

#[test]
fn twelve_samples_complete_a_b_a() {
    let (adc, mut sampler, events) = sampler(4);
    sampler.start_capture().unwrap();

    let samples: Vec<u8> = (0..12).collect();
    assert_eq!(adc.feed(&samples), 12);

    let events = events.lock();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], (BufferId::A, vec![0, 1, 2, 3]));
    assert_eq!(events[1], (BufferId::B, vec![4, 5, 6, 7]));
    assert_eq!(events[2], (BufferId::A, vec![8, 9, 10, 11]));

    // Buffer A now holds the last window, in arrival order.
    assert_eq!(sampler.read_buffer(BufferId::A).unwrap(), vec![8, 9, 10, 11]);
}

#[test]
fn identity_never_repeats_consecutively() {
    let (adc, mut sampler, events) = sampler(2);
    sampler.start_capture().unwrap();

    let samples: Vec<u8> = (0..20).collect();
    adc.feed(&samples);

    let events = events.lock();
    assert_eq!(events.len(), 10);
    assert_eq!(events[0].0, BufferId::A);
    for pair in events.windows(2) {
        assert_ne!(pair[0].0, pair[1].0);
    }
}

#[test]
fn depth_one_completes_after_every_sample() {
    let (adc, mut sampler, events) = sampler(1);
    sampler.start_capture().unwrap();

    adc.feed(&[7, 8, 9]);

    let events = events.lock();
    assert_eq!(
        *events,
        vec![
            (BufferId::A, vec![7]),
            (BufferId::B, vec![8]),
            (BufferId::A, vec![9]),
        ]
    );
}

#[test]
fn stop_start_keeps_buffers_and_restarts_alternation() {
    let (adc, mut sampler, events) = sampler(4);
    sampler.start_capture().unwrap();
    adc.feed(&(0..4).collect::<Vec<u8>>());

    let before = adc.leg_targets().unwrap();

    sampler.stop_capture().unwrap();
    assert_eq!(sampler.state(), EngineState::Stopped);
    assert_eq!(adc.feed(&[99]), 0);

    sampler.start_capture().unwrap();
    assert_eq!(sampler.state(), EngineState::Running);
    adc.feed(&(10..18).collect::<Vec<u8>>());

    let after = adc.leg_targets().unwrap();
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(Arc::ptr_eq(&before[1], &after[1]));

    let events = events.lock();
    assert_eq!(events.len(), 3);
    // Restart re-issues the armed → running sequence: leg A fills first.
    assert_eq!(events[1], (BufferId::A, vec![10, 11, 12, 13]));
    assert_eq!(events[2], (BufferId::B, vec![14, 15, 16, 17]));
}

#[test]
fn observer_replacement_never_hits_both() {
    let (adc, mut sampler, _events) = sampler(2);
    sampler.start_capture().unwrap();

    let old: Events = Arc::new(Mutex::new(Vec::new()));
    let new: Events = Arc::new(Mutex::new(Vec::new()));
    sampler.on_sampling_complete(recording_observer(&old));

    adc.feed(&[1, 2]);
    sampler.on_sampling_complete(recording_observer(&new));
    adc.feed(&[3, 4]);

    assert_eq!(old.lock().len(), 1);
    assert_eq!(new.lock().len(), 1);
    assert_eq!(new.lock()[0].0, BufferId::B);
}

#[test]
fn teardown_never_notifies_afterwards() {
    let (adc, mut sampler, events) = sampler(4);
    sampler.start_capture().unwrap();
    adc.feed(&[1, 2]);

    sampler.teardown();
    assert_eq!(sampler.state(), EngineState::TornDown);

    // A completion signal that was pending at teardown, then more samples.
    adc.raise_completion(BufferId::A);
    assert_eq!(adc.feed(&[3, 4, 5, 6]), 0);
    assert!(events.lock().is_empty());
}

#[test]
fn missing_observer_skips_notification_not_the_swap() {
    let adc = Arc::new(ManualAdc::new());
    let config = CaptureConfig::new(ChannelSet::new([0]).unwrap()).with_depth(2);
    let mut sampler = AdcSampler::<u8, _>::new(Arc::clone(&adc), config).unwrap();
    sampler.start_capture().unwrap();

    adc.feed(&[1, 2, 3, 4]);

    let diag = sampler.diagnostics();
    assert_eq!(diag.completions_a, 1);
    assert_eq!(diag.completions_b, 1);
    assert_eq!(diag.unobserved_completions, 2);
    assert_eq!(diag.samples_delivered, 0);
}

#[test]
fn exhausted_transfer_legs_fail_construction() {
    let adc = Arc::new(ManualAdc::<u8>::with_free_legs(1));
    let config = CaptureConfig::new(ChannelSet::new([0]).unwrap()).with_depth(4);
    assert!(matches!(
        AdcSampler::new(adc, config),
        Err(CaptureError::ResourceExhaustion(_))
    ));
}

#[test]
fn configuration_errors_surface_synchronously() {
    assert!(ChannelSet::new(Vec::new()).is_err());
    assert!(ChannelSet::new([1, 1]).is_err());

    let adc = Arc::new(ManualAdc::<u8>::new());
    let config = CaptureConfig::new(ChannelSet::new([0]).unwrap()).with_depth(0);
    assert!(matches!(
        AdcSampler::new(Arc::clone(&adc), config),
        Err(CaptureError::Configuration(_))
    ));

    // Channel id beyond the unit's addressable space is rejected, not
    // silently truncated.
    let config = CaptureConfig::new(ChannelSet::new([0, 6]).unwrap()).with_depth(4);
    assert!(matches!(
        AdcSampler::new(adc, config),
        Err(CaptureError::Configuration(_))
    ));
}

#[test]
fn configure_programs_mask_and_transfer_size() {
    let (adc, _sampler, _events) = sampler(4);
    assert_eq!(adc.round_robin_mask(), 0b11);
    assert_eq!(adc.transfer_unit_bytes(), 1);

    let wide = Arc::new(ManualAdc::<u16>::new());
    let config = CaptureConfig::new(ChannelSet::new([0]).unwrap()).with_depth(4);
    let _sampler = AdcSampler::new(Arc::clone(&wide), config).unwrap();
    assert_eq!(wide.transfer_unit_bytes(), 2);
}

#[test]
fn diagnostics_track_delivered_samples() {
    let (adc, mut sampler, _events) = sampler(4);
    sampler.start_capture().unwrap();
    adc.feed(&(0..12).collect::<Vec<u8>>());

    let diag = sampler.diagnostics();
    assert_eq!(diag.completions(), 3);
    assert_eq!(diag.samples_delivered, 12);
}
