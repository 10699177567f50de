//! Integration tests for the timeline subsystem.
//!
//! Exercises cross-crate interactions between reelcut-core configuration,
//! the reelcut-timeline store, clock and editor session.

use proptest::prelude::*;
use reelcut_core::{EditorConfig, Point, RangePolicy, ReelcutError, Size, TimeSpan, VideoSource};
use reelcut_timeline::{
    active_subtitles, parse_numeric, AudioKind, AudioPatch, AudioSegment, ClockState, DropOutcome,
    EditorSession, EntityStore, Gesture, ImageOverlay, Layer, MediaElement, OverlayPatch,
    SegmentPatch, Subtitle, SubtitlePatch, VideoSegment,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

#[derive(Default)]
struct FakeMedia {
    time: f64,
    playing: bool,
}

impl MediaElement for FakeMedia {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, time: f64) {
        self.time = time;
    }
}

fn session_with(config: EditorConfig) -> EditorSession {
    EditorSession::new(
        config,
        vec![VideoSource::new("blob:main", "main.mp4", Some(60.0))],
    )
}

/// Segments `[A:0-15, B:15-30, C:30-45]`.
fn abc(session: &mut EditorSession, media: &mut FakeMedia) -> [Uuid; 3] {
    let mut ids = [Uuid::nil(); 3];
    for (slot, start) in ids.iter_mut().zip([0.0, 15.0, 30.0]) {
        session.seek(start, media);
        let id = session.add_segment().unwrap();
        session
            .update::<VideoSegment>(
                id,
                &SegmentPatch {
                    end_time: Some(start + 15.0),
                    ..Default::default()
                },
            )
            .unwrap();
        *slot = id;
    }
    ids
}

fn segment_order(session: &EditorSession) -> Vec<Uuid> {
    session.store().segments().iter().map(|s| s.id).collect()
}

// ── Reordering ─────────────────────────────────────────────────

#[test]
fn drag_first_segment_onto_last() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    let [a, b, c] = abc(&mut session, &mut media);

    session.start_segment_drag(a).unwrap();
    assert!(session.segment_drag_over());
    assert!(session.drop_segment(c).moved());
    assert_eq!(segment_order(&session), vec![b, c, a]);

    let spans: Vec<_> = session
        .store()
        .segments()
        .iter()
        .map(|s| (s.start_time, s.end_time))
        .collect();
    assert_eq!(spans, vec![(15.0, 30.0), (30.0, 45.0), (0.0, 15.0)]);
}

#[test]
fn reorder_noops_and_undo() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    let ids = abc(&mut session, &mut media);

    assert_eq!(session.drop_segment(ids[1]), DropOutcome::NoDrag);
    session.start_segment_drag(ids[1]).unwrap();
    assert_eq!(session.drop_segment(ids[1]), DropOutcome::SameTarget);
    assert_eq!(session.active_gesture(), None);
    assert_eq!(segment_order(&session), ids.to_vec());

    session.start_segment_drag(ids[2]).unwrap();
    session.drop_segment(ids[0]);
    assert_eq!(segment_order(&session), vec![ids[2], ids[0], ids[1]]);
    assert!(session.undo());
    assert_eq!(segment_order(&session), ids.to_vec());
}

// ── Composition ────────────────────────────────────────────────

#[test]
fn subtitle_boundaries_are_inclusive() {
    let mut store = EntityStore::default();
    store
        .add(Subtitle::new("Hello", TimeSpan::new(5.0, 10.0)))
        .unwrap();

    assert_eq!(active_subtitles(store.subtitles(), 5.0).len(), 1);
    assert_eq!(active_subtitles(store.subtitles(), 10.0).len(), 1);
    assert!(active_subtitles(store.subtitles(), 10.01).is_empty());
}

#[test]
fn later_overlays_paint_above_earlier_ones() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    session.seek(2.0, &mut media);
    let under = session.add_overlay("under.png").unwrap();
    let over = session.add_overlay("over.png").unwrap();
    let caption = session.add_subtitle().unwrap();

    let comp = session.composition();
    let order: Vec<Option<Uuid>> = comp
        .layers()
        .map(|layer| match layer {
            Layer::Video => None,
            Layer::Overlay(o) => Some(o.id),
            Layer::Subtitle(s) => Some(s.id),
        })
        .collect();
    assert_eq!(order, vec![None, Some(under), Some(over), Some(caption)]);
}

// ── Validation policy ──────────────────────────────────────────

#[test]
fn inverted_ranges_rejected_by_default() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    let [a, ..] = abc(&mut session, &mut media);

    let err = session
        .update::<VideoSegment>(
            a,
            &SegmentPatch {
                end_time: Some(-1.0),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ReelcutError::InvalidRange { .. }));
    assert_eq!(session.store().get::<VideoSegment>(a).unwrap().end_time, 15.0);
}

#[test]
fn clamp_policy_from_config_json() {
    let config = EditorConfig::from_json(br#"{"range_policy": "clamp"}"#).unwrap();
    let mut session = session_with(config);
    let id = session.add_subtitle().unwrap();

    session
        .update::<Subtitle>(
            id,
            &SubtitlePatch {
                start_time: Some(-3.0),
                end_time: Some(90.0),
                ..Default::default()
            },
        )
        .unwrap();
    let sub = session.store().get::<Subtitle>(id).unwrap();
    assert_eq!((sub.start_time, sub.end_time), (0.0, 60.0));
}

#[test]
fn permit_policy_stores_legacy_ranges() {
    let config = EditorConfig {
        range_policy: RangePolicy::Permit,
        ..EditorConfig::default()
    };
    let mut session = session_with(config);
    let id = session.add_overlay("a.png").unwrap();
    session
        .update::<ImageOverlay>(
            id,
            &OverlayPatch {
                start_time: Some(8.0),
                end_time: Some(2.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(session.store().get::<ImageOverlay>(id).unwrap().start_time, 8.0);
}

#[test]
fn field_editor_text_is_coerced() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    session.seek(0.0, &mut media);
    let audio = session.add_audio(AudioKind::Main).unwrap();

    let volume = parse_numeric(" 2.5 ").unwrap();
    session
        .update::<AudioSegment>(
            audio,
            &AudioPatch {
                volume: Some(volume),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        session
            .store()
            .get::<AudioSegment>(audio)
            .unwrap()
            .volume,
        1.0
    );
    assert!(matches!(
        parse_numeric("loud"),
        Err(ReelcutError::InvalidParameter(_))
    ));
    assert_eq!(parse_numeric("").unwrap(), 0.0);
}

// ── Playback and gestures ──────────────────────────────────────

#[test]
fn time_reports_ignored_while_scrubbing() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    session.play(&mut media);

    session.begin_scrub(&mut media).unwrap();
    assert!(!media.playing);
    let t = session.scrub_to(25.0, 100.0, &mut media).unwrap();
    assert_eq!(t, 15.0);
    assert!(!session.on_time_update(3.0));
    assert_eq!(session.clock().current_time(), 15.0);

    session.end_scrub(&mut media);
    assert_eq!(session.clock().state(), ClockState::Playing);
    assert!(media.playing);
    assert_eq!(media.time, 15.0);
}

#[test]
fn overlay_drag_blocks_other_gestures_until_leave() {
    let mut media = FakeMedia::default();
    let mut session = session_with(EditorConfig::default());
    let [a, ..] = abc(&mut session, &mut media);
    session.seek(0.0, &mut media);
    let logo = session.add_overlay("logo.png").unwrap();

    assert!(session.press_overlay(logo, Point::new(0.0, 0.0)).unwrap());
    assert_eq!(session.active_gesture(), Some(Gesture::OverlayDrag));
    assert!(matches!(
        session.start_segment_drag(a),
        Err(ReelcutError::GestureInProgress(_))
    ));
    session.drag_overlay(Point::new(-1000.0, 0.0), Size::new(800.0, 450.0));
    session.leave_overlay();

    assert_eq!(session.active_gesture(), None);
    let overlay = session.store().get::<ImageOverlay>(logo).unwrap();
    assert_eq!(overlay.position.x, 0.0);
    assert!(session.start_segment_drag(a).is_ok());
}

#[test]
fn switching_source_is_a_hard_reset() {
    let mut media = FakeMedia::default();
    let mut session = EditorSession::new(
        EditorConfig::default(),
        vec![
            VideoSource::new("blob:a", "a.mp4", Some(60.0)),
            VideoSource::new("blob:b", "b.mp4", Some(12.0)),
        ],
    );
    session.seek(40.0, &mut media);
    session.play(&mut media);

    assert!(session.select_video(1, &mut media));
    assert_eq!(session.clock().current_time(), 0.0);
    assert_eq!(session.clock().duration(), 12.0);
    assert!(!media.playing);

    let id = session.add_segment().unwrap();
    let seg = session.store().get::<VideoSegment>(id).unwrap();
    assert_eq!(seg.source_index, 1);
    assert_eq!(seg.end_time, 10.0);
}

proptest! {
    #[test]
    fn seek_always_clamped(t in proptest::num::f64::ANY) {
        let mut media = FakeMedia::default();
        let mut session = session_with(EditorConfig::default());
        let result = session.seek(t, &mut media);
        prop_assert!(!result.is_nan());
        prop_assert!((0.0..=60.0).contains(&result));
    }

    #[test]
    fn drops_are_permutations(from in 0usize..3, to in 0usize..3) {
        let mut media = FakeMedia::default();
        let mut session = session_with(EditorConfig::default());
        let ids = abc(&mut session, &mut media);
        session.start_segment_drag(ids[from]).unwrap();
        session.drop_segment(ids[to]);

        let mut order = segment_order(&session);
        order.sort();
        let mut expected = ids.to_vec();
        expected.sort();
        prop_assert_eq!(order, expected);
    }
}
