use nalgebra::{UnitQuaternion, Vector3};
use smplx_anim_core::{container, AnimationClip, FrameSample, Gender, PosesLayout};
use smplx_anim_player::{ClipPlayer, LoopMode, PoseSink};

#[derive(Default)]
struct RecordingSink {
    rotations: Vec<(String, UnitQuaternion<f32>)>,
    translation: Option<Vector3<f32>>,
}

impl PoseSink for RecordingSink {
    fn set_local_rotation(&mut self, joint: &str, rotation: UnitQuaternion<f32>) {
        self.rotations.push((joint.to_string(), rotation));
    }

    fn set_root_translation(&mut self, translation: Vector3<f32>) {
        self.translation = Some(translation);
    }
}

fn test_clip() -> AnimationClip {
    let mut clip =
        AnimationClip::new(Gender::Neutral, 30.0, vec![0.0; 16], PosesLayout::Compact).unwrap();
    for i in 0..3 {
        let mut sample = FrameSample::zeroed(i);
        sample.trans = Vector3::new(i as f32 * 0.1, 1.0, 0.0);
        // left_hip bends a little more each frame.
        sample.body[0] = Vector3::new(0.2 + 0.1 * i as f32, 0.0, 0.0);
        clip.frames.push(sample);
    }
    clip
}

#[test]
fn apply_pushes_every_distinct_joint_once() {
    let player = ClipPlayer::new(test_clip()).unwrap();
    let mut sink = RecordingSink::default();
    player.apply(&mut sink);

    // root + 21 body + 30 hand + 3 face.
    assert_eq!(sink.rotations.len(), 55);
    assert_eq!(sink.rotations[0].0, "pelvis");
    assert_eq!(sink.rotations[1].0, "left_hip");
    assert_eq!(sink.rotations[54].0, "right_eye_smplhf");
    assert_eq!(sink.translation, Some(Vector3::new(0.0, 1.0, 0.0)));

    let mut seen = std::collections::HashSet::new();
    assert!(sink.rotations.iter().all(|(name, _)| seen.insert(name.clone())));
}

#[test]
fn applied_rotation_matches_authored_axis_angle() {
    let mut player = ClipPlayer::new(test_clip()).unwrap();
    player.play();
    player.advance(0.04);
    assert_eq!(player.current_frame(), 1);

    let mut sink = RecordingSink::default();
    player.apply(&mut sink);
    let (_, hip) = &sink.rotations[1];
    let expected = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
    assert!(hip.angle_to(&expected) < 1e-5);
    assert_eq!(sink.translation, Some(Vector3::new(0.1, 1.0, 0.0)));
}

#[test]
fn player_round_trips_through_container_file() {
    let clip = test_clip();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walk.sxa");
    container::write_clip(&path, &clip).unwrap();

    let mut player = ClipPlayer::from_file(&path).unwrap();
    assert_eq!(player.clip().len(), 3);
    player.set_loop_mode(LoopMode::Loop);
    player.play();

    // Full cycle: 3 frames at 30 fps wrap back to frame 0.
    assert_eq!(player.advance(0.1), 0);
}
