//! Synthetic jump-shot generator shared by the integration tests
//!
//! Produces a right-handed shot at 30 fps. Joint positions are solved from
//! target angles, so the analyzer should read back what was put in:
//!
//! - f0..=7   hand sinks into the dip
//! - f8..=11  set point, hand static
//! - f12..=21 upward drive, velocity rising every frame
//! - f22..    follow-through, hand decelerates to a stop by f26

#![allow(dead_code)]

use shot_form::bridge::{
    Detection, Frame, FrameInput, Keypoint, Landmark, LandmarkSet, POSE_LANDMARK_COUNT,
    VALUES_WITH_VISIBILITY,
};

pub const FPS: f64 = 30.0;
pub const SHOT_FRAMES: u64 = 40;

const SHOULDER: (f32, f32) = (0.5, 0.4);
const HIP: (f32, f32) = (0.5, 0.6);
const OFF_HIP: (f32, f32) = (0.45, 0.6);
const UPPER_ARM: f32 = 0.15;
const SHIN: f32 = 0.15;
const HAND: f32 = 0.05;
const VISIBILITY: f32 = 0.9;

/// Shape parameters of a generated shot
#[derive(Clone, Copy, Debug)]
pub struct ShotProfile {
    /// Elbow angle never exceeds this before the follow-through
    pub release_elbow_max: f32,
    /// Knee angle at the bottom of the dip (f9)
    pub deepest_knee: f32,
    /// Follow-through frames the wrist stays flexed before snapping back
    pub wrist_hold_frames: u64,
}

impl ShotProfile {
    pub fn clean() -> Self {
        Self {
            release_elbow_max: 180.0,
            deepest_knee: 120.0,
            wrist_hold_frames: SHOT_FRAMES,
        }
    }

    /// Flared elbow (156), shallow dip (150), 3-frame follow-through
    pub fn flawed() -> Self {
        Self {
            release_elbow_max: 156.0,
            deepest_knee: 150.0,
            wrist_hold_frames: 3,
        }
    }

    /// Wrist height above the shoulder, image units
    pub fn hand_rise(&self, f: u64) -> f32 {
        let top = 0.065 + 0.0018 * 100.0;
        match f {
            0..=7 => 0.10 - 0.005 * f as f32,
            8..=11 => 0.065,
            12..=21 => 0.065 + 0.0018 * ((f - 11) * (f - 11)) as f32,
            22 => top + 0.027,
            23 => top + 0.042,
            24 => top + 0.048,
            _ => top + 0.050,
        }
    }

    pub fn elbow(&self, f: u64) -> f32 {
        match f {
            0..=11 => 90.0,
            12..=21 => (89.0 + (f - 11) as f32 * 9.0).min(self.release_elbow_max),
            _ => 176.0,
        }
    }

    pub fn knee(&self, f: u64) -> f32 {
        if f <= 9 {
            165.0 - (165.0 - self.deepest_knee) * f as f32 / 9.0
        } else {
            (self.deepest_knee + 4.0 * (f - 9) as f32).min(175.0)
        }
    }

    pub fn wrist(&self, f: u64) -> f32 {
        match f {
            0..=19 => 120.0,
            20 => 150.0,
            21 => 175.0,
            _ if f - 22 < self.wrist_hold_frames => 130.0,
            _ => 175.0,
        }
    }

    pub fn landmarks(&self, f: u64) -> LandmarkSet {
        let lm = |(x, y): (f32, f32)| Landmark::new(x, y, 0.0, VISIBILITY);

        let h = self.hand_rise(f);
        let d = 2.0 * UPPER_ARM * (self.elbow(f).to_radians() / 2.0).sin();
        let wrist = (SHOULDER.0 + (d * d - h * h).max(0.0).sqrt(), SHOULDER.1 - h);
        let elbow = elbow_position(SHOULDER, wrist, UPPER_ARM);

        let forearm = unit((wrist.0 - elbow.0, wrist.1 - elbow.1));
        let hand = rotate(forearm, 180.0 - self.wrist(f));
        let index = (wrist.0 + HAND * hand.0, wrist.1 + HAND * hand.1);

        let (knee, ankle) = leg(HIP, self.knee(f));
        let (off_knee, off_ankle) = leg(OFF_HIP, self.knee(f));

        LandmarkSet::new()
            .with(Keypoint::RightShoulder, lm(SHOULDER))
            .with(Keypoint::RightElbow, lm(elbow))
            .with(Keypoint::RightWrist, lm(wrist))
            .with(Keypoint::RightIndex, lm(index))
            .with(Keypoint::RightHip, lm(HIP))
            .with(Keypoint::RightKnee, lm(knee))
            .with(Keypoint::RightAnkle, lm(ankle))
            .with(Keypoint::LeftHip, lm(OFF_HIP))
            .with(Keypoint::LeftKnee, lm(off_knee))
            .with(Keypoint::LeftAnkle, lm(off_ankle))
    }

    pub fn frame(&self, f: u64) -> Frame {
        Frame::new(f, f as f64 / FPS)
    }

    pub fn frames(&self) -> Vec<FrameInput> {
        (0..SHOT_FRAMES)
            .map(|f| FrameInput::new(self.frame(f), Detection::Present(self.landmarks(f))))
            .collect()
    }
}

fn unit(v: (f32, f32)) -> (f32, f32) {
    let len = (v.0 * v.0 + v.1 * v.1).sqrt();
    (v.0 / len, v.1 / len)
}

fn rotate(v: (f32, f32), degrees: f32) -> (f32, f32) {
    let (s, c) = degrees.to_radians().sin_cos();
    (v.0 * c - v.1 * s, v.0 * s + v.1 * c)
}

/// Two-bone IK: joint equidistant (`bone`) from both ends, bent downward
fn elbow_position(root: (f32, f32), tip: (f32, f32), bone: f32) -> (f32, f32) {
    let (dx, dy) = (tip.0 - root.0, tip.1 - root.1);
    let d = (dx * dx + dy * dy).sqrt();
    let mid = (root.0 + dx / 2.0, root.1 + dy / 2.0);
    let offset = (bone * bone - d * d / 4.0).max(0.0).sqrt();
    let (ux, uy) = (dx / d, dy / d);
    // Perpendicular pointing down the image
    let perp = if ux >= 0.0 { (-uy, ux) } else { (uy, -ux) };
    (mid.0 + offset * perp.0, mid.1 + offset * perp.1)
}

/// Knee straight below the hip, ankle placed for the requested knee angle
fn leg(hip: (f32, f32), knee_angle: f32) -> ((f32, f32), (f32, f32)) {
    let knee = (hip.0, hip.1 + SHIN);
    let shin = rotate((0.0, 1.0), 180.0 - knee_angle);
    (knee, (knee.0 + SHIN * shin.0, knee.1 + SHIN * shin.1))
}

/// Flatten a landmark set into a 33x4 MediaPipe array; absent keypoints are zeros
pub fn to_flat(set: &LandmarkSet) -> Vec<f32> {
    let mut data = vec![0.0; POSE_LANDMARK_COUNT * VALUES_WITH_VISIBILITY];
    for (keypoint, l) in set.iter() {
        let base = keypoint.mediapipe_index() * VALUES_WITH_VISIBILITY;
        data[base..base + VALUES_WITH_VISIBILITY].copy_from_slice(&[l.x, l.y, l.z, l.confidence]);
    }
    data
}

/// JSON-lines dump of a shot
pub fn to_json_lines(profile: &ShotProfile) -> String {
    (0..SHOT_FRAMES)
        .map(|f| {
            serde_json::json!({
                "frame_index": f,
                "timestamp": f as f64 / FPS,
                "landmarks": to_flat(&profile.landmarks(f)),
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
