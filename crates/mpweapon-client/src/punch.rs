// punch.rs — limit how far a view punch can push the view angles

use mpweapon_common::q_shared::Vec3;

/// Adjust `input` so that `input + punch` stays within `[-clip, clip]` on
/// every axis. Axes already in range are left untouched.
pub fn clip_punch_angle_offset(input: &mut Vec3, punch: &Vec3, clip: &Vec3) {
    for i in 0..3 {
        let mut fin = input[i] + punch[i];
        if fin > clip[i] {
            fin = clip[i];
        } else if fin < -clip[i] {
            fin = -clip[i];
        }
        input[i] = fin - punch[i];
    }
}
