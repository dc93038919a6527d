//! Optical pose estimation from lighthouse sweep timings

pub mod homography;

pub use homography::{
    estimate_pose, form_a, pose_from_projections, quaternion_from_rotation, rt_from_h,
    solve_for_h, ticks_to_2d, HomographyMatrix, HomographyVector, PoseError, PoseEstimate,
    RigidTransform, SENSOR_LAYOUT_MM,
};
