//! Math primitives shared by the orientation and pose estimators

pub mod quaternion;

pub use quaternion::Quaternion;
